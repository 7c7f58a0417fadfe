use crate::error::{StoreError, StoreErrorExt};
use config::{Config, Environment, File, Map};
use lss_cipher::DEFAULT_KEY_LENGTH;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// What happens to entries of other domains found in the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sharing {
    /// Other domains' entries are kept, frozen into the baseline ahead of this store's marker.
    #[default]
    Shared,
    /// The buffer belongs to this domain alone; anything else is discarded at attach.
    Exclusive,
}

/// Store settings.
///
/// Missing fields fall back to their defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Length in bytes of a freshly generated session key.
    pub key_length: usize,
    pub sharing: Sharing,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { key_length: DEFAULT_KEY_LENGTH, sharing: Sharing::default() }
    }
}

impl StoreConfig {
    /// Loads settings from a file, overlaid with `LSS__`-prefixed environment variables.
    ///
    /// The file format follows the extension (`.toml`, `.json`, `.yaml`, ...). Environment
    /// variables override file values, e.g. `LSS__KEY_LENGTH=64` or `LSS__SHARING=exclusive`.
    ///
    /// # Errors
    /// * [`StoreError::Config`] if the file is missing or a value does not deserialize.
    /// * [`StoreError::InvalidArgument`] if the result fails [`StoreConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`StoreConfig::load`], with the overrides taken from `env` instead of the
    /// process environment when it is given.
    ///
    /// # Errors
    /// See [`StoreConfig::load`].
    pub fn load_with_env(
        path: impl AsRef<Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(
                Environment::with_prefix("LSS")
                    .separator("__")
                    .convert_case(config::Case::Snake)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to build store config")?
            .try_deserialize::<Self>()
            .context("Failed to deserialize store config")?;

        info!(path = %path.display(), "Loaded store config");

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns [`StoreError::InvalidArgument`] if `key_length` is zero.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.key_length == 0 {
            return Err(StoreError::InvalidArgument {
                message: "key_length must be positive".into(),
                context: Some("store config".into()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.key_length, 128);
        assert_eq!(config.sharing, Sharing::Shared);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{ "sharing": "exclusive" }"#).unwrap();
        assert_eq!(config.sharing, Sharing::Exclusive);
        assert_eq!(config.key_length, DEFAULT_KEY_LENGTH);
    }

    #[test]
    fn test_zero_key_length_rejected() {
        let config = StoreConfig { key_length: 0, ..StoreConfig::default() };
        assert!(matches!(config.validate(), Err(StoreError::InvalidArgument { .. })));
    }
}
