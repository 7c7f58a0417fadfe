use lss_derive::lss_error;
use std::borrow::Cow;

#[lss_error]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Buffer full{}: {message}", format_context(.context))]
    StorageFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, DemoError> {
    raw.parse::<u32>().context("value length")
}

fn full() -> Result<(), DemoError> {
    Err(DemoError::StorageFull { message: "slot".into(), context: None }).context("append")
}

fn main() {
    let err = parse("x").unwrap_err();
    assert!(err.to_string().contains("(value length)"));

    let err = full().unwrap_err();
    assert_eq!(err.to_string(), "Buffer full (append): slot");

    let err: DemoError = "boom".into();
    assert!(matches!(err, DemoError::Internal { .. }));
}
