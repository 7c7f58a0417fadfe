use lss_derive::lss_error;

#[lss_error]
pub enum DemoError {
    #[error("Parse error: {source}")]
    Parse {
        #[source]
        source: std::num::ParseIntError,
    },
}

fn main() {}
