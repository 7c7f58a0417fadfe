use lss_derive::lss_error;

#[lss_error]
pub enum DemoError {
    #[error("Parse error: {0}")]
    Parse(std::num::ParseIntError),
}

fn main() {}
