use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("API error: {0}")]
    Api(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}
