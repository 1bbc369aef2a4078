use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreeningError {
    /// No stock in the requested sector passed the validity check, so there
    /// is no baseline to compare candidates against.
    #[error("No valid stocks found for sector: {sector}")]
    EmptySector { sector: String },

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),
}
