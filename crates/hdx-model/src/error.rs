use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid country code '{0}': expected three uppercase ASCII letters")]
    InvalidCountryCode(String),
    #[error("invalid source descriptor '{id}': {reason}")]
    InvalidDescriptor { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
