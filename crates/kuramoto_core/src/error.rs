//! Error taxonomy shared by every public operation of the crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KuramotoError {
    /// A caller-supplied parameter is outside its valid domain.
    /// Always raised before any integration work starts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Integration produced non-finite phases.
    #[error("numeric instability: {0}")]
    NumericInstability(String),
}

pub type Result<T> = std::result::Result<T, KuramotoError>;

macro_rules! invalid {
    ($($arg:tt)*) => {
        return Err($crate::error::KuramotoError::InvalidParameter(format!($($arg)*)))
    };
}

pub(crate) use invalid;
