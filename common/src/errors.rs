use thiserror::Error;

/// Everything a wallet operation can be rejected with.
///
/// A rejected operation never leaves a partial mutation behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InsufficientFunds(String),
}

impl WalletError {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }

    pub fn invalid_tx_type() -> Self {
        Self::InvalidArgument("Invalid transaction type".to_string())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn insufficient_funds() -> Self {
        Self::InsufficientFunds("Insufficient balance".to_string())
    }

    /// Machine-readable category, stable across message wording changes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InsufficientFunds(_) => "insufficient_funds",
        }
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
