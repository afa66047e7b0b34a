use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::errors::WalletError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        Self(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            WalletError::NotFound(_) => StatusCode::NOT_FOUND,
            WalletError::InvalidArgument(_) | WalletError::InsufficientFunds(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.0.category(),
            "detail": self.0.to_string(),
        }))
    }
}
