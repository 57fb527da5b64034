use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("OAuth login failed: {0}")]
    OAuth(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }

    /// Message safe to hand back to a client. Storage and internal failures
    /// never leak their cause.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::Validation(_) | Self::Unauthorized(_) | Self::Forbidden(_) => {
                self.to_string()
            }
            Self::OAuth(_) => "Login with Discord failed".to_string(),
            Self::Storage(_) | Self::Internal(_) => "Something went wrong on the server".to_string(),
        }
    }
}

#[cfg(feature = "server")]
mod server_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        error: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                AppError::Forbidden(_) => StatusCode::FORBIDDEN,
                AppError::OAuth(_) => StatusCode::BAD_GATEWAY,
                AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            if status.is_server_error() {
                tracing::error!(error = %self, "request failed");
            }
            (
                status,
                Json(ErrorResponse {
                    error: self.user_message(),
                }),
            )
                .into_response()
        }
    }
}
