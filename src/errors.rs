use crate::auth::AuthError;
use crate::insights::InsightError;
use crate::storage::HistoryError;
use crate::youtube::YouTubeError;
use axum::http::StatusCode;
use tracing::{error, warn};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        error!("history log failure: {err}");
        Self::internal(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => Self::unauthorized(err.to_string()),
            AuthError::CsrfMismatch | AuthError::NoPendingLogin | AuthError::Denied(_) => {
                warn!("sign-in rejected: {err}");
                Self::bad_request(err.to_string())
            }
            AuthError::Exchange(_) | AuthError::Refresh(_) => {
                warn!("token endpoint failure: {err}");
                Self::upstream(err.to_string())
            }
            _ => {
                error!("credential failure: {err}");
                Self::internal(err)
            }
        }
    }
}

impl From<YouTubeError> for AppError {
    fn from(err: YouTubeError) -> Self {
        match err {
            YouTubeError::Auth(auth) => auth.into(),
            other => {
                warn!("youtube api failure: {other}");
                Self::upstream(format!("API Error: {other}"))
            }
        }
    }
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        warn!("insight generation failed: {err}");
        Self::upstream(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
