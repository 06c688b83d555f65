use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelfmark_database::{AccountError, SessionError};
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    violations: Option<Vec<String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            violations: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// One or more input violations; the response body carries the full
    /// list in the order the violations were found.
    pub fn validation(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: messages.join("; "),
            violations: Some(messages),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.violations {
            Some(messages) => (self.status, Json(messages)).into_response(),
            None => {
                let body = Json(ErrorResponse {
                    error: self.message,
                });
                (self.status, body).into_response()
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::Validation(messages) => Self::validation(messages),
            AccountError::EmailTaken => Self::bad_request(error.to_string()),
            AccountError::IncorrectPassword => Self::unauthorized(error.to_string()),
            AccountError::UserNotFound => Self::not_found(error.to_string()),
            AccountError::CurrentUserNotFound => {
                Self::not_found("Could not determine the current user")
            }
            AccountError::Notification(_) => Self::bad_request(error.to_string()),
            AccountError::PasswordHash(_) | AccountError::Database(_) => {
                error!(error = %error, "account error");
                Self::internal_server_error(error.to_string())
            }
        }
    }
}

impl From<shelfmark_mailer::MailerError> for ApiError {
    fn from(error: shelfmark_mailer::MailerError) -> Self {
        error!(error = %error, "mail delivery error");
        Self::internal_server_error(error.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::InvalidCredentials
            | SessionError::SessionNotFound
            | SessionError::SessionExpired
            | SessionError::InvalidSession => Self::unauthorized(error.to_string()),
            SessionError::Database(_) => {
                error!(error = %error, "session error");
                Self::internal_server_error(error.to_string())
            }
        }
    }
}
