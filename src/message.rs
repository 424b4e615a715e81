use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub enum AppSuccess {
    AccountCreated,
    LoggedIn,
    ResetLinkSent,
    PasswordReset,
}

impl AppSuccess {
    pub fn message(&self) -> String {
        match self {
            AppSuccess::AccountCreated => "Account created".to_string(),
            AppSuccess::LoggedIn => "Login successful".to_string(),
            // Same text whether or not the account exists.
            AppSuccess::ResetLinkSent => {
                "If that email exists, a reset link has been sent.".to_string()
            }
            AppSuccess::PasswordReset => "Password has been reset".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(&'static str),

    #[error("user already exists")]
    Conflict,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired reset token")]
    InvalidResetToken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("mail error: {0}")]
    Mail(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.to_string(),
            AppError::Conflict => "User already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::InvalidResetToken => "Invalid or expired token".to_string(),
            AppError::Database(_)
            | AppError::Hash(_)
            | AppError::Token(_)
            | AppError::Mail(_)
            | AppError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Hash(_)
                | AppError::Token(_)
                | AppError::Mail(_)
                | AppError::Internal(_)
        )
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

// Handled failures travel as HTTP 200; callers branch on `success`.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        HttpResponse::Ok().json(FailureBody {
            success: false,
            message: self.message(),
        })
    }
}
