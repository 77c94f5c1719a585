use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

use crate::api::views::{clear_session_cookie, push_flash, FlashKind};
use crate::auth::password::PasswordError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Identifier '{0}' is already registered")]
    DuplicateIdentifier(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid identifier or password")]
    InvalidCredentials,
    #[error("Please log in to continue")]
    Unauthenticated,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
    #[error("Session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    /// Failures the user did not cause; these are logged and shown generically
    pub fn is_internal(&self) -> bool {
        match self {
            AppError::Storage(_) | AppError::Session(_) | AppError::Internal(_) => true,
            AppError::Password(err) => matches!(
                err,
                PasswordError::HashingFailed | PasswordError::VerificationFailed
            ),
            _ => false,
        }
    }

    /// Text for the flash notice shown to the user
    pub fn user_message(&self) -> String {
        if self.is_internal() {
            "Something went wrong. Please try again.".to_string()
        } else {
            self.to_string()
        }
    }

    /// Pair the error with the page the user should be sent back to
    pub fn redirect_to(self, path: impl Into<String>) -> Rejection {
        Rejection {
            error: self,
            redirect_to: path.into(),
        }
    }
}

/// A failed request, answered with a flash notice and a redirect
#[derive(Debug)]
pub struct Rejection {
    pub error: AppError,
    pub redirect_to: String,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        if self.error.is_internal() {
            tracing::error!("Request failed: {:?}", self.error);
        } else {
            tracing::debug!("Request rejected: {}", self.error);
        }

        let mut jar = push_flash(CookieJar::new(), FlashKind::Error, self.error.user_message());
        if matches!(self.error, AppError::Unauthenticated) {
            jar = clear_session_cookie(jar);
        }

        (jar, Redirect::to(&self.redirect_to)).into_response()
    }
}

/// Attach a redirect target to a fallible store call
pub trait OrRedirect<T> {
    fn or_redirect(self, path: impl Into<String>) -> Result<T, Rejection>;
}

impl<T> OrRedirect<T> for Result<T, AppError> {
    fn or_redirect(self, path: impl Into<String>) -> Result<T, Rejection> {
        self.map_err(|error| error.redirect_to(path))
    }
}
