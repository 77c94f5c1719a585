use chrono::Duration;
use std::sync::Arc;

use crate::auth::{AppError, Role, SessionTokenService, UserSession};
use crate::models::{Account, NewAccount};
use crate::services::AccountStore;

/// Registration, login and session resolution on top of the account store
#[derive(Debug, Clone)]
pub struct AuthService {
    tokens: SessionTokenService,
    accounts: Arc<AccountStore>,
}

impl AuthService {
    pub fn new(accounts: Arc<AccountStore>, secret: &str, session_ttl: Duration) -> Self {
        Self {
            tokens: SessionTokenService::new(secret, session_ttl),
            accounts,
        }
    }

    /// Self-service registration; administrators are never created this way
    pub async fn register(&self, request: NewAccount) -> Result<Account, AppError> {
        if request.role == Role::Admin {
            return Err(AppError::forbidden(
                "Administrator accounts cannot be self-registered",
            ));
        }

        self.accounts.register(request).await
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, identifier: &str, password: &str) -> Result<(Account, String), AppError> {
        let account = self
            .accounts
            .authenticate(identifier, password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.tokens.issue(&account.identifier, account.role)?;
        tracing::info!("{} logged in as {}", account.identifier, account.role);
        Ok((account, token))
    }

    /// Turn a session token into the caller, using the account's current role
    pub async fn resolve_session(&self, token: &str) -> Result<UserSession, AppError> {
        let claims = self.tokens.validate(token)?;

        let account = self
            .accounts
            .get(&claims.sub)
            .await
            .ok_or(AppError::Unauthenticated)?;

        Ok(UserSession::from(&account))
    }
}
