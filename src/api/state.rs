use anyhow::{Context, Result};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::services::{AccountStore, ClientStore};

/// Shared handles passed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub accounts: Arc<AccountStore>,
    pub clients: Arc<ClientStore>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(accounts: Arc<AccountStore>, clients: Arc<ClientStore>, config: &AppConfig) -> Self {
        Self {
            auth: AuthService::new(accounts.clone(), &config.session_secret, config.session_ttl()),
            accounts,
            clients,
            secure_cookies: config.is_production(),
        }
    }

    /// Open both documents under the configured data directory
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let accounts = AccountStore::open_file(config.accounts_path(), config.bcrypt_cost)
            .with_context(|| format!("Failed to open {}", config.accounts_path().display()))?;
        let clients = ClientStore::open_file(config.clients_path())
            .with_context(|| format!("Failed to open {}", config.clients_path().display()))?;

        Ok(Self::new(Arc::new(accounts), Arc::new(clients), config))
    }
}
