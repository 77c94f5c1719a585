use chrono::Local;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AppError, Role};
use crate::models::validation::normalize_identifier;
use crate::models::{Account, NewAccount, PaymentStatus, PaymentUpdate};
use crate::storage::{load_document, save_document, JsonFile, Snapshot, StorageError};

const DOCUMENT: &str = "accounts";

type Accounts = BTreeMap<String, Account>;

/// Login identities keyed by identifier, persisted after every mutation
pub struct AccountStore {
    accounts: RwLock<Accounts>,
    snapshot: Box<dyn Snapshot>,
    hash_cost: u32,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("hash_cost", &self.hash_cost)
            .finish_non_exhaustive()
    }
}

impl AccountStore {
    /// Load the accounts document; a missing document starts empty
    pub fn open(snapshot: Box<dyn Snapshot>, hash_cost: u32) -> Result<Self, StorageError> {
        let accounts: Accounts = load_document(snapshot.as_ref(), DOCUMENT)?.unwrap_or_default();
        info!("Loaded {} accounts", accounts.len());

        Ok(Self {
            accounts: RwLock::new(accounts),
            snapshot,
            hash_cost,
        })
    }

    pub fn open_file(path: impl AsRef<Path>, hash_cost: u32) -> Result<Self, StorageError> {
        Self::open(Box::new(JsonFile::new(path.as_ref())), hash_cost)
    }

    /// Create an account; the identifier must not be taken
    pub async fn register(&self, request: NewAccount) -> Result<Account, AppError> {
        let identifier = normalize_identifier(&request.identifier)?;
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }

        if self.accounts.read().await.contains_key(&identifier) {
            return Err(AppError::DuplicateIdentifier(identifier));
        }

        // Hash outside the lock; bcrypt is deliberately slow
        let password_hash = self.hash(request.password).await?;

        let account = Account {
            identifier: identifier.clone(),
            name,
            password_hash,
            role: request.role,
            enrolled_on: Local::now().date_naive(),
            payment_status: PaymentStatus::initial_for(request.role),
            payment_type: None,
            payment_reason: None,
        };

        let mut accounts = self.accounts.write().await;
        // Re-check: another registration may have won while we were hashing
        if accounts.contains_key(&identifier) {
            return Err(AppError::DuplicateIdentifier(identifier));
        }

        let mut staged = accounts.clone();
        staged.insert(identifier.clone(), account.clone());
        self.persist(&staged)?;
        *accounts = staged;

        info!("Registered {} account {}", account.role, identifier);
        Ok(account)
    }

    /// `Some(account)` when the password matches
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        let Ok(identifier) = normalize_identifier(identifier) else {
            return Ok(None);
        };
        let Some(account) = self.get(&identifier).await else {
            debug!("Login attempt for unknown identifier {}", identifier);
            return Ok(None);
        };

        let hash = account.password_hash.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        Ok(matches.then_some(account))
    }

    pub async fn get(&self, identifier: &str) -> Option<Account> {
        self.accounts.read().await.get(identifier).cloned()
    }

    pub async fn list(&self) -> Vec<Account> {
        self.accounts.read().await.values().cloned().collect()
    }

    pub async fn students(&self) -> Vec<Account> {
        self.accounts
            .read()
            .await
            .values()
            .filter(|account| account.role == Role::Student)
            .cloned()
            .collect()
    }

    pub async fn set_payment_status(
        &self,
        identifier: &str,
        update: PaymentUpdate,
    ) -> Result<Account, AppError> {
        let mut accounts = self.accounts.write().await;
        let current = accounts
            .get(identifier)
            .ok_or_else(|| AppError::not_found(format!("Account '{}' not found", identifier)))?;
        if current.role == Role::Admin {
            return Err(AppError::forbidden(
                "The administrator's payment status cannot be changed",
            ));
        }
        if current.role != Role::Student {
            return Err(AppError::not_found(format!(
                "Student account '{}' not found",
                identifier
            )));
        }

        let mut staged = accounts.clone();
        let account = staged
            .get_mut(identifier)
            .ok_or_else(|| AppError::not_found(format!("Account '{}' not found", identifier)))?;
        account.payment_status = update.status;
        account.payment_type = update.payment_type;
        account.payment_reason = update.reason;
        let updated = account.clone();

        self.persist(&staged)?;
        *accounts = staged;

        info!(
            "Payment status of {} set to {}",
            identifier, updated.payment_status
        );
        Ok(updated)
    }

    pub async fn remove(&self, identifier: &str) -> Result<Account, AppError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get(identifier) {
            None => {
                return Err(AppError::not_found(format!(
                    "Account '{}' not found",
                    identifier
                )))
            }
            Some(account) if account.role == Role::Admin => {
                return Err(AppError::forbidden(
                    "The administrator account cannot be removed",
                ))
            }
            Some(_) => {}
        }

        let mut staged = accounts.clone();
        let removed = staged
            .remove(identifier)
            .ok_or_else(|| AppError::not_found(format!("Account '{}' not found", identifier)))?;
        self.persist(&staged)?;
        *accounts = staged;

        info!("Removed account {}", identifier);
        Ok(removed)
    }

    /// Put every student back to Pending; persists once, and only if something changed
    pub async fn reset_monthly_payments(&self) -> Result<usize, AppError> {
        let mut accounts = self.accounts.write().await;

        let mut staged = accounts.clone();
        let mut changed = 0;
        for account in staged.values_mut() {
            if account.role == Role::Student && account.payment_status != PaymentStatus::Pending {
                account.payment_status = PaymentStatus::Pending;
                changed += 1;
            }
        }

        if changed > 0 {
            self.persist(&staged)?;
            *accounts = staged;
        }

        Ok(changed)
    }

    /// Create the built-in administrator unless it already exists
    pub async fn seed_admin(
        &self,
        identifier: &str,
        name: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        let identifier = normalize_identifier(identifier)?;
        if let Some(existing) = self.get(&identifier).await {
            if existing.role != Role::Admin {
                return Err(AppError::DuplicateIdentifier(identifier));
            }
            return Ok(false);
        }

        self.register(NewAccount {
            identifier,
            name: name.to_string(),
            password: password.to_string(),
            role: Role::Admin,
        })
        .await?;
        Ok(true)
    }

    async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.hash_cost;
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        Ok(hash)
    }

    fn persist(&self, accounts: &Accounts) -> Result<(), AppError> {
        save_document(self.snapshot.as_ref(), DOCUMENT, accounts)?;
        Ok(())
    }
}
