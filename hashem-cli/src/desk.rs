use anyhow::{Context, Result};
use std::path::PathBuf;

use hashem_trainer::auth::password::DEFAULT_HASH_COST;
use hashem_trainer::services::{AccountStore, ClientStore};

/// The two documents of a data directory, opened for one command
pub struct Desk {
    data_dir: PathBuf,
}

impl Desk {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn accounts(&self) -> Result<AccountStore> {
        let path = self.data_dir.join("accounts.json");
        AccountStore::open_file(&path, DEFAULT_HASH_COST)
            .with_context(|| format!("Failed to open {}", path.display()))
    }

    pub fn clients(&self) -> Result<ClientStore> {
        let path = self.data_dir.join("clients.json");
        ClientStore::open_file(&path).with_context(|| format!("Failed to open {}", path.display()))
    }
}
