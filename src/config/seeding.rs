use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::services::AccountStore;

/// Make sure the built-in administrator exists
pub async fn seed_admin(accounts: &AccountStore, config: &AppConfig) -> Result<()> {
    let created = accounts
        .seed_admin(
            &config.admin_identifier,
            &config.admin_name,
            &config.admin_password,
        )
        .await
        .with_context(|| format!("Failed to seed administrator {}", config.admin_identifier))?;

    if created {
        tracing::info!("Created administrator account {}", config.admin_identifier);
    } else {
        tracing::debug!("Administrator account {} already present", config.admin_identifier);
    }

    Ok(())
}
