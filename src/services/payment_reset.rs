use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::services::AccountStore;

/// Midnight (UTC) on the first day of every month; fields are sec min hour dom month dow
pub const DEFAULT_RESET_SCHEDULE: &str = "0 0 0 1 * *";

/// Cron-driven reset of student payment status to Pending
pub struct PaymentResetService {
    scheduler: JobScheduler,
    accounts: Arc<AccountStore>,
    schedule: String,
}

impl PaymentResetService {
    pub async fn new(accounts: Arc<AccountStore>, schedule: impl Into<String>) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create job scheduler: {}", e))?;

        Ok(Self {
            scheduler,
            accounts,
            schedule: schedule.into(),
        })
    }

    /// Register the monthly job and start the scheduler
    pub async fn start(&self) -> Result<()> {
        let accounts = Arc::clone(&self.accounts);

        let job = Job::new_async(self.schedule.as_str(), move |_uuid, _l| {
            let accounts = Arc::clone(&accounts);
            Box::pin(async move {
                run_payment_reset(&accounts).await;
            })
        })
        .map_err(|e| anyhow!("Failed to create payment reset job: {}", e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add payment reset job to scheduler: {}", e))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| anyhow!("Failed to start job scheduler: {}", e))?;

        info!("Payment reset scheduled with '{}'", self.schedule);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| anyhow!("Failed to stop job scheduler: {}", e))?;

        info!("Payment reset scheduler stopped");
        Ok(())
    }
}

/// One pass of the monthly reset; failures are logged, never propagated to the scheduler
pub async fn run_payment_reset(accounts: &AccountStore) -> usize {
    info!("Starting monthly payment reset");

    match accounts.reset_monthly_payments().await {
        Ok(0) => {
            info!("Monthly payment reset: every student already pending");
            0
        }
        Ok(count) => {
            info!("Monthly payment reset: {} students set to Pending", count);
            count
        }
        Err(e) => {
            error!("Monthly payment reset failed: {}", e);
            0
        }
    }
}
