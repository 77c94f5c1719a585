use anyhow::Result;
use colored::Colorize;

use hashem_trainer::services::run_payment_reset;

use crate::desk::Desk;

pub async fn list_accounts(desk: &Desk) -> Result<()> {
    let accounts = desk.accounts()?.list().await;

    if accounts.is_empty() {
        println!("No accounts registered yet.");
        return Ok(());
    }

    println!("{}", "Accounts".bold());
    println!();
    println!(
        "  {:<28} {:<24} {:<10} {:<10} {}",
        "Identifier", "Name", "Role", "Enrolled", "Payment"
    );
    for account in &accounts {
        println!(
            "  {:<28} {:<24} {:<10} {:<10} {}",
            account.identifier,
            account.name,
            account.role.to_string(),
            account.enrolled_on.to_string(),
            account.payment_status
        );
    }

    Ok(())
}

/// Same pass the server's monthly job runs
pub async fn reset_payments(desk: &Desk) -> Result<()> {
    let accounts = desk.accounts()?;
    let changed = run_payment_reset(&accounts).await;

    println!("{} {} students set to Pending", "✓".green(), changed);
    Ok(())
}
