use anyhow::{anyhow, Result};
use chrono::Local;
use colored::Colorize;

use hashem_trainer::models::validation::parse_date;
use hashem_trainer::models::ProgressEntry;

use crate::desk::Desk;

fn measurement(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub async fn list_progress(desk: &Desk, client_id: u64) -> Result<()> {
    let client = desk
        .clients()?
        .get(client_id)
        .await
        .ok_or_else(|| anyhow!("Client {} not found", client_id))?;

    println!("{}", format!("Progress of {}", client.name).bold());
    println!();

    if client.progress.is_empty() {
        println!("No progress recorded yet.");
        return Ok(());
    }

    println!("  {:<10}  {:>7}  {:>6}  {:>5}", "Date", "Weight", "Waist", "Arm");
    for entry in &client.progress {
        println!(
            "  {:<10}  {:>7}  {:>6}  {:>5}",
            entry.date.to_string(),
            entry.weight,
            measurement(entry.waist),
            measurement(entry.arm)
        );
    }

    Ok(())
}

pub async fn add_progress(
    desk: &Desk,
    client_id: u64,
    weight: f64,
    date: Option<&str>,
    waist: Option<f64>,
    arm: Option<f64>,
) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    desk.clients()?
        .add_progress(
            client_id,
            ProgressEntry {
                date,
                weight,
                waist,
                arm,
            },
        )
        .await?;

    println!("{} Progress recorded for client {} on {}", "✓".green(), client_id, date);
    Ok(())
}

pub async fn remove_progress(desk: &Desk, client_id: u64, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let removed = desk.clients()?.remove_progress(client_id, date).await?;

    println!(
        "{} Removed {} progress entries of client {} on {}",
        "✓".green(),
        removed,
        client_id,
        date
    );
    Ok(())
}
