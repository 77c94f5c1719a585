use anyhow::{bail, Result};
use colored::Colorize;

use hashem_trainer::auth::Role;
use hashem_trainer::models::validation::normalize_identifier;
use hashem_trainer::models::NewClient;

use crate::desk::Desk;

pub async fn list_clients(desk: &Desk) -> Result<()> {
    let clients = desk.clients()?.list().await;

    if clients.is_empty() {
        println!("No clients registered yet.");
        println!();
        println!("Use 'hashem clients add <NAME> <GOAL>' to register one.");
        return Ok(());
    }

    println!("{}", "Clients".bold());
    println!();
    println!("  {:>4}  {:<24} {:<20} {:>5}  {}", "ID", "Name", "Goal", "Plans", "Student");
    for client in &clients {
        println!(
            "  {:>4}  {:<24} {:<20} {:>5}  {}",
            client.id,
            client.name,
            client.goal,
            client.workouts.len(),
            client.linked_student.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

pub async fn add_client(
    desk: &Desk,
    name: String,
    goal: String,
    student: Option<String>,
    instructor: Option<String>,
) -> Result<()> {
    let linked_student = match student {
        Some(raw) => {
            let identifier = normalize_identifier(&raw)?;
            match desk.accounts()?.get(&identifier).await {
                Some(account) if account.role == Role::Student => Some(identifier),
                _ => bail!("'{}' is not a registered student", identifier),
            }
        }
        None => None,
    };
    let owner_instructor = instructor
        .map(|raw| normalize_identifier(&raw))
        .transpose()?;

    let client = desk
        .clients()?
        .create(NewClient {
            name,
            goal,
            owner_instructor,
            linked_student,
        })
        .await?;

    println!("{} Client {} registered with ID {}", "✓".green(), client.name, client.id);
    Ok(())
}

pub async fn remove_client(desk: &Desk, id: u64) -> Result<()> {
    let removed = desk.clients()?.delete(id).await?;

    println!(
        "{} Client {} ({}) removed with {} plans and {} progress entries",
        "✓".green(),
        removed.id,
        removed.name,
        removed.workouts.len(),
        removed.progress.len()
    );
    Ok(())
}
