use anyhow::{anyhow, Result};
use colored::Colorize;

use hashem_trainer::models::{normalize_plan_name, ExerciseEntry};

use crate::desk::Desk;

pub async fn show_workouts(desk: &Desk, client_id: u64, plan: Option<&str>) -> Result<()> {
    let client = desk
        .clients()?
        .get(client_id)
        .await
        .ok_or_else(|| anyhow!("Client {} not found", client_id))?;

    println!("{} - {}", client.name.bold(), client.goal);
    println!();

    let Some(selected) = client.selected_plan(plan) else {
        println!("No workout plans yet.");
        return Ok(());
    };

    println!("Plans: {}", client.plan_names().join(", "));
    println!();
    println!("{}", format!("Plan {}", selected).bold());
    for (index, entry) in client.plan(selected).unwrap_or_default().iter().enumerate() {
        let load = entry
            .load
            .map(|kg| format!("{} kg", kg))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {:<26} {} x {}  {}",
            index, entry.name, entry.sets, entry.reps, load
        );
    }

    Ok(())
}

pub async fn add_exercise(
    desk: &Desk,
    client_id: u64,
    plan: &str,
    exercise: String,
    sets: u32,
    reps: u32,
    load: Option<f64>,
) -> Result<()> {
    let entry = ExerciseEntry {
        name: exercise,
        sets,
        reps,
        load,
    };
    let added = desk.clients()?.add_exercise(client_id, plan, entry).await?;

    println!(
        "{} {} added to plan {} of client {}",
        "✓".green(),
        added.name,
        normalize_plan_name(plan),
        client_id
    );
    Ok(())
}

pub async fn remove_exercise(desk: &Desk, client_id: u64, plan: &str, index: usize) -> Result<()> {
    let removed = desk.clients()?.remove_exercise(client_id, plan, index).await?;

    println!(
        "{} {} removed from plan {} of client {}",
        "✓".green(),
        removed.name,
        normalize_plan_name(plan),
        client_id
    );
    Ok(())
}
