use colored::Colorize;

use hashem_trainer::models::EXERCISE_CATALOG;

pub fn list_exercises() {
    println!("{}", "Exercise catalog".bold());
    println!();
    for exercise in EXERCISE_CATALOG {
        println!("  {:<26} {}", exercise.name, exercise.image.dimmed());
    }
}
