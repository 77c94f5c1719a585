mod accounts;
mod clients;
mod exercises;
mod progress;
mod workouts;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::desk::Desk;

#[derive(Parser)]
#[command(name = "hashem")]
#[command(about = "Personal-trainer desk: clients, workout plans and progress", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding accounts.json and clients.json
    #[arg(long, global = true, env = "HASHEM_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage clients
    #[command(subcommand)]
    Clients(ClientsSubcommands),

    /// Manage workout plans
    #[command(subcommand)]
    Workouts(WorkoutsSubcommands),

    /// Manage progress records
    #[command(subcommand)]
    Progress(ProgressSubcommands),

    /// Inspect accounts
    #[command(subcommand)]
    Accounts(AccountsSubcommands),

    /// Payment maintenance
    #[command(subcommand)]
    Payments(PaymentsSubcommands),

    /// List the exercise catalog
    Exercises,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ClientsSubcommands {
    /// List all clients
    List,

    /// Register a new client
    Add {
        /// Client name
        name: String,

        /// Training goal
        goal: String,

        /// Identifier of the student account to link
        #[arg(long)]
        student: Option<String>,

        /// Identifier of the owning instructor
        #[arg(long)]
        instructor: Option<String>,
    },

    /// Remove a client with all plans and progress
    Remove {
        /// Client ID
        id: u64,
    },
}

#[derive(Subcommand)]
enum WorkoutsSubcommands {
    /// Show a client's plans
    Show {
        /// Client ID
        client: u64,

        /// Plan name (defaults to the first plan)
        plan: Option<String>,
    },

    /// Add an exercise to a plan
    Add {
        /// Client ID
        client: u64,

        /// Plan name
        plan: String,

        /// Exercise from the catalog
        exercise: String,

        /// Number of sets
        sets: u32,

        /// Repetitions per set
        reps: u32,

        /// Load in kg
        #[arg(short, long)]
        load: Option<f64>,
    },

    /// Remove an exercise by its position in the plan
    Remove {
        /// Client ID
        client: u64,

        /// Plan name
        plan: String,

        /// Position as shown by `workouts show`
        index: usize,
    },
}

#[derive(Subcommand)]
enum ProgressSubcommands {
    /// List a client's progress history
    List {
        /// Client ID
        client: u64,
    },

    /// Record a measurement
    Add {
        /// Client ID
        client: u64,

        /// Body weight in kg
        weight: f64,

        /// Date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<String>,

        /// Waist in cm
        #[arg(long)]
        waist: Option<f64>,

        /// Arm in cm
        #[arg(long)]
        arm: Option<f64>,
    },

    /// Remove every entry recorded on a date
    Remove {
        /// Client ID
        client: u64,

        /// Date (YYYY-MM-DD)
        date: String,
    },
}

#[derive(Subcommand)]
enum AccountsSubcommands {
    /// List all accounts
    List,
}

#[derive(Subcommand)]
enum PaymentsSubcommands {
    /// Set every student back to Pending now
    Reset,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        tracing::debug!("Using data directory {}", self.data_dir.display());
        let desk = Desk::new(self.data_dir);

        match self.command {
            Commands::Clients(subcmd) => match subcmd {
                ClientsSubcommands::List => clients::list_clients(&desk).await,
                ClientsSubcommands::Add {
                    name,
                    goal,
                    student,
                    instructor,
                } => clients::add_client(&desk, name, goal, student, instructor).await,
                ClientsSubcommands::Remove { id } => clients::remove_client(&desk, id).await,
            },
            Commands::Workouts(subcmd) => match subcmd {
                WorkoutsSubcommands::Show { client, plan } => {
                    workouts::show_workouts(&desk, client, plan.as_deref()).await
                }
                WorkoutsSubcommands::Add {
                    client,
                    plan,
                    exercise,
                    sets,
                    reps,
                    load,
                } => workouts::add_exercise(&desk, client, &plan, exercise, sets, reps, load).await,
                WorkoutsSubcommands::Remove {
                    client,
                    plan,
                    index,
                } => workouts::remove_exercise(&desk, client, &plan, index).await,
            },
            Commands::Progress(subcmd) => match subcmd {
                ProgressSubcommands::List { client } => progress::list_progress(&desk, client).await,
                ProgressSubcommands::Add {
                    client,
                    weight,
                    date,
                    waist,
                    arm,
                } => progress::add_progress(&desk, client, weight, date.as_deref(), waist, arm).await,
                ProgressSubcommands::Remove { client, date } => {
                    progress::remove_progress(&desk, client, &date).await
                }
            },
            Commands::Accounts(AccountsSubcommands::List) => accounts::list_accounts(&desk).await,
            Commands::Payments(PaymentsSubcommands::Reset) => accounts::reset_payments(&desk).await,
            Commands::Exercises => {
                exercises::list_exercises();
                Ok(())
            }
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
