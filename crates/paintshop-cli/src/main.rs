//! Paintshop Command-Line Interface
//!
//! Inspect binary paintshop instances, score colorings, emit QAOA circuits
//! and manage checkpointed experiment tasks.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{circuit, interactions, score, solve, tasks, version};

/// Paintshop - binary paintshop instances as Ising spin glasses
#[derive(Parser)]
#[command(name = "paintshop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the spin-glass interactions of a sequence
    Interactions {
        /// Car sequence, e.g. "0,1,0,1" (prefix with @ to read a file)
        sequence: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Count the color changes of a first-occurrence coloring
    Score {
        /// Car sequence, e.g. "0,1,0,1" (prefix with @ to read a file)
        sequence: String,

        /// First-occurrence colors by car index, e.g. "0,1" or "01"
        #[arg(short, long)]
        colors: String,
    },

    /// Solve an instance with the classical baselines
    Solve {
        /// Car sequence, e.g. "0,1,0,1" (prefix with @ to read a file)
        sequence: String,

        /// Also run exhaustive search
        #[arg(short, long)]
        exhaustive: bool,
    },

    /// Emit the single-block QAOA circuit as OpenQASM 3
    Circuit {
        /// Car sequence, e.g. "0,1,0,1" (prefix with @ to read a file)
        sequence: String,

        /// Cost angle
        #[arg(short, long, allow_negative_numbers = true)]
        gamma: f64,

        /// Mixer angle
        #[arg(short, long, allow_negative_numbers = true)]
        beta: f64,

        /// Coupling strength applied to every J
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        coupling: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage checkpointed experiment tasks
    Tasks {
        #[command(subcommand)]
        action: TasksAction,
    },

    /// Show version information
    Version,
}

/// Where the task store lives.
#[derive(Args)]
pub struct StoreArgs {
    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory, overriding the configuration
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum TasksAction {
    /// Write one task per grid point with its circuit
    Prepare {
        /// Car sequence, e.g. "0,1,0,1" (prefix with @ to read a file)
        sequence: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Record externally measured counts for a task
    Ingest {
        /// Car sequence the task was prepared for
        sequence: String,

        /// Task name as shown by `tasks list`
        #[arg(short, long)]
        task: String,

        /// JSON file mapping bitstrings to counts
        #[arg(long)]
        counts: PathBuf,

        /// Overwrite an existing result
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List stored tasks and their completion
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Interactions { sequence, format } => interactions::execute(&sequence, format),

        Commands::Score { sequence, colors } => score::execute(&sequence, &colors),

        Commands::Solve {
            sequence,
            exhaustive,
        } => solve::execute(&sequence, exhaustive),

        Commands::Circuit {
            sequence,
            gamma,
            beta,
            coupling,
            output,
        } => circuit::execute(&sequence, gamma, beta, coupling, output.as_deref()),

        Commands::Tasks { action } => match action {
            TasksAction::Prepare { sequence, store } => tasks::execute_prepare(&sequence, &store),
            TasksAction::Ingest {
                sequence,
                task,
                counts,
                force,
                store,
            } => tasks::execute_ingest(&sequence, &task, &counts, force, &store),
            TasksAction::List { store } => tasks::execute_list(&store),
        },

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
