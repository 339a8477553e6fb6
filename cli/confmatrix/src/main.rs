//! confmatrix CLI — inspect and validate build-configuration target matrices.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confmatrix", version, about = "Build-configuration target matrices")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Matrix file to use instead of the nearest confmatrix.toml
    #[arg(long, global = true)]
    matrix: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every concrete target of the matrix
    List {
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Show details of one target
    Describe {
        /// Target directory name (e.g., win64_MSVC_Debug_MSBuild)
        directory: String,
    },
    /// Validate the matrix file
    Validate,
    /// Write a starter confmatrix.toml in the current directory
    Init {
        /// Name of the initial target group
        #[arg(long, default_value = "win64")]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&cwd, &name),

        Commands::List { format } => {
            let (matrix, source) = manifest::resolve(&cwd, cli.matrix.as_deref())?;
            commands::target::list(&matrix, &source, format.as_deref())
        }

        Commands::Describe { directory } => {
            let (matrix, _) = manifest::resolve(&cwd, cli.matrix.as_deref())?;
            commands::target::describe(&matrix, &directory)
        }

        Commands::Validate => {
            let (matrix, source) = manifest::resolve(&cwd, cli.matrix.as_deref())?;
            commands::validate::run(&matrix, &source)
        }
    }
}
