//! miniPIC validation tool
//!
//! Usage:
//!   minipic validate <SETUP> [--path <DIR>] [--threshold <T>] [--report <FILE>] [--no-evaluate]
//!   minipic list
//!   minipic inspect <FILE> [--kind auto|spectrum|cloud]

use clap::{Parser, Subcommand};
use std::process;

use minipic_tools::commands::inspect::{self, InspectArgs};
use minipic_tools::commands::list;
use minipic_tools::commands::validate::{self, ValidateArgs};
use minipic_validation::exit_code;

#[derive(Parser, Debug)]
#[command(name = "minipic")]
#[command(about = "Validate miniPIC simulation output against golden values")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a registered validation scenario against a `diags` directory
    Validate(ValidateArgs),
    /// List registered scenarios
    List,
    /// Decode one binary diagnostic and print its summary
    Inspect(InspectArgs),
}

fn main() {
    minipic_tools::init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate(args) => validate::run(args),
        Commands::List => list::run(),
        Commands::Inspect(args) => inspect::run(args),
    };

    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }
    process::exit(exit_code(&result));
}
