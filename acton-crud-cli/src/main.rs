//! acton-crud CLI tool

#![forbid(unsafe_code)]

use acton_crud_cli::ScaffoldCommand;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "acton-crud")]
#[command(version)]
#[command(about = "Scaffold generator for acton-crud resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CRUD scaffold
    Scaffold {
        #[command(subcommand)]
        command: ScaffoldCommands,
    },
}

#[derive(Subcommand)]
enum ScaffoldCommands {
    /// Generate entity, controller and tests for a resource
    ///
    /// Examples:
    ///   acton-crud scaffold crud Country name:string code:string cities:has_many:City
    ///   acton-crud scaffold crud City name:string --parent Country
    Crud {
        /// Model name (`PascalCase`, e.g., `City`, `UserProfile`)
        model: String,
        /// Field definitions (e.g., `name:string`, `country:references:Country`)
        #[arg(required = true, value_name = "NAME:TYPE[:MODIFIER]")]
        fields: Vec<String>,
        /// Parent model for nested routes (e.g., `Country`)
        #[arg(long)]
        parent: Option<String>,
        /// Crate name imported by the generated tests (defaults to the directory name)
        #[arg(long)]
        crate_name: Option<String>,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // logging is best effort for the CLI
    let _ = acton_crud::observability::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scaffold { command } => match command {
            ScaffoldCommands::Crud {
                model,
                fields,
                parent,
                crate_name,
                force,
            } => {
                ScaffoldCommand::new(model, fields)
                    .parent(parent)
                    .crate_name(crate_name)
                    .force(force)
                    .execute()?;
            }
        },
    }

    Ok(())
}
