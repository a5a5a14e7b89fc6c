//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod jobs;

#[derive(Parser)]
#[command(
    name = "groundwork",
    about = "Render deployment stack templates and Jenkins jobs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the stack template from configuration
    Generate(generate::GenerateArgs),
    /// Render Jenkins job definitions from a job template
    Jobs(jobs::JobsArgs),
}
