//! `generate` command: configuration to stack template JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use groundwork_config::Config;
use groundwork_formation::StackTemplate;

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the stack configuration file
    #[arg(short, long, env = "GROUNDWORK_CONFIG")]
    pub config: PathBuf,

    /// Name of the stack to build
    #[arg(short, long)]
    pub stack: String,

    /// Write the template here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let config = Config::from_path(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;

    let template = StackTemplate::new(config).build(&args.stack)?;
    let document = template.finalize();
    let rendered = serde_json::to_string_pretty(&document)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Wrote stack template to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
