//! `jobs` command: render Jenkins job documents.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use groundwork_jenkins::{GradleRunner, JobTemplate};

#[derive(Args)]
pub struct JobsArgs {
    /// Path to the job template
    #[arg(short, long)]
    pub template: PathBuf,

    /// Job DSL project directory containing the Gradle build
    #[arg(short, long, env = "GROUNDWORK_JOB_DSL_DIR")]
    pub project_dir: PathBuf,

    /// Prefix applied to every rendered job name
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Substitution values as NAME=VALUE pairs
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub values: Vec<String>,

    /// Directory to write rendered job documents into
    #[arg(short, long, default_value = "jobs-out")]
    pub output_dir: PathBuf,
}

pub fn execute(args: JobsArgs) -> anyhow::Result<()> {
    let mut options = HashMap::new();
    for pair in &args.values {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("invalid substitution '{pair}', expected NAME=VALUE");
        };
        options.insert(name.to_string(), value.to_string());
    }

    let template = JobTemplate::from_path(&args.template)
        .with_context(|| format!("loading job template from {}", args.template.display()))?
        .with_options(options);
    let runner = GradleRunner::new(&args.project_dir);
    let jobs = template.render(&runner, &args.prefix)?;

    fs::create_dir_all(&args.output_dir)?;
    for (name, document) in &jobs {
        fs::write(args.output_dir.join(format!("{name}.xml")), document)?;
    }
    info!(
        "Wrote {} job documents to {}",
        jobs.len(),
        args.output_dir.display()
    );
    Ok(())
}
