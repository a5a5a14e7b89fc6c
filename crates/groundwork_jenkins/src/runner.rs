//! External job-DSL tool invocation.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use glob::glob;
use tracing::{debug, info};

use crate::error::{JenkinsError, JenkinsResult};

/// Renders a job-DSL script into job definition documents keyed by job
/// name.
pub trait JobDslRunner {
    fn render_jobs(&self, script: &str) -> JenkinsResult<HashMap<String, String>>;
}

/// Runner backed by the Gradle job-DSL project.
///
/// The script is written to a scratch file under the project's `jobs/`
/// directory, the `xml` task is invoked synchronously, and every XML
/// document it emits is collected keyed by file stem. The scratch file and
/// output directory are removed when the call returns.
pub struct GradleRunner {
    project_dir: PathBuf,
    gradle: String,
}

impl GradleRunner {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            gradle: "gradle".to_string(),
        }
    }

    /// Override the gradle executable, e.g. a wrapper script.
    pub fn with_gradle(mut self, gradle: impl Into<String>) -> Self {
        self.gradle = gradle.into();
        self
    }
}

impl JobDslRunner for GradleRunner {
    fn render_jobs(&self, script: &str) -> JenkinsResult<HashMap<String, String>> {
        let mut script_file = tempfile::Builder::new()
            .prefix("job")
            .suffix(".groovy")
            .tempfile_in(self.project_dir.join("jobs"))?;
        script_file.write_all(script.as_bytes())?;
        script_file.flush()?;

        let output_dir = tempfile::tempdir()?;
        let script_name = script_file
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("Rendering jobs via {} in {:?}", self.gradle, self.project_dir);
        let output = Command::new(&self.gradle)
            .args(["-q", "xml"])
            .arg(format!("-Psource=jobs/{script_name}"))
            .arg(format!("-PoutputDir={}", output_dir.path().display()))
            .current_dir(&self.project_dir)
            .output()?;

        if !output.status.success() {
            return Err(JenkinsError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let mut jobs = HashMap::new();
        let pattern = output_dir.path().join("*.xml");
        for entry in glob(&pattern.to_string_lossy())? {
            let path = entry?;
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let stem = stem.to_string_lossy().into_owned();
            debug!("Collected job document {}", stem);
            jobs.insert(stem, fs::read_to_string(&path)?);
        }
        if jobs.is_empty() {
            return Err(JenkinsError::NoOutput);
        }
        Ok(jobs)
    }
}
