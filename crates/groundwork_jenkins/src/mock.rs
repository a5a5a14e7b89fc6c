//! Mock job-DSL runner for tests.
//!
//! Returns canned job documents and captures every script it is asked to
//! render, so tests can run the full pipeline without Gradle installed.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{JenkinsError, JenkinsResult};
use crate::runner::JobDslRunner;

#[derive(Debug, Default)]
pub struct MockDslRunner {
    jobs: HashMap<String, String>,
    fail: bool,
    scripts: RefCell<Vec<String>>,
}

impl MockDslRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned job document to return.
    pub fn with_job(mut self, name: impl Into<String>, document: impl Into<String>) -> Self {
        self.jobs.insert(name.into(), document.into());
        self
    }

    /// A runner whose tool invocation always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Scripts captured across all calls, in order.
    pub fn captured_scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }
}

impl JobDslRunner for MockDslRunner {
    fn render_jobs(&self, script: &str) -> JenkinsResult<HashMap<String, String>> {
        self.scripts.borrow_mut().push(script.to_string());
        if self.fail {
            return Err(JenkinsError::ToolFailed {
                status: 1,
                stderr: "mock failure".to_string(),
            });
        }
        if self.jobs.is_empty() {
            return Err(JenkinsError::NoOutput);
        }
        Ok(self.jobs.clone())
    }
}
