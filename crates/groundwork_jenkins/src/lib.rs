//! # groundwork_jenkins
//!
//! Jenkins job rendering for Groundwork.
//!
//! A [`JobTemplate`] is script text with `{{name}}` value substitutions
//! and `{{> path}}` partial inclusions. The rendered script is handed to a
//! [`JobDslRunner`] — in production the Gradle-based job-DSL project —
//! which turns it into job definition documents keyed by job name.
//!
//! This pipeline is independent of the stack template build: a failed
//! render never affects a stack document and vice versa.
//!
//! ## Example
//!
//! ```rust,no_run
//! use groundwork_jenkins::{GradleRunner, JobTemplate};
//!
//! let template = JobTemplate::from_path("jobs/deploy.groovy")
//!     .unwrap()
//!     .with_option("stack", "acme");
//! let runner = GradleRunner::new("ext/jenkins_dsl");
//! let jobs = template.render(&runner, "acme-").unwrap();
//! ```

pub mod error;
pub mod mock;
pub mod runner;
pub mod template;

pub use error::{JenkinsError, JenkinsResult};
pub use mock::MockDslRunner;
pub use runner::{GradleRunner, JobDslRunner};
pub use template::JobTemplate;
