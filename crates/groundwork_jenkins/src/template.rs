//! Job template rendering.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::error::{JenkinsError, JenkinsResult};
use crate::runner::JobDslRunner;

const MAX_INCLUDE_DEPTH: usize = 8;

/// A job-DSL script template.
///
/// Two constructs are recognized:
/// - `{{name}}` substitutes the option registered under `name`. Lookup is
///   strict but absence is not fatal: an unresolved name renders as the
///   empty string.
/// - `{{> relative/path}}` splices in a partial template, resolved
///   relative to the including template's location and expanded
///   recursively up to a fixed depth.
pub struct JobTemplate {
    source: String,
    base_dir: Option<PathBuf>,
    options: HashMap<String, String>,
    variable_pattern: Regex,
    partial_pattern: Regex,
}

impl JobTemplate {
    /// Template from inline script text. Partials resolve against the
    /// process working directory.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            base_dir: None,
            options: HashMap::new(),
            // Match {{variable_name}}, but not {{> partial}} inclusions.
            variable_pattern: Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap(),
            partial_pattern: Regex::new(r"\{\{>\s*([^}\s]+)\s*\}\}").unwrap(),
        }
    }

    /// Template loaded from a file; partials resolve against the file's
    /// directory.
    pub fn from_path(path: impl AsRef<Path>) -> JenkinsResult<Self> {
        let path = path.as_ref();
        debug!("Loading job template from {:?}", path);

        let source = fs::read_to_string(path)?;
        let mut template = Self::new(source);
        template.base_dir = path.parent().map(Path::to_path_buf);
        Ok(template)
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    /// Render the script text: partials are expanded first, then values
    /// substituted.
    pub fn render_script(&self) -> JenkinsResult<String> {
        let expanded = self.expand_partials(&self.source, self.base_dir.as_deref(), 0)?;
        Ok(self.substitute(&expanded))
    }

    /// Render the script and feed it through the job-DSL tool, returning
    /// job documents keyed by prefixed job name.
    pub fn render(
        &self,
        runner: &dyn JobDslRunner,
        prefix: &str,
    ) -> JenkinsResult<HashMap<String, String>> {
        let script = self.render_script()?;
        let jobs = runner.render_jobs(&script)?;
        Ok(jobs
            .into_iter()
            .map(|(name, document)| (format!("{prefix}{name}"), document))
            .collect())
    }

    fn substitute(&self, content: &str) -> String {
        self.variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                self.options.get(&caps[1]).cloned().unwrap_or_default()
            })
            .to_string()
    }

    fn expand_partials(
        &self,
        content: &str,
        base: Option<&Path>,
        depth: usize,
    ) -> JenkinsResult<String> {
        if !self.partial_pattern.is_match(content) {
            return Ok(content.to_string());
        }
        if depth >= MAX_INCLUDE_DEPTH {
            return Err(JenkinsError::IncludeDepth(MAX_INCLUDE_DEPTH));
        }

        let mut result = String::with_capacity(content.len());
        let mut last = 0;
        for caps in self.partial_pattern.captures_iter(content) {
            let whole = caps.get(0).unwrap();
            let partial_path = match base {
                Some(dir) => dir.join(&caps[1]),
                None => PathBuf::from(&caps[1]),
            };
            debug!("Including partial {:?}", partial_path);

            let partial_source =
                fs::read_to_string(&partial_path).map_err(|source| JenkinsError::MissingPartial {
                    path: partial_path.clone(),
                    source,
                })?;
            let nested = self.expand_partials(&partial_source, partial_path.parent(), depth + 1)?;

            result.push_str(&content[last..whole.start()]);
            result.push_str(&nested);
            last = whole.end();
        }
        result.push_str(&content[last..]);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_substitutes_registered_options() {
        let template = JobTemplate::new("job('{{name}}') { branch '{{branch}}' }")
            .with_option("name", "deploy")
            .with_option("branch", "main");

        assert_eq!(
            template.render_script().unwrap(),
            "job('deploy') { branch 'main' }"
        );
    }

    #[test]
    fn test_unresolved_names_render_empty() {
        let template = JobTemplate::new("value: '{{missing}}'");

        assert_eq!(template.render_script().unwrap(), "value: ''");
    }

    #[test]
    fn test_partials_resolve_relative_to_including_template() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shared");
        fs::create_dir(&nested).unwrap();

        let mut partial = fs::File::create(nested.join("steps.groovy")).unwrap();
        writeln!(partial, "steps {{ shell('{{{{command}}}}') }}").unwrap();

        let template_path = dir.path().join("job.groovy");
        let mut root = fs::File::create(&template_path).unwrap();
        write!(root, "job('x') {{ {{{{> shared/steps.groovy}}}} }}").unwrap();

        let template = JobTemplate::from_path(&template_path)
            .unwrap()
            .with_option("command", "make test");
        let script = template.render_script().unwrap();

        assert!(script.contains("shell('make test')"));
    }

    #[test]
    fn test_missing_partial_is_an_error() {
        let template = JobTemplate::new("{{> does/not/exist.groovy}}");

        assert!(matches!(
            template.render_script(),
            Err(JenkinsError::MissingPartial { .. })
        ));
    }

    #[test]
    fn test_self_including_partial_hits_depth_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.groovy");
        fs::write(&path, "{{> loop.groovy}}").unwrap();

        let template = JobTemplate::from_path(&path).unwrap();

        assert!(matches!(
            template.render_script(),
            Err(JenkinsError::IncludeDepth(_))
        ));
    }
}
