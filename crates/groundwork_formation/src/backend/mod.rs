//! Backend instantiation and dispatch.
//!
//! A backend is an auxiliary infrastructure service (a stream, a cache)
//! attachable to the environments of a stack. Type strings from the
//! configuration are resolved through an explicit [`BackendRegistry`], so
//! an unknown type fails by name instead of silently building nothing.

pub mod kinesis;
pub mod redis;
mod registry;

pub use registry::{BackendConstructor, BackendRegistry};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FormationError, FormationResult};
use crate::template::Template;

/// One provisioned backend instance.
pub trait Backend: std::fmt::Debug {
    /// Append this backend's resources to the document.
    fn build(&mut self, template: &mut Template) -> FormationResult<()>;

    /// `(suffix, value)` pairs injected into the environment of every
    /// application bound to this backend. Empty until [`Backend::build`]
    /// has run.
    fn app_environment(&self) -> Vec<(String, Value)>;
}

/// Per-environment accumulator of backend handles, keyed by type and then
/// instance name. Buckets are created explicitly on first insertion;
/// reading an unset type yields an empty iterator, never an error.
#[derive(Debug, Default)]
pub struct EnvironmentBackends {
    by_type: Vec<(String, Vec<(String, Arc<dyn Backend>)>)>,
}

impl EnvironmentBackends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a handle, creating the per-type bucket on first use.
    pub fn insert(&mut self, backend_type: &str, name: &str, handle: Arc<dyn Backend>) {
        if let Some((_, bucket)) = self
            .by_type
            .iter_mut()
            .find(|(existing, _)| existing == backend_type)
        {
            bucket.push((name.to_string(), handle));
            return;
        }
        self.by_type
            .push((backend_type.to_string(), vec![(name.to_string(), handle)]));
    }

    /// Handles of one type, in insertion order.
    pub fn of_type<'a>(
        &'a self,
        backend_type: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Arc<dyn Backend>)> {
        self.by_type
            .iter()
            .filter(move |(existing, _)| existing == backend_type)
            .flat_map(|(_, bucket)| bucket.iter().map(|(name, handle)| (name.as_str(), handle)))
    }

    /// All handles as `(type, name, handle)`, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Arc<dyn Backend>)> {
        self.by_type.iter().flat_map(|(backend_type, bucket)| {
            bucket
                .iter()
                .map(move |(name, handle)| (backend_type.as_str(), name.as_str(), handle))
        })
    }

    pub fn len(&self) -> usize {
        self.by_type.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Environment variable name advertising a backend value to applications:
/// type, instance name and suffix uppercased, non-alphanumerics folded to
/// underscores. `("kinesis", "events", "STREAM_NAME")` becomes
/// `KINESIS_EVENTS_STREAM_NAME`.
pub fn env_var_name(backend_type: &str, instance: &str, suffix: &str) -> String {
    [backend_type, instance, suffix]
        .iter()
        .map(|part| {
            part.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Deserialize a backend's options block; a null block means all defaults.
pub(crate) fn parse_options<T>(name: &str, options: &serde_yaml::Value) -> FormationResult<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(options.clone()).map_err(|e| FormationError::BackendOptions {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct NullBackend;

    impl Backend for NullBackend {
        fn build(&mut self, _template: &mut Template) -> FormationResult<()> {
            Ok(())
        }

        fn app_environment(&self) -> Vec<(String, Value)> {
            vec![("VALUE".to_string(), json!("set"))]
        }
    }

    #[test]
    fn test_unset_type_yields_empty_iterator() {
        let backends = EnvironmentBackends::new();

        assert_eq!(backends.of_type("kinesis").count(), 0);
        assert!(backends.is_empty());
    }

    #[test]
    fn test_insert_creates_bucket_and_keeps_order() {
        let mut backends = EnvironmentBackends::new();
        backends.insert("kinesis", "events", Arc::new(NullBackend));
        backends.insert("kinesis", "audit", Arc::new(NullBackend));
        backends.insert("redis", "cache", Arc::new(NullBackend));

        let names: Vec<_> = backends.of_type("kinesis").map(|(name, _)| name).collect();
        assert_eq!(names, ["events", "audit"]);

        let all: Vec<_> = backends
            .iter()
            .map(|(backend_type, name, _)| (backend_type, name))
            .collect();
        assert_eq!(
            all,
            [("kinesis", "events"), ("kinesis", "audit"), ("redis", "cache")]
        );
        assert_eq!(backends.len(), 3);
    }

    #[test]
    fn test_env_var_name_folding() {
        assert_eq!(
            env_var_name("kinesis", "click-events", "STREAM_NAME"),
            "KINESIS_CLICK_EVENTS_STREAM_NAME"
        );
        assert_eq!(env_var_name("redis", "cache", "HOST"), "REDIS_CACHE_HOST");
    }
}
