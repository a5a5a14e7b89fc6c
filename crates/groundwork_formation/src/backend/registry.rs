//! Type-name dispatch for backend constructors.

use std::collections::HashMap;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;

use super::{kinesis, redis, Backend};
use crate::error::{FormationError, FormationResult};
use crate::template::Template;
use crate::vpc::VpcHandle;

/// Constructor for one backend type: `(instance name, options, network)`
/// to an unbuilt backend instance.
pub type BackendConstructor =
    Box<dyn Fn(&str, &Value, &VpcHandle) -> FormationResult<Box<dyn Backend>> + Send + Sync>;

/// Registry resolving backend type strings to constructors.
///
/// Populated once at initialization; new backend types are added through
/// [`BackendRegistry::register`] without touching the orchestration code.
pub struct BackendRegistry {
    constructors: HashMap<String, BackendConstructor>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in backend types.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("kinesis", Box::new(kinesis::construct));
        registry.register("redis", Box::new(redis::construct));
        registry
    }

    /// Register a constructor for a type, replacing any previous one.
    pub fn register(&mut self, backend_type: impl Into<String>, constructor: BackendConstructor) {
        let backend_type = backend_type.into();
        debug!("Registering backend type: {}", backend_type);
        self.constructors.insert(backend_type, constructor);
    }

    pub fn contains(&self, backend_type: &str) -> bool {
        self.constructors.contains_key(backend_type)
    }

    /// Registered type names.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Construct a backend instance, build its resources into the document,
    /// and hand back the finished handle.
    ///
    /// An unregistered type is a fatal error naming the offending type.
    pub fn instantiate(
        &self,
        backend_type: &str,
        instance_name: &str,
        options: &Value,
        vpc: &VpcHandle,
        template: &mut Template,
    ) -> FormationResult<Arc<dyn Backend>> {
        let constructor = self
            .constructors
            .get(backend_type)
            .ok_or_else(|| FormationError::UnknownBackendType(backend_type.to_string()))?;

        let mut backend = constructor(instance_name, options, vpc)?;
        backend.build(template)?;
        Ok(Arc::from(backend))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
