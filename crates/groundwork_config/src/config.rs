//! Configuration loading and merged per-environment views.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::deep_merge;
use crate::model::{AppConfig, StackDefinition, VpcConfig};

/// The full stack configuration, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    root: Mapping,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        match root {
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(ConfigError::NotAMapping),
        }
    }

    /// The network block. Required.
    pub fn vpc(&self) -> ConfigResult<VpcConfig> {
        typed_key(&self.root, "vpc")
    }

    /// Declared application names. Required.
    pub fn applications(&self) -> ConfigResult<Vec<String>> {
        typed_key(&self.root, "applications")
    }

    /// Declared environment names, in document order.
    pub fn environment_names(&self) -> Vec<String> {
        self.root
            .get("environments")
            .and_then(Value::as_mapping)
            .map(|environments| {
                environments
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The merged view for one environment: everything at the top level
    /// except `environments`, overridden by `environments.<name>`.
    pub fn for_environment(&self, name: &str) -> ConfigResult<EnvConfig> {
        let environments = self
            .root
            .get("environments")
            .and_then(Value::as_mapping)
            .ok_or_else(|| ConfigError::MissingKey("environments".to_string()))?;
        let overrides = environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))?;

        let mut base = self.root.clone();
        base.remove("environments");

        // An environment declared with no body (`prod:`) is an empty
        // override, not a null replacement of the whole tree.
        if overrides.is_null() {
            return Ok(EnvConfig {
                name: name.to_string(),
                merged: base,
            });
        }

        match deep_merge(&Value::Mapping(base), overrides) {
            Value::Mapping(merged) => Ok(EnvConfig {
                name: name.to_string(),
                merged,
            }),
            _ => Err(ConfigError::InvalidValue {
                path: format!("environments.{name}"),
                message: "environment overrides must be a mapping".to_string(),
            }),
        }
    }
}

/// The merged configuration view for a single environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    name: String,
    merged: Mapping,
}

impl EnvConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared backends: `type -> [(instance name, options)]`, in document
    /// order. An absent `backends` key yields an empty list.
    pub fn backends(&self) -> ConfigResult<Vec<(String, Vec<(String, Value)>)>> {
        let Some(value) = self.merged.get("backends").filter(|v| !v.is_null()) else {
            return Ok(Vec::new());
        };
        let types = value
            .as_mapping()
            .ok_or_else(|| self.invalid("backends", "must be a mapping"))?;

        let mut declared = Vec::with_capacity(types.len());
        for (type_key, instances) in types {
            let type_name = type_key
                .as_str()
                .ok_or_else(|| self.invalid("backends", "type keys must be strings"))?;
            let instances = instances
                .as_mapping()
                .ok_or_else(|| self.invalid(&format!("backends.{type_name}"), "must be a mapping"))?;

            let mut named = Vec::with_capacity(instances.len());
            for (name_key, options) in instances {
                let instance_name = name_key.as_str().ok_or_else(|| {
                    self.invalid(&format!("backends.{type_name}"), "instance keys must be strings")
                })?;
                named.push((instance_name.to_string(), options.clone()));
            }
            declared.push((type_name.to_string(), named));
        }
        Ok(declared)
    }

    /// Deployment-stack definitions. Required for environment builds.
    pub fn stacks(&self) -> ConfigResult<BTreeMap<String, StackDefinition>> {
        typed_key(&self.merged, "stacks")
    }

    /// Typed per-application settings.
    ///
    /// Only a mapping under `applications.<app_name>` contributes; at the
    /// top level `applications` is the declaration sequence, so an
    /// environment without overrides falls back to [`AppConfig::default`].
    pub fn app_config(&self, app_name: &str) -> ConfigResult<AppConfig> {
        let block = self
            .merged
            .get("applications")
            .and_then(Value::as_mapping)
            .and_then(|apps| apps.get(app_name));

        match block {
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
                self.invalid(&format!("applications.{app_name}"), &e.to_string())
            }),
            None => Ok(AppConfig::default()),
        }
    }

    fn invalid(&self, key: &str, message: &str) -> ConfigError {
        ConfigError::InvalidValue {
            path: format!("environments.{}.{}", self.name, key),
            message: message.to_string(),
        }
    }
}

fn typed_key<T: DeserializeOwned>(mapping: &Mapping, key: &str) -> ConfigResult<T> {
    let value = mapping
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
    serde_yaml::from_value(value).map_err(|e| ConfigError::InvalidValue {
        path: key.to_string(),
        message: e.to_string(),
    })
}
