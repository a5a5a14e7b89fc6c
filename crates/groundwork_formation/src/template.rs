//! The accumulating resource document and reference handles.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{FormationError, FormationResult};

/// A single named, typed resource record.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: String,
    pub properties: Value,
}

/// An opaque handle standing in for the runtime identifier of a resource.
///
/// Handles are only minted by [`Template::reference`] for resources that
/// already exist in the document, and resolve at provisioning time; they
/// never carry the resource definition itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    name: String,
}

impl ResourceRef {
    /// The logical name this handle points at.
    pub fn logical_name(&self) -> &str {
        &self.name
    }

    /// Render as a `Ref` intrinsic.
    pub fn id(&self) -> Value {
        json!({ "Ref": self.name })
    }

    /// Render as an `Fn::GetAtt` intrinsic for the given attribute.
    pub fn attribute(&self, attr: &str) -> Value {
        json!({ "Fn::GetAtt": [self.name, attr] })
    }
}

/// The shared, append-only resource graph produced by one stack build.
///
/// Logical names are unique: registering a name twice is an invariant
/// violation surfaced as an error, never an overwrite. There is no removal.
#[derive(Debug, Default)]
pub struct Template {
    description: Option<String>,
    resources: BTreeMap<String, Resource>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            resources: BTreeMap::new(),
        }
    }

    /// Register a resource under a unique logical name.
    pub fn add_resource(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        properties: Value,
    ) -> FormationResult<()> {
        let name = name.into();
        if self.resources.contains_key(&name) {
            return Err(FormationError::DuplicateResource(name));
        }
        let kind = kind.into();
        debug!("Adding resource {} ({})", name, kind);
        self.resources.insert(name, Resource { kind, properties });
        Ok(())
    }

    /// Obtain a handle to an already registered resource.
    pub fn reference(&self, name: &str) -> FormationResult<ResourceRef> {
        if !self.resources.contains_key(name) {
            return Err(FormationError::UnknownResource(name.to_string()));
        }
        Ok(ResourceRef {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Resources of one type, for inspection.
    pub fn resources_of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> {
        self.resources
            .iter()
            .filter(move |(_, resource)| resource.kind == kind)
            .map(|(name, resource)| (name.as_str(), resource))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Consume the document into its serializable form.
    pub fn finalize(self) -> Value {
        let resources: serde_json::Map<String, Value> = self
            .resources
            .into_iter()
            .map(|(name, resource)| {
                (
                    name,
                    json!({ "Type": resource.kind, "Properties": resource.properties }),
                )
            })
            .collect();

        let mut document = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": resources,
        });
        if let Some(description) = self.description {
            document["Description"] = json!(description);
        }
        document
    }
}
