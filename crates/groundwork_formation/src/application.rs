//! Application registration.

use serde_json::json;

use crate::error::FormationResult;
use crate::naming::logical_id;
use crate::template::{ResourceRef, Template};

/// Handle to a registered application.
///
/// Created once per declared application and reused by every environment;
/// the canonical name scopes the application to its stack.
#[derive(Debug, Clone)]
pub struct AppHandle {
    pub name: String,
    pub canonical_name: String,
    pub resource: ResourceRef,
}

/// Register one deployable application under its canonical name.
pub fn apply(
    template: &mut Template,
    stack_name: &str,
    app_name: &str,
) -> FormationResult<AppHandle> {
    let canonical_name = format!("{stack_name}_{app_name}");
    let resource_name = logical_id(["application", canonical_name.as_str()]);

    template.add_resource(
        &resource_name,
        "AWS::ElasticBeanstalk::Application",
        json!({
            "ApplicationName": canonical_name,
            "Description": format!("{app_name} application of the {stack_name} stack"),
        }),
    )?;

    Ok(AppHandle {
        name: app_name.to_string(),
        canonical_name,
        resource: template.reference(&resource_name)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        let mut template = Template::new();
        let app = apply(&mut template, "acme", "web").unwrap();

        assert_eq!(app.name, "web");
        assert_eq!(app.canonical_name, "acme_web");
        assert_eq!(app.resource.logical_name(), "ApplicationAcmeWeb");
        assert!(template.contains("ApplicationAcmeWeb"));
    }

    #[test]
    fn test_same_app_twice_collides() {
        let mut template = Template::new();
        apply(&mut template, "acme", "web").unwrap();

        assert!(apply(&mut template, "acme", "web").is_err());
    }
}
