//! Environment instantiation for one (environment, application) pair.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{debug, info};

use groundwork_config::{AppConfig, StackDefinition};

use crate::application::AppHandle;
use crate::backend::{env_var_name, EnvironmentBackends};
use crate::error::{FormationError, FormationResult};
use crate::naming::logical_id;
use crate::security::SecurityGroups;
use crate::template::{ResourceRef, Template};
use crate::vpc::VpcHandle;

/// Everything the builder needs to materialize one application in one
/// environment.
pub struct EnvironmentSpec<'a> {
    pub stack_name: &'a str,
    pub env_name: &'a str,
    pub app: &'a AppHandle,
    pub app_config: &'a AppConfig,
    pub stacks: &'a BTreeMap<String, StackDefinition>,
    pub vpc: &'a VpcHandle,
    pub security_groups: &'a SecurityGroups,
    pub instance_profile: &'a ResourceRef,
    pub backends: &'a EnvironmentBackends,
}

/// Create the deployable environment resource for an application.
///
/// Returns `None` without touching the document when the merged
/// configuration disables the application for this environment; otherwise
/// returns the logical resource name for downstream DNS binding.
pub fn apply(template: &mut Template, spec: &EnvironmentSpec<'_>) -> FormationResult<Option<String>> {
    if spec.app_config.disabled {
        debug!(
            "Application {} is disabled in {}",
            spec.app.name, spec.env_name
        );
        return Ok(None);
    }

    let solution = resolve_solution_stack(spec)?;
    let resource_name = logical_id(["env", spec.env_name, spec.app.canonical_name.as_str()]);

    let mut option_settings = vec![
        option("aws:ec2:vpc", "VPCId", spec.vpc.id()),
        option("aws:ec2:vpc", "Subnets", join_ids(spec.vpc.subnet_ids())),
        option("aws:ec2:vpc", "ELBSubnets", join_ids(spec.vpc.subnet_ids())),
        option(
            "aws:autoscaling:launchconfiguration",
            "SecurityGroups",
            spec.security_groups.global.id(),
        ),
        option(
            "aws:autoscaling:launchconfiguration",
            "IamInstanceProfile",
            spec.instance_profile.id(),
        ),
        option(
            "aws:elb:loadbalancer",
            "SecurityGroups",
            spec.security_groups.elb.id(),
        ),
        option(
            "aws:autoscaling:asg",
            "MinSize",
            json!(spec.app_config.scale.min.to_string()),
        ),
        option(
            "aws:autoscaling:asg",
            "MaxSize",
            json!(spec.app_config.scale.max.to_string()),
        ),
    ];

    if let Some(instance_type) = &spec.app_config.instance_type {
        option_settings.push(option(
            "aws:autoscaling:launchconfiguration",
            "InstanceType",
            json!(instance_type),
        ));
    }

    // Application environment: explicit settings first, then the values
    // advertised by this environment's backends.
    for (key, value) in &spec.app_config.config {
        option_settings.push(option(
            "aws:elasticbeanstalk:application:environment",
            key,
            scalar_setting(&spec.app.name, key, value)?,
        ));
    }
    for (backend_type, backend_name, backend) in spec.backends.iter() {
        for (suffix, value) in backend.app_environment() {
            option_settings.push(option(
                "aws:elasticbeanstalk:application:environment",
                &env_var_name(backend_type, backend_name, &suffix),
                value,
            ));
        }
    }

    template.add_resource(
        &resource_name,
        "AWS::ElasticBeanstalk::Environment",
        json!({
            "ApplicationName": spec.app.resource.id(),
            "EnvironmentName": format!(
                "{}-{}-{}",
                spec.stack_name, spec.env_name, spec.app.name
            ),
            "SolutionStackName": solution,
            "OptionSettings": option_settings,
        }),
    )?;
    info!(
        "Created environment {} for application {}",
        spec.env_name, spec.app.name
    );
    Ok(Some(resource_name))
}

fn resolve_solution_stack(spec: &EnvironmentSpec<'_>) -> FormationResult<String> {
    let definition = spec
        .stacks
        .get(&spec.app_config.stack)
        .ok_or_else(|| FormationError::UnknownStack {
            app: spec.app.name.clone(),
            stack: spec.app_config.stack.clone(),
        })?;
    Ok(definition.solution.clone())
}

fn option(namespace: &str, name: &str, value: Value) -> Value {
    json!({"Namespace": namespace, "OptionName": name, "Value": value})
}

fn join_ids(ids: Vec<Value>) -> Value {
    json!({"Fn::Join": [",", ids]})
}

fn scalar_setting(app: &str, key: &str, value: &serde_yaml::Value) -> FormationResult<Value> {
    let rendered = match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => {
            return Err(FormationError::NonScalarSetting {
                app: app.to_string(),
                key: key.to_string(),
            })
        }
    };
    Ok(json!(rendered))
}
