//! DNS record binding for environment endpoints.

use serde_json::json;

use groundwork_config::DnsConfig;

use crate::error::FormationResult;
use crate::naming::logical_id;
use crate::template::Template;

/// Bind a CNAME record to an environment's endpoint.
///
/// Only invoked when the application's per-environment configuration
/// carries a `dns` block; the required keys are enforced when that block
/// is parsed.
pub fn apply(
    template: &mut Template,
    env_resource_name: &str,
    config: &DnsConfig,
) -> FormationResult<String> {
    let environment = template.reference(env_resource_name)?;

    let hosted_zone = if config.hosted_zone.ends_with('.') {
        config.hosted_zone.clone()
    } else {
        format!("{}.", config.hosted_zone)
    };

    let resource_name = logical_id(["dns", config.name.as_str()]);
    template.add_resource(
        &resource_name,
        "AWS::Route53::RecordSet",
        json!({
            "HostedZoneName": hosted_zone,
            "Name": config.name,
            "Type": "CNAME",
            "TTL": config.ttl.to_string(),
            "ResourceRecords": [environment.attribute("EndpointURL")],
        }),
    )?;
    Ok(resource_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_with_environment() -> Template {
        let mut template = Template::new();
        template
            .add_resource("EnvProdAcmeWeb", "AWS::ElasticBeanstalk::Environment", json!({}))
            .unwrap();
        template
    }

    #[test]
    fn test_record_binds_to_environment() {
        let mut template = template_with_environment();
        let config: DnsConfig =
            serde_yaml::from_str("hosted_zone: example.com\nname: web.example.com").unwrap();

        let name = apply(&mut template, "EnvProdAcmeWeb", &config).unwrap();

        assert_eq!(name, "DnsWebExampleCom");
        let record = template.resource(&name).unwrap();
        assert_eq!(record.kind, "AWS::Route53::RecordSet");
        assert_eq!(record.properties["HostedZoneName"], "example.com.");
        assert_eq!(record.properties["TTL"], "60");
        assert_eq!(
            record.properties["ResourceRecords"][0],
            json!({"Fn::GetAtt": ["EnvProdAcmeWeb", "EndpointURL"]})
        );
    }

    #[test]
    fn test_trailing_dot_is_not_doubled() {
        let mut template = template_with_environment();
        let config: DnsConfig =
            serde_yaml::from_str("hosted_zone: 'example.com.'\nname: web.example.com\nttl: 300")
                .unwrap();

        let name = apply(&mut template, "EnvProdAcmeWeb", &config).unwrap();

        let record = template.resource(&name).unwrap();
        assert_eq!(record.properties["HostedZoneName"], "example.com.");
        assert_eq!(record.properties["TTL"], "300");
    }

    #[test]
    fn test_requires_existing_environment_resource() {
        let mut template = Template::new();
        let config: DnsConfig =
            serde_yaml::from_str("hosted_zone: example.com\nname: web.example.com").unwrap();

        assert!(apply(&mut template, "EnvProdAcmeWeb", &config).is_err());
    }
}
