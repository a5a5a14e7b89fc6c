//! Integration tests for full stack builds.

use groundwork_config::Config;
use groundwork_formation::{FormationError, StackTemplate, Template};

const MINIMAL: &str = "\
vpc:
  cidr: 10.0.0.0/16
  subnets:
    - cidr: 10.0.0.0/24
      availability_zone: eu-west-1a
applications:
  - web
stacks:
  default:
    solution: \"64bit Amazon Linux running Docker\"
environments:
  prod: {}
";

fn build(config: &str) -> Template {
    let config = Config::from_yaml(config).unwrap();
    StackTemplate::new(config).build("acme").unwrap()
}

fn count_kind(template: &Template, kind: &str) -> usize {
    template.resources_of_kind(kind).count()
}

#[test]
fn test_minimal_stack_census() {
    let template = build(MINIMAL);

    assert_eq!(count_kind(&template, "AWS::EC2::VPC"), 1);
    assert!(count_kind(&template, "AWS::EC2::Subnet") >= 1);
    assert_eq!(count_kind(&template, "AWS::EC2::SecurityGroup"), 2);
    assert_eq!(count_kind(&template, "AWS::IAM::Role"), 1);
    assert_eq!(count_kind(&template, "AWS::IAM::InstanceProfile"), 1);
    assert_eq!(count_kind(&template, "AWS::ElasticBeanstalk::Application"), 1);
    assert_eq!(count_kind(&template, "AWS::ElasticBeanstalk::Environment"), 1);
    assert_eq!(count_kind(&template, "AWS::Route53::RecordSet"), 0);
}

#[test]
fn test_dns_block_adds_exactly_one_record() {
    let config = MINIMAL.replace(
        "  prod: {}",
        "  prod:\n    applications:\n      web:\n        dns:\n          hosted_zone: example.com\n          name: web.example.com",
    );
    let template = build(&config);

    assert_eq!(count_kind(&template, "AWS::Route53::RecordSet"), 1);
    let (_, record) = template
        .resources_of_kind("AWS::Route53::RecordSet")
        .next()
        .unwrap();
    assert_eq!(record.properties["TTL"], "60");
}

#[test]
fn test_disabling_one_environment_leaves_others_alone() {
    let config = "\
vpc:
  cidr: 10.0.0.0/16
  subnets:
    - cidr: 10.0.0.0/24
      availability_zone: eu-west-1a
applications:
  - web
  - worker
stacks:
  default:
    solution: \"64bit Amazon Linux running Docker\"
environments:
  staging:
    applications:
      worker:
        disabled: true
  prod: {}
";
    let template = build(config);

    // 2 environments x 2 applications, minus the one disabled pair.
    assert_eq!(count_kind(&template, "AWS::ElasticBeanstalk::Environment"), 3);
    // The registry itself is untouched by per-environment disabling.
    assert_eq!(count_kind(&template, "AWS::ElasticBeanstalk::Application"), 2);
    assert!(!template.contains("EnvStagingAcmeWorker"));
    assert!(template.contains("EnvProdAcmeWorker"));
}

#[test]
fn test_backends_feed_environment_bindings() {
    let config = "\
vpc:
  cidr: 10.0.0.0/16
  subnets:
    - cidr: 10.0.0.0/24
      availability_zone: eu-west-1a
applications:
  - web
stacks:
  default:
    solution: \"64bit Amazon Linux running Docker\"
environments:
  prod:
    backends:
      kinesis:
        events:
          shard_count: 2
      redis:
        cache: {}
";
    let template = build(config);

    assert_eq!(count_kind(&template, "AWS::Kinesis::Stream"), 1);
    assert_eq!(count_kind(&template, "AWS::ElastiCache::CacheCluster"), 1);

    let environment = template.resource("EnvProdAcmeWeb").unwrap();
    let settings = environment.properties["OptionSettings"].as_array().unwrap();
    let names: Vec<&str> = settings
        .iter()
        .filter(|s| s["Namespace"] == "aws:elasticbeanstalk:application:environment")
        .filter_map(|s| s["OptionName"].as_str())
        .collect();
    assert!(names.contains(&"KINESIS_EVENTS_STREAM_NAME"));
    assert!(names.contains(&"REDIS_CACHE_HOST"));
    assert!(names.contains(&"REDIS_CACHE_PORT"));
}

#[test]
fn test_unknown_backend_type_aborts_naming_it() {
    let config = Config::from_yaml(
        "\
vpc:
  cidr: 10.0.0.0/16
applications:
  - web
stacks:
  default:
    solution: \"64bit Amazon Linux running Docker\"
environments:
  prod:
    backends:
      nonexistent:
        thing: {}
",
    )
    .unwrap();

    // The build fails as a whole; no partial document reaches the caller.
    let err = StackTemplate::new(config).build("acme").unwrap_err();
    assert!(matches!(
        err,
        FormationError::UnknownBackendType(name) if name == "nonexistent"
    ));
}

#[test]
fn test_peers_appear_in_the_document() {
    let config = MINIMAL.replace(
        "  cidr: 10.0.0.0/16\n",
        "  cidr: 10.0.0.0/16\n  peers:\n    shared:\n      cidr: 10.1.0.0/16\n      vpc_id: vpc-123456\n",
    );
    let template = build(&config);

    assert_eq!(count_kind(&template, "AWS::EC2::VPCPeeringConnection"), 1);
    assert!(template.contains("PeerSharedRoute"));
}

#[test]
fn test_build_is_deterministic() {
    let first = build(MINIMAL).finalize();
    let second = build(MINIMAL).finalize();

    assert_eq!(first, second);
}

#[test]
fn test_logical_names_stay_unique_across_generated_sets() {
    // Generated application/environment/backend name sets; every build
    // must keep logical names unique (add_resource would fail otherwise).
    let apps = ["web", "worker", "api", "batch"];
    let envs = ["dev", "staging", "prod"];
    let backend_names = ["events", "audit", "metrics"];

    for app_count in 1..=apps.len() {
        for env_count in 1..=envs.len() {
            let mut config = String::from(
                "vpc:\n  cidr: 10.0.0.0/16\n  subnets:\n    - cidr: 10.0.0.0/24\n      availability_zone: eu-west-1a\n",
            );
            config.push_str("applications:\n");
            for app in &apps[..app_count] {
                config.push_str(&format!("  - {app}\n"));
            }
            config.push_str(
                "stacks:\n  default:\n    solution: \"64bit Amazon Linux running Docker\"\n",
            );
            config.push_str("environments:\n");
            for env in &envs[..env_count] {
                config.push_str(&format!("  {env}:\n    backends:\n      kinesis:\n"));
                for backend in &backend_names {
                    config.push_str(&format!("        {backend}: {{}}\n"));
                }
            }

            // A name collision would have failed the build outright.
            let template = build(&config);
            assert_eq!(
                template
                    .resources_of_kind("AWS::ElasticBeanstalk::Environment")
                    .count(),
                app_count * env_count
            );
            assert_eq!(
                template.resources_of_kind("AWS::Kinesis::Stream").count(),
                backend_names.len() * env_count
            );
        }
    }
}
