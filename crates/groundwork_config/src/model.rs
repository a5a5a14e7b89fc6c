//! Typed views over the configuration tree.
//!
//! Only blocks with a fixed schema get a model here; everything that is
//! subject to open-ended overrides stays a raw `serde_yaml::Value` until a
//! builder needs it.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

/// The `vpc` block: network CIDR, subnets and optional peer networks.
#[derive(Debug, Clone, Deserialize)]
pub struct VpcConfig {
    pub cidr: String,
    #[serde(default)]
    pub subnets: Vec<SubnetConfig>,
    #[serde(default)]
    pub peers: BTreeMap<String, PeerConfig>,
}

/// One subnet declaration inside the `vpc` block.
#[derive(Debug, Clone, Deserialize)]
pub struct SubnetConfig {
    pub cidr: String,
    pub availability_zone: String,
}

/// One peer network declaration inside `vpc.peers`.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerConfig {
    pub cidr: String,
    pub vpc_id: String,
    #[serde(default)]
    pub owner_account_id: Option<String>,
    #[serde(default)]
    pub peer_role_arn: Option<String>,
}

/// Merged per-application settings for one environment.
///
/// An application with no override block anywhere gets the defaults:
/// enabled, one instance, deployment stack `default`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_stack")]
    pub stack: String,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub scale: ScaleConfig,
    /// Environment variables handed to the application processes.
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
    #[serde(default)]
    pub dns: Option<DnsConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            stack: default_stack(),
            instance_type: None,
            scale: ScaleConfig::default(),
            config: BTreeMap::new(),
            dns: None,
        }
    }
}

fn default_stack() -> String {
    "default".to_string()
}

/// Autoscaling bounds for an application environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ScaleConfig {
    #[serde(default = "default_instances")]
    pub min: u32,
    #[serde(default = "default_instances")]
    pub max: u32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

fn default_instances() -> u32 {
    1
}

/// The `dns` block binding an application environment to a record.
///
/// `hosted_zone` and `name` are required; a missing key fails the
/// configuration parse. `ttl` falls back to 60 seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    pub hosted_zone: String,
    pub name: String,
    #[serde(default = "default_ttl")]
    pub ttl: u64,
}

fn default_ttl() -> u64 {
    60
}

/// One deployment-stack definition from the `stacks` block.
#[derive(Debug, Clone, Deserialize)]
pub struct StackDefinition {
    /// Platform solution stack name understood by the provisioning service.
    pub solution: String,
}
