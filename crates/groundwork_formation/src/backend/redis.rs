//! ElastiCache Redis backend.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_options, Backend};
use crate::error::FormationResult;
use crate::naming::logical_id;
use crate::template::{ResourceRef, Template};
use crate::vpc::VpcHandle;

const REDIS_PORT: u16 = 6379;

#[derive(Debug, Clone, Deserialize)]
struct RedisOptions {
    #[serde(default = "default_node_type")]
    node_type: String,
    #[serde(default = "default_nodes")]
    nodes: u32,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            node_type: default_node_type(),
            nodes: default_nodes(),
        }
    }
}

fn default_node_type() -> String {
    "cache.t2.micro".to_string()
}

fn default_nodes() -> u32 {
    1
}

/// A cache cluster bound to one environment, reachable from inside the
/// stack network only.
#[derive(Debug)]
pub struct RedisCluster {
    name: String,
    resource_name: String,
    node_type: String,
    nodes: u32,
    vpc: VpcHandle,
    cluster: Option<ResourceRef>,
}

/// Registry constructor for the `redis` type.
pub fn construct(
    name: &str,
    options: &serde_yaml::Value,
    vpc: &VpcHandle,
) -> FormationResult<Box<dyn Backend>> {
    let options: RedisOptions = parse_options(name, options)?;
    Ok(Box::new(RedisCluster {
        name: name.to_string(),
        resource_name: logical_id(["redis", name]),
        node_type: options.node_type,
        nodes: options.nodes,
        vpc: vpc.clone(),
        cluster: None,
    }))
}

impl Backend for RedisCluster {
    fn build(&mut self, template: &mut Template) -> FormationResult<()> {
        let subnet_group_name = format!("{}SubnetGroup", self.resource_name);
        template.add_resource(
            &subnet_group_name,
            "AWS::ElastiCache::SubnetGroup",
            json!({
                "Description": format!("Subnets for the {} cache", self.name),
                "SubnetIds": self.vpc.subnet_ids(),
            }),
        )?;
        let subnet_group = template.reference(&subnet_group_name)?;

        let security_group_name = format!("{}SecurityGroup", self.resource_name);
        template.add_resource(
            &security_group_name,
            "AWS::EC2::SecurityGroup",
            json!({
                "VpcId": self.vpc.id(),
                "GroupDescription": format!("Access to the {} cache", self.name),
                "SecurityGroupIngress": [
                    {
                        "IpProtocol": "tcp",
                        "FromPort": REDIS_PORT,
                        "ToPort": REDIS_PORT,
                        "CidrIp": self.vpc.cidr(),
                    }
                ],
            }),
        )?;
        let security_group = template.reference(&security_group_name)?;

        template.add_resource(
            &self.resource_name,
            "AWS::ElastiCache::CacheCluster",
            json!({
                "Engine": "redis",
                "CacheNodeType": self.node_type,
                "NumCacheNodes": self.nodes,
                "CacheSubnetGroupName": subnet_group.id(),
                "VpcSecurityGroupIds": [security_group.attribute("GroupId")],
            }),
        )?;
        self.cluster = Some(template.reference(&self.resource_name)?);
        Ok(())
    }

    fn app_environment(&self) -> Vec<(String, Value)> {
        self.cluster
            .iter()
            .flat_map(|cluster| {
                [
                    (
                        "HOST".to_string(),
                        cluster.attribute("RedisEndpoint.Address"),
                    ),
                    ("PORT".to_string(), cluster.attribute("RedisEndpoint.Port")),
                ]
            })
            .collect()
    }
}
