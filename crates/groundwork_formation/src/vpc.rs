//! Network and peering builders.

use serde_json::{json, Value};
use tracing::debug;

use groundwork_config::{PeerConfig, SubnetConfig, VpcConfig};

use crate::error::{FormationError, FormationResult};
use crate::naming::logical_id;
use crate::template::{ResourceRef, Template};

/// Handle to the created network, passed by value to downstream builders.
#[derive(Debug, Clone)]
pub struct VpcHandle {
    resource: ResourceRef,
    route_table: ResourceRef,
    subnets: Vec<ResourceRef>,
    cidr: String,
}

impl VpcHandle {
    /// The network's runtime identifier.
    pub fn id(&self) -> Value {
        self.resource.id()
    }

    /// Runtime identifiers of all subnets, in declaration order.
    pub fn subnet_ids(&self) -> Vec<Value> {
        self.subnets.iter().map(ResourceRef::id).collect()
    }

    /// The network CIDR block as configured.
    pub fn cidr(&self) -> &str {
        &self.cidr
    }

    pub(crate) fn route_table(&self) -> &ResourceRef {
        &self.route_table
    }
}

/// Create the stack network: the VPC itself, its subnets, and the routing
/// needed to make those subnets externally reachable (internet gateway,
/// route table, default route).
pub fn apply(
    template: &mut Template,
    stack_name: &str,
    config: &VpcConfig,
) -> FormationResult<VpcHandle> {
    validate_cidr(&config.cidr)?;
    debug!("Creating network {} ({})", stack_name, config.cidr);

    template.add_resource(
        "VPC",
        "AWS::EC2::VPC",
        json!({
            "CidrBlock": config.cidr,
            "EnableDnsSupport": true,
            "EnableDnsHostnames": true,
            "Tags": [{"Key": "Name", "Value": stack_name}],
        }),
    )?;
    let vpc = template.reference("VPC")?;

    template.add_resource(
        "InternetGateway",
        "AWS::EC2::InternetGateway",
        json!({
            "Tags": [{"Key": "Name", "Value": stack_name}],
        }),
    )?;
    let gateway = template.reference("InternetGateway")?;

    template.add_resource(
        "GatewayAttachment",
        "AWS::EC2::VPCGatewayAttachment",
        json!({
            "VpcId": vpc.id(),
            "InternetGatewayId": gateway.id(),
        }),
    )?;

    template.add_resource(
        "RouteTable",
        "AWS::EC2::RouteTable",
        json!({
            "VpcId": vpc.id(),
        }),
    )?;
    let route_table = template.reference("RouteTable")?;

    template.add_resource(
        "DefaultRoute",
        "AWS::EC2::Route",
        json!({
            "RouteTableId": route_table.id(),
            "DestinationCidrBlock": "0.0.0.0/0",
            "GatewayId": gateway.id(),
        }),
    )?;

    let mut subnets = Vec::with_capacity(config.subnets.len());
    for subnet in &config.subnets {
        subnets.push(apply_subnet(template, &vpc, &route_table, subnet)?);
    }

    Ok(VpcHandle {
        resource: vpc,
        route_table,
        subnets,
        cidr: config.cidr.clone(),
    })
}

fn apply_subnet(
    template: &mut Template,
    vpc: &ResourceRef,
    route_table: &ResourceRef,
    config: &SubnetConfig,
) -> FormationResult<ResourceRef> {
    validate_cidr(&config.cidr)?;

    let name = logical_id(["subnet", config.availability_zone.as_str(), config.cidr.as_str()]);
    template.add_resource(
        &name,
        "AWS::EC2::Subnet",
        json!({
            "VpcId": vpc.id(),
            "CidrBlock": config.cidr,
            "AvailabilityZone": config.availability_zone,
            "MapPublicIpOnLaunch": true,
        }),
    )?;
    let subnet = template.reference(&name)?;

    template.add_resource(
        format!("{name}RouteTableAssociation"),
        "AWS::EC2::SubnetRouteTableAssociation",
        json!({
            "SubnetId": subnet.id(),
            "RouteTableId": route_table.id(),
        }),
    )?;

    Ok(subnet)
}

/// Connect the stack network to an externally owned peer network: one
/// peering connection plus a route for the peer's CIDR. Peers are
/// independent of each other, so invocation order is irrelevant.
pub fn apply_peer(
    template: &mut Template,
    vpc: &VpcHandle,
    peer_name: &str,
    config: &PeerConfig,
) -> FormationResult<ResourceRef> {
    validate_cidr(&config.cidr)?;
    debug!("Peering with {} ({})", peer_name, config.cidr);

    let name = logical_id(["peer", peer_name]);
    let mut properties = json!({
        "VpcId": vpc.id(),
        "PeerVpcId": config.vpc_id,
    });
    if let Some(owner) = &config.owner_account_id {
        properties["PeerOwnerId"] = json!(owner);
    }
    if let Some(role) = &config.peer_role_arn {
        properties["PeerRoleArn"] = json!(role);
    }
    template.add_resource(&name, "AWS::EC2::VPCPeeringConnection", properties)?;
    let peering = template.reference(&name)?;

    template.add_resource(
        format!("{name}Route"),
        "AWS::EC2::Route",
        json!({
            "RouteTableId": vpc.route_table().id(),
            "DestinationCidrBlock": config.cidr,
            "VpcPeeringConnectionId": peering.id(),
        }),
    )?;

    Ok(peering)
}

/// Dotted-quad/prefix notation check. A malformed block aborts the build.
fn validate_cidr(cidr: &str) -> FormationResult<()> {
    let invalid = || FormationError::InvalidCidr(cidr.to_string());

    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    address.parse::<std::net::Ipv4Addr>().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc_config(cidr: &str) -> VpcConfig {
        serde_yaml::from_str(&format!(
            "cidr: {cidr}\n\
             subnets:\n\
             \x20 - cidr: 10.0.0.0/24\n\
             \x20   availability_zone: eu-west-1a\n\
             \x20 - cidr: 10.0.1.0/24\n\
             \x20   availability_zone: eu-west-1b\n"
        ))
        .unwrap()
    }

    #[test]
    fn test_network_resources() {
        let mut template = Template::new();
        let vpc = apply(&mut template, "acme", &vpc_config("10.0.0.0/16")).unwrap();

        assert!(template.contains("VPC"));
        assert!(template.contains("InternetGateway"));
        assert!(template.contains("RouteTable"));
        assert!(template.contains("DefaultRoute"));
        assert_eq!(template.resources_of_kind("AWS::EC2::Subnet").count(), 2);
        assert_eq!(
            template
                .resources_of_kind("AWS::EC2::SubnetRouteTableAssociation")
                .count(),
            2
        );
        assert_eq!(vpc.subnet_ids().len(), 2);
        assert_eq!(vpc.cidr(), "10.0.0.0/16");
    }

    #[test]
    fn test_malformed_cidr_is_fatal() {
        let mut template = Template::new();

        for cidr in ["10.0.0.0", "10.0.0/16", "10.0.0.0/33", "not-a-cidr"] {
            let err = apply(&mut template, "acme", &vpc_config(cidr)).unwrap_err();
            assert!(matches!(err, FormationError::InvalidCidr(_)), "{cidr}");
        }
    }

    #[test]
    fn test_peer_creates_connection_and_route() {
        let mut template = Template::new();
        let vpc = apply(&mut template, "acme", &vpc_config("10.0.0.0/16")).unwrap();

        let peer: PeerConfig = serde_yaml::from_str(
            "cidr: 10.1.0.0/16\nvpc_id: vpc-123456\nowner_account_id: '123456789012'\n",
        )
        .unwrap();
        apply_peer(&mut template, &vpc, "shared", &peer).unwrap();

        let connection = template.resource("PeerShared").unwrap();
        assert_eq!(connection.kind, "AWS::EC2::VPCPeeringConnection");
        assert_eq!(connection.properties["PeerOwnerId"], "123456789012");

        let route = template.resource("PeerSharedRoute").unwrap();
        assert_eq!(route.properties["DestinationCidrBlock"], "10.1.0.0/16");
    }
}
