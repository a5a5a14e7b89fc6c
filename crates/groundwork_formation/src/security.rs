//! Fixed stack-wide security groups.

use serde_json::json;

use crate::error::FormationResult;
use crate::template::{ResourceRef, Template};
use crate::vpc::VpcHandle;

/// References to the two groups every stack carries.
#[derive(Debug, Clone)]
pub struct SecurityGroups {
    pub global: ResourceRef,
    pub elb: ResourceRef,
}

/// Create the global and ELB-facing security groups.
///
/// Both groups admit TCP 0-65535 from 0.0.0.0/0. That open ingress is the
/// policy the deployed stacks run with today; changing it is a product
/// decision, not something this builder decides.
pub fn apply(
    template: &mut Template,
    stack_name: &str,
    vpc: &VpcHandle,
) -> FormationResult<SecurityGroups> {
    for (name, description) in [
        ("GlobalSecurityGroup", "global security group"),
        ("ELBSecurityGroup", "ELB security group"),
    ] {
        template.add_resource(
            name,
            "AWS::EC2::SecurityGroup",
            json!({
                "VpcId": vpc.id(),
                "GroupDescription": format!("{stack_name} stack {description}"),
                "SecurityGroupIngress": [
                    {"IpProtocol": "tcp", "FromPort": 0, "ToPort": 65535, "CidrIp": "0.0.0.0/0"}
                ],
            }),
        )?;
    }

    Ok(SecurityGroups {
        global: template.reference("GlobalSecurityGroup")?,
        elb: template.reference("ELBSecurityGroup")?,
    })
}
