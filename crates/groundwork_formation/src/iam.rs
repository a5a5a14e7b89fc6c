//! Instance role and profile.

use serde_json::json;

use crate::error::FormationResult;
use crate::template::{ResourceRef, Template};

/// Create the stack instance role and its profile.
///
/// The role trusts the EC2 service principal and carries three fixed
/// inline policies: tag discovery, instance discovery, and the Kinesis
/// stream operations deployed applications use. The policies are not
/// configurable. Returns the instance profile reference.
pub fn apply(template: &mut Template) -> FormationResult<ResourceRef> {
    template.add_resource(
        "IAMRole",
        "AWS::IAM::Role",
        json!({
            "Path": "/",
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Principal": {"Service": ["ec2.amazonaws.com"]},
                        "Action": ["sts:AssumeRole"],
                    }
                ],
            },
            "Policies": [
                {
                    "PolicyName": "DescribeTags",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [
                            {"Effect": "Allow", "Action": "ec2:DescribeTags", "Resource": "*"}
                        ],
                    },
                },
                {
                    "PolicyName": "DescribeInstances",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [
                            {"Effect": "Allow", "Action": "ec2:DescribeInstances", "Resource": "*"}
                        ],
                    },
                },
                {
                    "PolicyName": "KinesisApplication",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [
                            {
                                "Effect": "Allow",
                                "Action": [
                                    "kinesis:DescribeStream",
                                    "kinesis:ListStreams",
                                    "kinesis:PutRecord",
                                    "kinesis:PutRecords",
                                    "kinesis:GetShardIterator",
                                    "kinesis:GetRecords",
                                ],
                                "Resource": "*",
                            }
                        ],
                    },
                },
            ],
        }),
    )?;
    let role = template.reference("IAMRole")?;

    template.add_resource(
        "IAMInstanceProfile",
        "AWS::IAM::InstanceProfile",
        json!({
            "Path": "/",
            "Roles": [role.id()],
        }),
    )?;
    template.reference("IAMInstanceProfile")
}
