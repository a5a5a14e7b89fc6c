//! Kinesis stream backend.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_options, Backend};
use crate::error::FormationResult;
use crate::naming::logical_id;
use crate::template::{ResourceRef, Template};
use crate::vpc::VpcHandle;

#[derive(Debug, Clone, Deserialize)]
struct KinesisOptions {
    #[serde(default = "default_shard_count")]
    shard_count: u32,
}

impl Default for KinesisOptions {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
        }
    }
}

fn default_shard_count() -> u32 {
    1
}

/// A named stream bound to one environment.
#[derive(Debug)]
pub struct KinesisStream {
    resource_name: String,
    shard_count: u32,
    stream: Option<ResourceRef>,
}

/// Registry constructor for the `kinesis` type.
pub fn construct(
    name: &str,
    options: &serde_yaml::Value,
    _vpc: &VpcHandle,
) -> FormationResult<Box<dyn Backend>> {
    let options: KinesisOptions = parse_options(name, options)?;
    Ok(Box::new(KinesisStream {
        resource_name: logical_id(["kinesis", name]),
        shard_count: options.shard_count,
        stream: None,
    }))
}

impl Backend for KinesisStream {
    fn build(&mut self, template: &mut Template) -> FormationResult<()> {
        template.add_resource(
            &self.resource_name,
            "AWS::Kinesis::Stream",
            json!({
                "ShardCount": self.shard_count,
            }),
        )?;
        self.stream = Some(template.reference(&self.resource_name)?);
        Ok(())
    }

    fn app_environment(&self) -> Vec<(String, Value)> {
        self.stream
            .iter()
            .map(|stream| ("STREAM_NAME".to_string(), stream.id()))
            .collect()
    }
}
