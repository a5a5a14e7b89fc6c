//! # groundwork_config
//!
//! Stack configuration loading and merged views for Groundwork.
//!
//! Configuration is a single YAML mapping, loaded once and treated as
//! read-only by every other crate. The interesting part is the merged
//! per-environment view: shared defaults at the top level are deep-merged
//! with the overrides declared under `environments.<name>`, and typed
//! models are carved out of the merged tree where the schema is fixed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use groundwork_config::Config;
//!
//! let config = Config::from_path("stack.yml").unwrap();
//! for env_name in config.environment_names() {
//!     let env = config.for_environment(&env_name).unwrap();
//!     let app = env.app_config("web").unwrap();
//!     println!("{}: web disabled = {}", env.name(), app.disabled);
//! }
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod model;

pub use config::{Config, EnvConfig};
pub use error::{ConfigError, ConfigResult};
pub use merge::deep_merge;
pub use model::{
    AppConfig, DnsConfig, PeerConfig, ScaleConfig, StackDefinition, SubnetConfig, VpcConfig,
};
