//! # groundwork_formation
//!
//! CloudFormation-style stack template construction for Groundwork.
//!
//! A stack build walks the declarative configuration and produces a single
//! resource document: the network and its subnets, the stack-wide security
//! groups and instance role, one registered application per declared name,
//! and per environment the declared backends plus one deployable
//! environment for every non-disabled application, optionally bound to a
//! DNS record.
//!
//! All builders append into one shared [`Template`]; references between
//! resources are opaque [`ResourceRef`] handles that resolve to runtime
//! identifiers at provisioning time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use groundwork_config::Config;
//! use groundwork_formation::StackTemplate;
//!
//! let config = Config::from_path("stack.yml").unwrap();
//! let template = StackTemplate::new(config).build("acme").unwrap();
//! let document = template.finalize();
//! println!("{}", serde_json::to_string_pretty(&document).unwrap());
//! ```

pub mod application;
pub mod backend;
pub mod dns;
pub mod environment;
pub mod error;
pub mod iam;
pub mod naming;
pub mod security;
pub mod stack;
pub mod template;
pub mod vpc;

pub use application::AppHandle;
pub use backend::{Backend, BackendConstructor, BackendRegistry, EnvironmentBackends};
pub use error::{FormationError, FormationResult};
pub use security::SecurityGroups;
pub use stack::StackTemplate;
pub use template::{Resource, ResourceRef, Template};
pub use vpc::VpcHandle;
