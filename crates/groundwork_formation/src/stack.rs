//! Stack template orchestration.
//!
//! The build sequence is fixed: network, peers, security groups and IAM,
//! application registration, then per environment the declared backends
//! followed by one environment resource (and optional DNS record) per
//! non-disabled application. Later builders consume references created by
//! earlier ones, so there are no backward transitions; a failure anywhere
//! aborts the build and the partial document is dropped with it.

use tracing::{debug, info};

use groundwork_config::Config;

use crate::backend::{BackendConstructor, BackendRegistry, EnvironmentBackends};
use crate::error::FormationResult;
use crate::template::Template;
use crate::{application, dns, environment, iam, security, vpc};

/// Builds the complete resource document for one named stack.
pub struct StackTemplate {
    config: Config,
    registry: BackendRegistry,
}

impl StackTemplate {
    /// A builder over the given configuration, with the built-in backend
    /// types registered.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: BackendRegistry::builtin(),
        }
    }

    /// Register an additional backend type.
    pub fn with_backend(
        mut self,
        backend_type: impl Into<String>,
        constructor: BackendConstructor,
    ) -> Self {
        self.registry.register(backend_type, constructor);
        self
    }

    /// Run the full build for `stack_name`.
    pub fn build(&self, stack_name: &str) -> FormationResult<Template> {
        info!("Building stack template for {}", stack_name);
        let mut template = Template::with_description(format!("{stack_name} deployment stack"));

        let vpc_config = self.config.vpc()?;
        let vpc = vpc::apply(&mut template, stack_name, &vpc_config)?;
        for (peer_name, peer_config) in &vpc_config.peers {
            vpc::apply_peer(&mut template, &vpc, peer_name, peer_config)?;
        }

        let security_groups = security::apply(&mut template, stack_name, &vpc)?;
        let instance_profile = iam::apply(&mut template)?;

        let mut applications = Vec::new();
        for app_name in self.config.applications()? {
            applications.push(application::apply(&mut template, stack_name, &app_name)?);
        }

        for env_name in self.config.environment_names() {
            let env_config = self.config.for_environment(&env_name)?;
            let stacks = env_config.stacks()?;

            let mut backends = EnvironmentBackends::new();
            for (backend_type, instances) in env_config.backends()? {
                for (backend_name, options) in instances {
                    let full_name = format!("{env_name}_{backend_name}");
                    debug!("Instantiating {} backend {}", backend_type, full_name);
                    let handle = self.registry.instantiate(
                        &backend_type,
                        &full_name,
                        &options,
                        &vpc,
                        &mut template,
                    )?;
                    backends.insert(&backend_type, &backend_name, handle);
                }
            }

            for app in &applications {
                let app_config = env_config.app_config(&app.name)?;
                let spec = environment::EnvironmentSpec {
                    stack_name,
                    env_name: &env_name,
                    app,
                    app_config: &app_config,
                    stacks: &stacks,
                    vpc: &vpc,
                    security_groups: &security_groups,
                    instance_profile: &instance_profile,
                    backends: &backends,
                };
                if let Some(resource_name) = environment::apply(&mut template, &spec)? {
                    if let Some(dns_config) = &app_config.dns {
                        dns::apply(&mut template, &resource_name, dns_config)?;
                    }
                }
            }
        }

        Ok(template)
    }
}
