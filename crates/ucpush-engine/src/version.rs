//! Top-level workflow: set up the component, publish or import a version, then
//! record its properties and result link.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};
use ucpush_config::{parse_properties, DeliveryBlock, VersionBlock};
use ucpush_util::split_patterns;
use uuid::Uuid;

use crate::component::{ensure_component, new_component, tag_component, ComponentSetup};
use crate::env::EnvStore;
use crate::error::{EngineError, Warning};
use crate::properties::{reconcile_properties, ReconcileSummary};
use crate::publish::{plan_push, publish_version, PushPlan, PushRequest};
use crate::pull::trigger_import;
use crate::remote::Remote;
use crate::vars::Variables;

/// Link recorded against a pushed version, usually the CI build page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLink {
    pub name: String,
    pub url: String,
}

/// A delivery block after expansion and every local check.
#[derive(Debug, Clone)]
pub enum DeliveryMode {
    /// Upload local files as a new version, then set `properties` on it.
    Push {
        plan: PushPlan,
        properties: BTreeMap<String, String>,
    },
    /// Have the server import a version, passing `properties` as parameters.
    Pull { properties: BTreeMap<String, String> },
}

impl DeliveryMode {
    /// Expand and validate a delivery block for `component`.
    ///
    /// The type is matched ASCII case-insensitively against `Push` and `Pull`.
    /// Push blocks are fully planned here (version name, base directory,
    /// charset, file selection), so a bad request fails before any remote call.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDeliveryType` for any other type, or the
    /// first failing push check.
    pub fn prepare(
        block: &DeliveryBlock,
        component: &str,
        vars: &Variables,
    ) -> Result<Self, EngineError> {
        let kind = block.delivery_type.trim();
        if kind.eq_ignore_ascii_case("push") {
            let request = PushRequest {
                component: component.to_owned(),
                version: vars.expand(&block.version),
                description: vars.expand(&block.description),
                base_dir: PathBuf::from(vars.expand(&block.base_dir)),
                includes: split_patterns(&vars.expand(&block.include)),
                excludes: split_patterns(&vars.expand(&block.exclude)),
                extensions: split_patterns(&vars.expand(&block.extensions)),
                charset: vars.expand(&block.charset),
            };
            Ok(Self::Push {
                plan: plan_push(&request)?,
                properties: parse_properties(&vars.expand(&block.properties)),
            })
        } else if kind.eq_ignore_ascii_case("pull") {
            Ok(Self::Pull {
                properties: parse_properties(&vars.expand(&block.properties)),
            })
        } else {
            Err(EngineError::InvalidDeliveryType {
                value: block.delivery_type.clone(),
            })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Push { .. } => "Push",
            Self::Pull { .. } => "Pull",
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOutcome {
    pub component: String,
    pub delivery: &'static str,
    /// `None` unless a create-component block was given.
    pub component_setup: Option<ComponentSetup>,
    /// Name of the pushed version.
    pub version: Option<String>,
    /// Server id of the pushed version.
    pub version_id: Option<Uuid>,
    pub properties: ReconcileSummary,
    pub warnings: Vec<Warning>,
}

/// Create a component version as described by `block`.
///
/// Every string is expanded with `vars` and every local check runs before the
/// first remote call. After that, steps run in order and the first failure
/// aborts the run; earlier remote changes stay in place. The only non-fatal
/// step is recording `<component>_VersionId` in `env`, which degrades to a
/// [`Warning`].
///
/// # Errors
/// Returns the first validation or remote failure.
pub fn create_version(
    remote: Remote<'_>,
    env: &mut dyn EnvStore,
    vars: &Variables,
    block: &VersionBlock,
    link: &ResultLink,
) -> Result<VersionOutcome, EngineError> {
    let component = vars.expand(&block.component);
    if component.trim().is_empty() {
        return Err(EngineError::MissingComponentName);
    }
    let tag = vars.expand(&block.tag);
    let mode = DeliveryMode::prepare(&block.delivery, &component, vars)?;
    let link = ResultLink {
        name: vars.expand(&link.name),
        url: vars.expand(&link.url),
    };
    if matches!(mode, DeliveryMode::Push { .. })
        && (link.name.trim().is_empty() || link.url.trim().is_empty())
    {
        return Err(EngineError::MissingLink);
    }

    let mut outcome = VersionOutcome {
        component: component.clone(),
        delivery: mode.name(),
        component_setup: None,
        version: None,
        version_id: None,
        properties: ReconcileSummary::default(),
        warnings: Vec::new(),
    };

    if let Some(create) = &block.create_component {
        info!(%component, "create component starts");
        let setup = ensure_component(remote.components, &new_component(&component, create, vars))?;
        outcome.component_setup = Some(setup);
    }

    if !tag.is_empty() {
        tag_component(remote.components, &component, &tag)?;
    }

    match mode {
        DeliveryMode::Push { plan, properties } => {
            let id = publish_version(remote.versions, &plan)?;
            outcome.version = Some(plan.version.clone());
            outcome.version_id = Some(id);

            let key = format!("{component}_VersionId");
            if let Err(e) = env.put(&key, &id.to_string()) {
                warn!(%key, error = %e, "failed to set version id as environment variable");
                outcome.warnings.push(Warning::VersionIdNotRecorded {
                    key: key.replace(' ', "_"),
                    message: e.to_string(),
                });
            }

            outcome.properties = reconcile_properties(remote, &component, &plan.version, &properties)?;

            info!(%component, version = %plan.version, link = %link.name, url = %link.url, "adding version link");
            remote
                .components
                .add_version_link(&component, &plan.version, &link.name, &link.url)
                .map_err(|source| EngineError::Link { source })?;
        }
        DeliveryMode::Pull { properties } => {
            trigger_import(remote.components, &component, &properties)?;
        }
    }

    Ok(outcome)
}
