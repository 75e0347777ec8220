//! Component version orchestration for ucpush: setup, publish or import, properties, links.

pub mod component;
pub mod env;
pub mod error;
pub mod properties;
pub mod publish;
pub mod pull;
pub mod remote;
pub mod vars;
pub mod version;

#[cfg(test)]
mod fake;

pub use env::{EnvFile, EnvStore};
pub use error::{EngineError, Warning};
pub use properties::{reconcile_properties, ReconcileSummary};
pub use publish::{plan_push, publish_version, upload_version_files, PushPlan, PushRequest};
pub use pull::trigger_import;
pub use remote::Remote;
pub use vars::Variables;
pub use version::{create_version, DeliveryMode, ResultLink, VersionOutcome};
