// levante-core: reconciliation layer between levante-portal and the CLI.

pub mod config;
pub mod engine;
pub mod error;
pub mod portal;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    Configurations, DeploySettings, IosConfiguration, ProfileBinding, ProjectSettings,
};
pub use engine::{AttachOutcome, ProfileReport, ReconcileEngine};
pub use error::CoreError;
pub use portal::Portal;

// Re-export the portal types consumers handle directly.
pub use levante_portal::{Credentials, Device, IosGateway, ProfileKind, ProvisioningProfile};
