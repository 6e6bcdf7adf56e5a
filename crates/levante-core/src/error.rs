// ── Core error types ──
//
// User-facing errors from levante-core. Portal failures pass through
// unchanged -- there is no local recovery or silent retry anywhere in the
// reconciliation flow; the CLI maps everything into diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Project settings ─────────────────────────────────────────────
    #[error("configuration '{name}' not found in project settings")]
    ConfigurationNotFound { name: String },

    #[error("configuration '{configuration}' has no {field} attribute")]
    MissingField {
        configuration: String,
        field: &'static str,
    },

    #[error("no deploy account in project settings")]
    NoDeployAccount,

    // ── Reconciliation preconditions ─────────────────────────────────
    #[error("device {uuid} is not included in provisioning profile '{profile}'")]
    NotInProfile { uuid: String, profile: String },

    // ── Pass-through ─────────────────────────────────────────────────
    #[error(transparent)]
    Portal(#[from] levante_portal::Error),

    #[error("interactive prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}
