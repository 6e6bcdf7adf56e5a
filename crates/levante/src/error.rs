//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ProjectError` / portal failures into user-facing
//! errors with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use levante_core::CoreError;
use levante_project::ProjectError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 5;
    pub const GATEWAY: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Project ──────────────────────────────────────────────────────

    #[error("no levante project found (searched upward from {searched})")]
    #[diagnostic(
        code(levante::no_project),
        help(
            "Run inside a levante project, or point at one with --project.\n\
             A project is any directory containing levante.json."
        )
    )]
    NoProject { searched: String },

    #[error(transparent)]
    #[diagnostic(code(levante::project_settings))]
    ProjectSettings(ProjectError),

    #[error("no deploy information in levante.json")]
    #[diagnostic(
        code(levante::no_deploy),
        help("Add a deploy section with your apple_id (and optionally apple_developer_team).")
    )]
    NoDeployAccount,

    #[error("configuration '{name}' is not declared in levante.json")]
    #[diagnostic(
        code(levante::configuration_not_found),
        help("Run: levante info to see the declared iOS configurations")
    )]
    ConfigurationNotFound { name: String },

    #[error("configuration '{configuration}' has no {field} attribute")]
    #[diagnostic(
        code(levante::missing_field),
        help("Declare both provisioning_profile_name and provisioning_profile_path for the configuration.")
    )]
    MissingField {
        configuration: String,
        field: &'static str,
    },

    // ── Reconciliation ───────────────────────────────────────────────

    #[error("device {uuid} is not included in provisioning profile '{profile}'")]
    #[diagnostic(
        code(levante::not_in_profile),
        help("Run: levante devices list <configuration> to see the authorized devices")
    )]
    NotInProfile { uuid: String, profile: String },

    #[error("device {uuid} is not registered in the developer portal")]
    #[diagnostic(
        code(levante::not_in_portal),
        help("Run: levante devices list to see the registered devices")
    )]
    NotInPortal { uuid: String },

    #[error("device {uuid} was expected in the portal device list")]
    #[diagnostic(code(levante::device_not_found))]
    DeviceNotFound { uuid: String },

    // ── External tools ───────────────────────────────────────────────

    #[error("the `{program}` command is not available")]
    #[diagnostic(
        code(levante::gateway_unavailable),
        help(
            "The cupertino gem provides the `ios` tool.\n\
             Install it with: gem install cupertino"
        )
    )]
    GatewayUnavailable { program: String },

    #[error("portal command timed out after {secs}s")]
    #[diagnostic(
        code(levante::gateway_timeout),
        help("The developer portal is slow or unreachable; try again.")
    )]
    GatewayTimeout { secs: u64 },

    #[error("portal command failed: {detail}")]
    #[diagnostic(code(levante::gateway_failed))]
    GatewayFailed { detail: String },

    #[error("cannot read provisioning profile {path}: {reason}")]
    #[diagnostic(
        code(levante::profile_parse),
        help("Check the provisioning_profile_path of the configuration, or re-download the profile.")
    )]
    ProfileParse { path: String, reason: String },

    #[error("cannot copy the downloaded profile into place: {detail}")]
    #[diagnostic(code(levante::profile_copy))]
    ProfileCopy { detail: String },

    // ── Platforms ────────────────────────────────────────────────────

    #[error("platform '{platform}' does not exist")]
    #[diagnostic(
        code(levante::platform_unknown),
        help("Known platforms: ios, android, browser")
    )]
    PlatformUnknown { platform: String },

    #[error("platform '{platform}' is not available on this host")]
    #[diagnostic(code(levante::platform_unsupported))]
    PlatformUnsupported { platform: String },

    #[error("cordova failed: {detail}")]
    #[diagnostic(
        code(levante::cordova_failed),
        help("Check that the cordova CLI is installed: npm install -g cordova")
    )]
    CordovaFailed { detail: String },

    // ── IO / interactive ─────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigurationNotFound { .. }
            | Self::NotInProfile { .. }
            | Self::NotInPortal { .. }
            | Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::NoProject { .. } | Self::NoDeployAccount | Self::MissingField { .. } => {
                exit_code::USAGE
            }
            Self::GatewayUnavailable { .. } | Self::PlatformUnsupported { .. } => {
                exit_code::UNAVAILABLE
            }
            Self::GatewayTimeout { .. } => exit_code::TIMEOUT,
            Self::GatewayFailed { .. } | Self::ProfileCopy { .. } | Self::CordovaFailed { .. } => {
                exit_code::GATEWAY
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mappings ───────────────────────────────────────────────────

impl From<levante_portal::Error> for CliError {
    fn from(err: levante_portal::Error) -> Self {
        use levante_portal::Error as Portal;
        match err {
            Portal::Unavailable { program } => CliError::GatewayUnavailable { program },
            Portal::Timeout { secs, .. } => CliError::GatewayTimeout { secs },
            Portal::NotInPortal { uuid } => CliError::NotInPortal { uuid },
            Portal::DeviceNotFound { uuid } => CliError::DeviceNotFound { uuid },
            Portal::ProfileParse { path, reason } => CliError::ProfileParse {
                path: path.display().to_string(),
                reason,
            },
            Portal::Copy { .. } => CliError::ProfileCopy {
                detail: err.to_string(),
            },
            Portal::CommandFailed { .. }
            | Portal::OutputOverflow { .. }
            | Portal::Spawn { .. }
            | Portal::UnexpectedOutput { .. } => CliError::GatewayFailed {
                detail: err.to_string(),
            },
            Portal::Io(source) => CliError::Io(source),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigurationNotFound { name } => CliError::ConfigurationNotFound { name },
            CoreError::MissingField {
                configuration,
                field,
            } => CliError::MissingField {
                configuration,
                field,
            },
            CoreError::NoDeployAccount => CliError::NoDeployAccount,
            CoreError::NotInProfile { uuid, profile } => CliError::NotInProfile { uuid, profile },
            CoreError::Portal(inner) => inner.into(),
            CoreError::Prompt(source) => CliError::Io(source),
        }
    }
}

impl From<ProjectError> for CliError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound { searched } => CliError::NoProject {
                searched: searched.display().to_string(),
            },
            other => CliError::ProjectSettings(other),
        }
    }
}
