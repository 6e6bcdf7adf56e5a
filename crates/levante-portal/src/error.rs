use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `levante-portal` crate.
///
/// Covers every failure mode at the boundary to the outside world:
/// external command execution, device-listing output parsing, provisioning
/// file reading, and profile downloading. `levante-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Command execution ───────────────────────────────────────────
    /// The external command exited with a non-zero status.
    #[error("`{program}` exited with status {code}: {stderr}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// The external command did not finish within the allotted time.
    /// The child process has been killed.
    #[error("`{program}` timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The external command produced more output than the gateway is
    /// willing to buffer. The child process has been killed.
    #[error("`{program}` produced more than {limit} bytes of output")]
    OutputOverflow { program: String, limit: usize },

    /// The external command could not be started at all.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The availability probe failed -- the external tool is not installed
    /// or not responding.
    #[error("the `{program}` command is not available")]
    Unavailable { program: String },

    /// The command succeeded but its output did not match the expected
    /// shape.
    #[error("unexpected `{program}` output: {reason}")]
    UnexpectedOutput { program: String, reason: String },

    // ── Device resolution ───────────────────────────────────────────
    /// The device UUID was expected in the caller-supplied device list
    /// but is absent. Call sites validate membership first, so hitting
    /// this is a broken precondition, not a portal condition.
    #[error("device {uuid} is not in the known device list")]
    DeviceNotFound { uuid: String },

    /// The device is listed in the local provisioning file but the portal
    /// no longer knows it. Expected and recoverable -- surfaced to the
    /// caller without retry.
    #[error("device {uuid} is not registered in the developer portal")]
    NotInPortal { uuid: String },

    // ── Provisioning files ──────────────────────────────────────────
    /// The provisioning profile file is missing, unreadable, or does not
    /// contain a well-formed embedded plist.
    #[error("cannot read provisioning profile {path}: {reason}")]
    ProfileParse { path: PathBuf, reason: String },

    /// Copying the freshly downloaded profile into place failed.
    #[error("cannot copy provisioning profile from {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Filesystem ──────────────────────────────────────────────────
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` when the failure is an expected portal state
    /// (rather than an execution or parsing problem).
    pub fn is_not_in_portal(&self) -> bool {
        matches!(self, Self::NotInPortal { .. })
    }
}
