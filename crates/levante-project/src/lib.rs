//! Project settings loading.
//!
//! A levante project is any directory holding a `levante.json` file. The
//! settings are deserialized through figment so `LEVANTE_`-prefixed
//! environment variables can override individual values (double
//! underscore as the path separator, e.g. `LEVANTE_DEPLOY__APPLE_ID`).
//!
//! Reconciliation treats the settings as read-only; only the platform
//! commands write them back, via [`save_settings`].

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json},
};
use thiserror::Error;

use levante_core::ProjectSettings;

/// File name marking a project root.
pub const SETTINGS_FILE: &str = "levante.json";

/// Environment prefix for settings overrides.
const ENV_PREFIX: &str = "LEVANTE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no {SETTINGS_FILE} found (searched upward from {searched})")]
    NotFound { searched: PathBuf },

    #[error("failed to load {SETTINGS_FILE}: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to serialize {SETTINGS_FILE}: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ProjectError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Project discovery ───────────────────────────────────────────────

/// Walk upward from `start` until a directory containing
/// [`SETTINGS_FILE`] is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut dir = start;
    loop {
        if dir.join(SETTINGS_FILE).is_file() {
            return Ok(dir.to_owned());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                return Err(ProjectError::NotFound {
                    searched: start.to_owned(),
                });
            }
        }
    }
}

// ── Settings loading / saving ───────────────────────────────────────

/// Load the settings of the project rooted at `root`.
pub fn load_settings(root: &Path) -> Result<ProjectSettings, ProjectError> {
    let path = root.join(SETTINGS_FILE);
    if !path.is_file() {
        return Err(ProjectError::NotFound {
            searched: root.to_owned(),
        });
    }

    tracing::debug!(path = %path.display(), "loading project settings");
    let figment = Figment::new()
        .merge(Json::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let settings: ProjectSettings = figment.extract()?;
    Ok(settings)
}

/// Serialize `settings` back to the project's `levante.json`.
pub fn save_settings(root: &Path, settings: &ProjectSettings) -> Result<(), ProjectError> {
    let path = root.join(SETTINGS_FILE);
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json + "\n")?;
    Ok(())
}
