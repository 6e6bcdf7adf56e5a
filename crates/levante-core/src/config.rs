//! Project settings model.
//!
//! Serde mirror of `levante.json`. These structs are read-only inputs for
//! the duration of one command: the reconciliation engine never writes
//! them back. Lookups are explicit and typed -- a missing configuration or
//! attribute is an error value, not a `None` deep in a key path.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level project settings (`levante.json`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectSettings {
    /// Project display name.
    pub name: Option<String>,

    /// Cordova platforms declared for this project (e.g. `ios`,
    /// `android@13`).
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Directory of the embedded Cordova app, relative to the project
    /// root.
    #[serde(default = "default_app_path")]
    pub app_path: String,

    /// Developer-portal deploy account.
    pub deploy: Option<DeploySettings>,

    /// Named build configurations, per platform.
    #[serde(default)]
    pub configurations: Configurations,
}

fn default_app_path() -> String {
    "app".into()
}

/// The portal account this project deploys with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploySettings {
    pub apple_id: String,
    pub apple_developer_team: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Configurations {
    #[serde(default)]
    pub ios: BTreeMap<String, IosConfiguration>,
}

/// One named iOS build configuration.
///
/// Both provisioning attributes must be present before any reconciliation
/// operation runs against the configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IosConfiguration {
    pub provisioning_profile_name: Option<String>,
    pub provisioning_profile_path: Option<String>,
}

/// The validated provisioning pair of one iOS configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBinding {
    /// Portal-side display name of the profile.
    pub name: String,
    /// Authoritative on-disk location of the profile file.
    pub path: PathBuf,
}

impl ProjectSettings {
    /// The deploy account, or [`CoreError::NoDeployAccount`].
    pub fn deploy_account(&self) -> Result<&DeploySettings, CoreError> {
        self.deploy.as_ref().ok_or(CoreError::NoDeployAccount)
    }

    /// Resolve an iOS configuration to its validated profile binding.
    pub fn ios_profile(&self, configuration: &str) -> Result<ProfileBinding, CoreError> {
        let conf = self.configurations.ios.get(configuration).ok_or_else(|| {
            CoreError::ConfigurationNotFound {
                name: configuration.to_owned(),
            }
        })?;
        let name = conf
            .provisioning_profile_name
            .clone()
            .ok_or(CoreError::MissingField {
                configuration: configuration.to_owned(),
                field: "provisioning_profile_name",
            })?;
        let path = conf
            .provisioning_profile_path
            .clone()
            .ok_or(CoreError::MissingField {
                configuration: configuration.to_owned(),
                field: "provisioning_profile_path",
            })?;
        Ok(ProfileBinding {
            name,
            path: PathBuf::from(path),
        })
    }
}
