//! Device reconciliation: attach, detach, and profile reporting.
//!
//! Each operation is one strictly sequential pass over the portal -- no two
//! external commands run concurrently, and any failure aborts the whole
//! sequence without rollback. The only mitigation in the flow is the
//! attach workflow's local repair of its device-list snapshot after
//! registering a new device.

use levante_portal::{Credentials, Device, ProfileKind};
use serde::Serialize;

use crate::config::ProjectSettings;
use crate::error::CoreError;
use crate::portal::Portal;

/// Which attach branch ran, for user-facing reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The device was already registered with the portal account.
    AlreadyRegistered,
    /// The device was unknown and has been registered under `name`.
    Registered { name: String },
}

/// What a configuration's provisioning file declares, without any portal
/// lookup: device entries carry only uuids.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub name: String,
    pub kind: ProfileKind,
    pub devices: Vec<Device>,
}

/// Brings a device's membership in a provisioning profile into the
/// desired state.
pub struct ReconcileEngine<'a, P: Portal> {
    portal: &'a P,
    settings: &'a ProjectSettings,
}

impl<'a, P: Portal> ReconcileEngine<'a, P> {
    pub fn new(portal: &'a P, settings: &'a ProjectSettings) -> Self {
        Self { portal, settings }
    }

    /// Ensure `uuid` is registered with the portal account and present in
    /// the named configuration's provisioning profile, then refresh the
    /// local profile copy.
    ///
    /// `ask_device_name` is invoked exactly once, and only when the device
    /// is not yet known to the portal.
    pub async fn attach(
        &self,
        credentials: &Credentials,
        uuid: &str,
        configuration: &str,
        ask_device_name: impl FnOnce() -> std::io::Result<String>,
    ) -> Result<AttachOutcome, CoreError> {
        let binding = self.settings.ios_profile(configuration)?;

        let mut devices = self.portal.list_devices(credentials).await?;
        let known = devices.iter().any(|device| device.uuid.trim() == uuid);

        let outcome = if known {
            tracing::debug!(uuid, "device already registered with the developer portal");
            AttachOutcome::AlreadyRegistered
        } else {
            tracing::debug!(uuid, "device unknown to the developer portal");
            let name = ask_device_name()?;
            self.portal
                .register_device(credentials, &name, uuid)
                .await?;
            // The listing snapshot predates the registration; repair it
            // locally instead of re-querying the portal, which may not
            // have propagated the new device yet.
            devices.push(Device {
                name: Some(name.clone()),
                uuid: uuid.to_owned(),
                enabled: Some(true),
            });
            AttachOutcome::Registered { name }
        };

        self.portal
            .add_device_to_profile(credentials, uuid, &binding.path, &devices)
            .await?;
        self.portal
            .download_profile(credentials, &binding.name, &binding.path)
            .await?;

        Ok(outcome)
    }

    /// Remove `uuid` from the named configuration's provisioning profile
    /// and refresh the local copy. The device stays registered with the
    /// portal account.
    pub async fn detach(
        &self,
        credentials: &Credentials,
        uuid: &str,
        configuration: &str,
    ) -> Result<(), CoreError> {
        let binding = self.settings.ios_profile(configuration)?;

        let profile = self.portal.read_profile(&binding.path)?;
        if !profile.authorizes(uuid) {
            return Err(CoreError::NotInProfile {
                uuid: uuid.to_owned(),
                profile: profile.name,
            });
        }

        // The profile file may authorize a device the portal has since
        // forgotten; that surfaces as NotInPortal from the remove call.
        let devices = self.portal.list_devices(credentials).await?;
        self.portal
            .remove_device_from_profile(credentials, uuid, &binding.path, &devices)
            .await?;
        self.portal
            .download_profile(credentials, &binding.name, &binding.path)
            .await?;

        Ok(())
    }

    /// Report what the named configuration's provisioning file declares.
    /// Pure read -- no credentials, no portal mutation.
    pub fn profile_report(&self, configuration: &str) -> Result<ProfileReport, CoreError> {
        let binding = self.settings.ios_profile(configuration)?;
        let profile = self.portal.read_profile(&binding.path)?;
        let devices = profile
            .uuids
            .iter()
            .map(|uuid| Device {
                name: None,
                uuid: uuid.clone(),
                enabled: None,
            })
            .collect();
        Ok(ProfileReport {
            name: profile.name,
            kind: profile.kind,
            devices,
        })
    }

    /// All devices the portal account knows. Pure read.
    pub async fn list_devices(&self, credentials: &Credentials) -> Result<Vec<Device>, CoreError> {
        Ok(self.portal.list_devices(credentials).await?)
    }

    /// Register a device with the portal account without touching any
    /// provisioning profile.
    pub async fn register_device(
        &self,
        credentials: &Credentials,
        name: &str,
        uuid: &str,
    ) -> Result<String, CoreError> {
        Ok(self
            .portal
            .register_device(credentials, name, uuid)
            .await?)
    }
}
