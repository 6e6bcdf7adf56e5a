//! Trait seam over the developer-portal gateway.
//!
//! The reconciliation engine only ever sees this trait, so tests drive it
//! with a recording stub while the binary wires in the real
//! [`IosGateway`].

use std::path::Path;

use levante_portal::{Credentials, Device, Error as PortalError, IosGateway, ProvisioningProfile};

/// The portal operations the reconciliation engine depends on.
///
/// Semantics (timeouts, output caps, single-shot execution, the
/// `DeviceNotFound` / `NotInPortal` distinction) are fixed by the
/// implementations in `levante-portal`; substitutes must honor them.
#[allow(async_fn_in_trait)]
pub trait Portal {
    async fn list_devices(&self, credentials: &Credentials) -> Result<Vec<Device>, PortalError>;

    async fn register_device(
        &self,
        credentials: &Credentials,
        name: &str,
        uuid: &str,
    ) -> Result<String, PortalError>;

    async fn add_device_to_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, PortalError>;

    async fn remove_device_from_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, PortalError>;

    async fn download_profile(
        &self,
        credentials: &Credentials,
        profile_name: &str,
        dest: &Path,
    ) -> Result<String, PortalError>;

    fn read_profile(&self, path: &Path) -> Result<ProvisioningProfile, PortalError>;
}

impl Portal for IosGateway {
    async fn list_devices(&self, credentials: &Credentials) -> Result<Vec<Device>, PortalError> {
        IosGateway::list_devices(self, credentials).await
    }

    async fn register_device(
        &self,
        credentials: &Credentials,
        name: &str,
        uuid: &str,
    ) -> Result<String, PortalError> {
        IosGateway::register_device(self, credentials, name, uuid).await
    }

    async fn add_device_to_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, PortalError> {
        IosGateway::add_device_to_profile(self, credentials, uuid, profile_path, known).await
    }

    async fn remove_device_from_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, PortalError> {
        IosGateway::remove_device_from_profile(self, credentials, uuid, profile_path, known).await
    }

    async fn download_profile(
        &self,
        credentials: &Credentials,
        profile_name: &str,
        dest: &Path,
    ) -> Result<String, PortalError> {
        IosGateway::download_profile(self, credentials, profile_name, dest).await
    }

    fn read_profile(&self, path: &Path) -> Result<ProvisioningProfile, PortalError> {
        levante_portal::read_profile(path)
    }
}
