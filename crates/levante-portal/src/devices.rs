//! Portal device operations.
//!
//! Device listing via `devices:list` (tabular output), registration via
//! `devices:add`, and provisioning-profile membership via
//! `profiles:manage:devices:add` / `profiles:manage:devices:remove`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::gateway::{Credentials, IosGateway};
use crate::profile;

/// One registered device as the portal reports it.
///
/// `uuid` is the stable identity. `name` and `enabled` are `None` when the
/// device is known only from a provisioning file's UUID list rather than a
/// full portal listing; when two records share a uuid, the most recent
/// source wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: Option<String>,
    pub uuid: String,
    pub enabled: Option<bool>,
}

/// Rows of `devices:list` output occupied by the header banner.
const HEADER_ROWS: usize = 5;

/// Trailing rows occupied by the table footer.
const FOOTER_ROWS: usize = 2;

impl IosGateway {
    /// List every device registered with the developer-portal account.
    ///
    /// `ios devices:list -u <id> -p <pw> [--team <team>]`
    pub async fn list_devices(&self, credentials: &Credentials) -> Result<Vec<Device>, Error> {
        let mut args = vec!["devices:list".to_owned()];
        args.extend(Self::auth_args(credentials));

        tracing::debug!("listing portal devices");
        let stdout = self.run(&args, None, self.timeout).await?;
        parse_device_table(&stdout).map_err(|reason| Error::UnexpectedOutput {
            program: self.program.clone(),
            reason,
        })
    }

    /// Register a new device with the developer-portal account.
    ///
    /// `ios devices:add <name>=<uuid> -u <id> -p <pw> [--team <team>]`
    pub async fn register_device(
        &self,
        credentials: &Credentials,
        name: &str,
        uuid: &str,
    ) -> Result<String, Error> {
        let mut args = vec!["devices:add".to_owned(), format!("{name}={uuid}")];
        args.extend(Self::auth_args(credentials));

        tracing::debug!(uuid, "registering device with the portal");
        self.run(&args, None, self.timeout).await
    }

    /// Add a registered device to the named provisioning profile.
    ///
    /// The profile is addressed by the display name read from the file at
    /// `profile_path`; `uuid` is resolved against `known` to recover the
    /// device's portal name. Call sites have already verified membership,
    /// so a miss is [`Error::DeviceNotFound`].
    pub async fn add_device_to_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, Error> {
        let profile = profile::read_profile(profile_path)?;
        let device = resolve_known(known, uuid).ok_or_else(|| Error::DeviceNotFound {
            uuid: uuid.to_owned(),
        })?;

        let mut args = vec![
            "profiles:manage:devices:add".to_owned(),
            profile.name,
            device_tuple(device, uuid),
        ];
        args.extend(Self::auth_args(credentials));

        tracing::debug!(uuid, profile = %profile_path.display(), "adding device to profile");
        self.run(&args, None, self.timeout).await
    }

    /// Remove a device from the named provisioning profile.
    ///
    /// Unlike [`Self::add_device_to_profile`], a uuid missing from `known`
    /// is an expected portal state ([`Error::NotInPortal`]): the profile
    /// file may authorize a device the portal has since forgotten.
    pub async fn remove_device_from_profile(
        &self,
        credentials: &Credentials,
        uuid: &str,
        profile_path: &Path,
        known: &[Device],
    ) -> Result<String, Error> {
        let profile = profile::read_profile(profile_path)?;
        let device = resolve_known(known, uuid).ok_or_else(|| Error::NotInPortal {
            uuid: uuid.to_owned(),
        })?;

        let mut args = vec![
            "profiles:manage:devices:remove".to_owned(),
            profile.name,
            device_tuple(device, uuid),
        ];
        args.extend(Self::auth_args(credentials));

        tracing::debug!(uuid, profile = %profile_path.display(), "removing device from profile");
        self.run(&args, None, self.timeout).await
    }
}

/// Find `uuid` in a device list, comparing trimmed uuids. Portal output is
/// known to carry incidental whitespace.
fn resolve_known<'a>(known: &'a [Device], uuid: &str) -> Option<&'a Device> {
    known.iter().find(|device| device.uuid.trim() == uuid)
}

/// The `<name>=<uuid>` argument of the profile-membership commands.
fn device_tuple(device: &Device, uuid: &str) -> String {
    let name = device.name.as_deref().map(str::trim).unwrap_or_default();
    format!("{name}={uuid}")
}

/// Parse the tabular `devices:list` output.
///
/// The first [`HEADER_ROWS`] and last [`FOOTER_ROWS`] lines are banner and
/// footer; each remaining row is `| name | uuid | enabled |` where the
/// enabled flag is exactly `Y` for an enabled device.
fn parse_device_table(stdout: &str) -> Result<Vec<Device>, String> {
    let lines: Vec<&str> = stdout.split('\n').collect();
    if lines.len() <= HEADER_ROWS + FOOTER_ROWS {
        return Ok(Vec::new());
    }

    lines[HEADER_ROWS..lines.len() - FOOTER_ROWS]
        .iter()
        .map(|line| {
            let fields: Vec<&str> = line
                .split('|')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect();
            match fields.as_slice() {
                [name, uuid, enabled, ..] => Ok(Device {
                    name: Some((*name).to_owned()),
                    uuid: (*uuid).to_owned(),
                    enabled: Some(*enabled == "Y"),
                }),
                _ => Err(format!("malformed device row: {line:?}")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Device, parse_device_table, resolve_known};

    /// A plausible `devices:list` transcript: five banner/header lines,
    /// data rows, then a two-line footer (no trailing newline).
    const LISTING: &str = "\
Listing devices...

+--------------------------------+------------------------------------------+---------+
| Name                           | UUID                                     | Enabled |
+--------------------------------+------------------------------------------+---------+
|  Kitchen iPad                  | 1e2ddcd7aba79a0a26ee5f2f97491d34db527bb4 | Y       |
| Old test phone                 | ffffdcd7aba79a0a26ee5f2f97491d34db527bb4 | N       |
+--------------------------------+------------------------------------------+---------+
2 devices found.";

    #[test]
    fn one_device_per_data_row() {
        let devices = parse_device_table(LISTING).expect("listing should parse");
        assert_eq!(
            devices,
            vec![
                Device {
                    name: Some("Kitchen iPad".into()),
                    uuid: "1e2ddcd7aba79a0a26ee5f2f97491d34db527bb4".into(),
                    enabled: Some(true),
                },
                Device {
                    name: Some("Old test phone".into()),
                    uuid: "ffffdcd7aba79a0a26ee5f2f97491d34db527bb4".into(),
                    enabled: Some(false),
                },
            ]
        );
    }

    #[test]
    fn enabled_requires_exact_y() {
        let listing = LISTING.replace("| Y ", "| yes ");
        let devices = parse_device_table(&listing).expect("listing should parse");
        assert_eq!(devices[0].enabled, Some(false));
    }

    #[test]
    fn short_output_yields_no_devices() {
        assert_eq!(parse_device_table("nothing here\n"), Ok(Vec::new()));
    }

    #[test]
    fn malformed_row_is_rejected() {
        let listing = LISTING.replace(
            "| Old test phone                 | ffffdcd7aba79a0a26ee5f2f97491d34db527bb4 | N       |",
            "| just-one-field |",
        );
        let err = parse_device_table(&listing).expect_err("row should be rejected");
        assert!(err.contains("malformed"), "{err}");
    }

    #[test]
    fn resolution_trims_portal_whitespace() {
        let devices = vec![Device {
            name: Some("Kitchen iPad".into()),
            uuid: " 1e2ddcd7 ".into(),
            enabled: Some(true),
        }];
        assert!(resolve_known(&devices, "1e2ddcd7").is_some());
        assert!(resolve_known(&devices, "other").is_none());
    }
}
