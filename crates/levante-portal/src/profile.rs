//! Provisioning-profile file reading.
//!
//! A `.mobileprovision` file is a CMS envelope wrapping an XML plist. The
//! reader does not touch the signature: it locates the embedded plist by
//! scanning for the `<plist` / `</plist>` byte windows and parses that
//! slice, which is enough to recover the display name, the profile kind,
//! and the authorized device UUIDs.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};
use serde::Serialize;

use crate::error::Error;

/// What kind of signing a profile authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Development,
    Distribution,
    AdHoc,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Development => "development",
            Self::Distribution => "distribution",
            Self::AdHoc => "adhoc",
        };
        f.write_str(label)
    }
}

/// Snapshot of one provisioning profile file.
///
/// `uuids` reflects the file contents as last read; the moment the portal
/// mutates the profile remotely this snapshot is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningProfile {
    pub name: String,
    pub kind: ProfileKind,
    pub uuids: BTreeSet<String>,
    pub path: PathBuf,
}

impl ProvisioningProfile {
    /// Trimmed-uuid membership test.
    pub fn authorizes(&self, uuid: &str) -> bool {
        self.uuids.iter().any(|known| known.trim() == uuid)
    }
}

/// Read and parse the provisioning profile at `path`.
pub fn read_profile(path: &Path) -> Result<ProvisioningProfile, Error> {
    let data = std::fs::read(path).map_err(|err| parse_error(path, err))?;
    let plist_data = extract_plist(&data).ok_or_else(|| Error::ProfileParse {
        path: path.to_owned(),
        reason: "no embedded plist found".into(),
    })?;
    let value = Value::from_reader_xml(plist_data).map_err(|err| parse_error(path, err))?;
    let dict = value.as_dictionary().ok_or_else(|| Error::ProfileParse {
        path: path.to_owned(),
        reason: "embedded plist is not a dictionary".into(),
    })?;

    let name = dict
        .get("Name")
        .and_then(Value::as_string)
        .ok_or_else(|| Error::ProfileParse {
            path: path.to_owned(),
            reason: "profile has no Name entry".into(),
        })?
        .to_owned();

    let provisioned = dict.get("ProvisionedDevices").and_then(Value::as_array);
    let uuids: BTreeSet<String> = provisioned
        .map(|devices| {
            devices
                .iter()
                .filter_map(Value::as_string)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let kind = profile_kind(dict, provisioned.is_some());

    Ok(ProvisioningProfile {
        name,
        kind,
        uuids,
        path: path.to_owned(),
    })
}

/// Classify the profile.
///
/// `ProvisionsAllDevices` marks an (enterprise) distribution profile. A
/// provisioned-device list plus the `get-task-allow` entitlement is a
/// development profile; the list without it is ad-hoc. No device list at
/// all means store distribution.
fn profile_kind(dict: &Dictionary, has_device_list: bool) -> ProfileKind {
    let provisions_all = dict
        .get("ProvisionsAllDevices")
        .and_then(Value::as_boolean)
        .unwrap_or(false);
    if provisions_all || !has_device_list {
        return ProfileKind::Distribution;
    }

    let get_task_allow = dict
        .get("Entitlements")
        .and_then(Value::as_dictionary)
        .and_then(|ent| ent.get("get-task-allow"))
        .and_then(Value::as_boolean)
        .unwrap_or(false);
    if get_task_allow {
        ProfileKind::Development
    } else {
        ProfileKind::AdHoc
    }
}

/// Locate the embedded XML plist inside the CMS envelope.
fn extract_plist(data: &[u8]) -> Option<&[u8]> {
    let start = data.windows(6).position(|window| window == b"<plist")?;
    let end = data.windows(8).rposition(|window| window == b"</plist>")? + 8;
    if end <= start {
        return None;
    }
    Some(&data[start..end])
}

fn parse_error(path: &Path, err: impl fmt::Display) -> Error {
    Error::ProfileParse {
        path: path.to_owned(),
        reason: err.to_string(),
    }
}
