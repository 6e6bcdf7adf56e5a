// levante-portal: everything that talks to the outside world -- the `ios`
// command-line tool, provisioning profile files, and the download scratch
// space. Higher layers never spawn processes or parse profiles themselves.

pub mod devices;
pub mod download;
pub mod error;
pub mod gateway;
pub mod profile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use devices::Device;
pub use error::Error;
pub use gateway::{COMMAND_TIMEOUT, Credentials, IosGateway, MAX_OUTPUT_BYTES, PROBE_TIMEOUT};
pub use profile::{ProfileKind, ProvisioningProfile, read_profile};
