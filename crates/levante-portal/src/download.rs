//! Profile downloading.
//!
//! `profiles:download` writes its result into the current working
//! directory, so the gateway scopes each download to an exclusively-owned
//! temporary directory and copies the single resulting file over the
//! configuration's declared path. The temp dir is released on success and
//! failure alike.

use std::path::Path;

use tempfile::TempDir;

use crate::error::Error;
use crate::gateway::{Credentials, IosGateway};

impl IosGateway {
    /// Fetch the named provisioning profile from the portal into `dest`.
    ///
    /// `ios profiles:download <name> -u <id> -p <pw> [--team <team>]
    /// --type distribution`, run inside a fresh temp dir. The downloaded
    /// file is named after the profile with hyphens stripped; it is staged
    /// next to `dest` and renamed into place, so readers of `dest` see the
    /// old content until the new file fully lands.
    pub async fn download_profile(
        &self,
        credentials: &Credentials,
        profile_name: &str,
        dest: &Path,
    ) -> Result<String, Error> {
        let scratch = match &self.tmp_root {
            Some(root) => TempDir::new_in(root),
            None => TempDir::new(),
        }?;

        let mut args = vec!["profiles:download".to_owned(), profile_name.to_owned()];
        args.extend(Self::auth_args(credentials));
        args.push("--type".to_owned());
        args.push("distribution".to_owned());

        tracing::debug!(profile = profile_name, "downloading provisioning profile");
        let stdout = self.run(&args, Some(scratch.path()), self.timeout).await?;

        let file_name = format!("{}.mobileprovision", profile_name.replace('-', ""));
        let fetched = scratch.path().join(&file_name);
        let staged = dest.with_extension("mobileprovision.partial");

        let copy = async {
            tokio::fs::copy(&fetched, &staged).await?;
            tokio::fs::rename(&staged, dest).await
        };
        copy.await.map_err(|source| Error::Copy {
            from: fetched.clone(),
            to: dest.to_owned(),
            source,
        })?;

        tracing::info!(profile = profile_name, dest = %dest.display(), "provisioning profile fetched");
        Ok(stdout)
    }
}
