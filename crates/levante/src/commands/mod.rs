//! Command handlers for the `levante` CLI.

use std::path::Path;

use levante_core::ProjectSettings;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub mod devices;
pub mod info;
pub mod platforms;

/// Dispatch a project-scoped command to its handler.
pub async fn dispatch(
    command: Command,
    root: &Path,
    settings: ProjectSettings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Devices(args) => devices::handle(root, &settings, args, global).await,
        Command::Platforms(args) => platforms::handle(root, settings, args, global).await,
        Command::Info => info::handle(&settings, global).await,
        Command::Completions(_) => unreachable!("completions are handled before project resolution"),
    }
}
