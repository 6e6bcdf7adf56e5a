//! Platform command handlers.
//!
//! Thin orchestration over the external `cordova` toolchain: add, remove,
//! and update run `cordova platform <op>` inside the project's app
//! directory; list enumerates the platform directories on disk. The
//! declared platform set in `levante.json` is kept in sync.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use owo_colors::OwoColorize;

use levante_core::ProjectSettings;

use crate::cli::{GlobalOpts, PlatformsArgs, PlatformsCommand};
use crate::error::CliError;
use crate::output;

/// Which host operating systems can build each platform.
const OS_PLATFORMS: &[(&str, &[&str])] = &[
    ("ios", &["macos"]),
    ("android", &["macos", "linux", "windows"]),
    ("browser", &["macos", "linux", "windows"]),
];

pub async fn handle(
    root: &Path,
    mut settings: ProjectSettings,
    args: PlatformsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let app_dir = root.join(&settings.app_path);
    let color = output::should_color(&global.color);

    match args.command {
        PlatformsCommand::Add { platforms } => {
            let mut added = false;
            for spec in &platforms {
                let name = platform_name(spec);
                match host_support(name) {
                    Err(CliError::PlatformUnsupported { .. }) => {
                        tracing::warn!(platform = name, "platform not available on this host");
                        output::print_output(
                            &format!("skipping '{spec}': not available on this host"),
                            global.quiet,
                        );
                        continue;
                    }
                    other => other?,
                }

                run_cordova(&app_dir, &["platform", "add", spec]).await?;
                if !settings.platforms.iter().any(|p| platform_name(p) == name) {
                    settings.platforms.push(spec.clone());
                    added = true;
                }
                output::print_output(
                    &format!("platform {} added", paint(spec, color)),
                    global.quiet,
                );
            }
            if added {
                levante_project::save_settings(root, &settings)?;
            }
            Ok(())
        }

        PlatformsCommand::Remove { platforms } => {
            let mut removed = false;
            for spec in &platforms {
                let name = platform_name(spec).to_owned();
                run_cordova(&app_dir, &["platform", "remove", &name]).await?;
                let before = settings.platforms.len();
                settings.platforms.retain(|p| platform_name(p) != name);
                removed |= settings.platforms.len() != before;
                output::print_output(
                    &format!("cordova platform {} removed", paint(&name, color)),
                    global.quiet,
                );
            }
            if removed {
                levante_project::save_settings(root, &settings)?;
            }
            Ok(())
        }

        PlatformsCommand::Update { platforms } => {
            for spec in &platforms {
                run_cordova(&app_dir, &["platform", "update", spec]).await?;
                output::print_output(
                    &format!("platform {} updated", paint(spec, color)),
                    global.quiet,
                );
            }
            Ok(())
        }

        PlatformsCommand::List => {
            let installed = installed_platforms(&app_dir)?;
            let out = if color {
                installed
                    .iter()
                    .map(|p| p.green().to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                installed.join("\n")
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Check whether the `cordova` CLI answers `--version` within 5s.
pub async fn probe_cordova() -> bool {
    let mut cmd = tokio::process::Command::new("cordova");
    cmd.arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    let Ok(mut child) = cmd.spawn() else {
        return false;
    };
    match tokio::time::timeout(Duration::from_secs(5), child.wait()).await {
        Ok(Ok(status)) => status.success(),
        _ => false,
    }
}

/// Strip an `@version` suffix from a platform spec.
fn platform_name(spec: &str) -> &str {
    spec.split('@').next().unwrap_or(spec)
}

/// Fail on unknown platforms, and on platforms the current host cannot
/// build.
fn host_support(name: &str) -> Result<(), CliError> {
    let Some((_, hosts)) = OS_PLATFORMS.iter().find(|(platform, _)| *platform == name) else {
        return Err(CliError::PlatformUnknown {
            platform: name.to_owned(),
        });
    };
    if hosts.contains(&std::env::consts::OS) {
        Ok(())
    } else {
        Err(CliError::PlatformUnsupported {
            platform: name.to_owned(),
        })
    }
}

/// Run `cordova` in the app directory, discarding stdout like the
/// underlying toolchain's own spawn options do.
async fn run_cordova(app_dir: &Path, args: &[&str]) -> Result<(), CliError> {
    tracing::info!(?args, dir = %app_dir.display(), "invoking cordova");
    let mut cmd = tokio::process::Command::new("cordova");
    cmd.args(args)
        .current_dir(app_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|err| CliError::CordovaFailed {
        detail: format!("failed to spawn cordova: {err}"),
    })?;
    let output = child.wait_with_output().await?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let detail = if stderr.is_empty() {
        format!("exit status {}", output.status.code().unwrap_or(-1))
    } else {
        stderr.to_owned()
    };
    Err(CliError::CordovaFailed { detail })
}

/// The platform directories present under `<app>/platforms`.
fn installed_platforms(app_dir: &Path) -> Result<Vec<String>, CliError> {
    let platforms_dir = app_dir.join("platforms");
    if !platforms_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut installed: Vec<String> = std::fs::read_dir(&platforms_dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    installed.sort();
    Ok(installed)
}

fn paint(platform: &str, color: bool) -> String {
    if color {
        platform.green().to_string()
    } else {
        platform.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{host_support, installed_platforms, platform_name};
    use crate::error::CliError;

    #[test]
    fn version_suffix_is_stripped() {
        assert_eq!(platform_name("android@13"), "android");
        assert_eq!(platform_name("ios"), "ios");
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(matches!(
            host_support("webos"),
            Err(CliError::PlatformUnknown { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn ios_is_not_buildable_on_linux() {
        assert!(matches!(
            host_support("ios"),
            Err(CliError::PlatformUnsupported { .. })
        ));
        assert!(host_support("android").is_ok());
    }

    #[test]
    fn installed_platforms_lists_directories_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let platforms = dir.path().join("platforms");
        std::fs::create_dir_all(platforms.join("ios")).expect("mkdir ios");
        std::fs::create_dir_all(platforms.join("android")).expect("mkdir android");
        std::fs::write(platforms.join("platforms.json"), "{}").expect("write marker");

        let installed = installed_platforms(dir.path()).expect("listing succeeds");
        assert_eq!(installed, vec!["android", "ios"]);
    }

    #[test]
    fn missing_platforms_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let installed = installed_platforms(dir.path()).expect("listing succeeds");
        assert!(installed.is_empty());
    }
}
