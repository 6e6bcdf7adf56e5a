//! Device command handlers.
//!
//! `list` / `add` / `attach` / `detach` against the developer portal. Each
//! handler validates the configuration before touching the gateway, then
//! prompts for the portal password once and runs a single reconciliation
//! pass.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use secrecy::SecretString;

use levante_core::{AttachOutcome, Credentials, IosGateway, ProjectSettings, ReconcileEngine};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Environment override for the portal password, for non-interactive use.
const PASSWORD_ENV: &str = "LEVANTE_APPLE_PASSWORD";

pub async fn handle(
    root: &Path,
    settings: &ProjectSettings,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = rebase_profiles(settings, root);
    let gateway = IosGateway::new();
    let engine = ReconcileEngine::new(&gateway, &settings);
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List {
            configuration: Some(configuration),
        } => {
            // Pure file read -- no portal lookup, no credentials.
            let report = engine.profile_report(&configuration)?;
            let out = output::render_profile_report(&global.output, &report, color);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::List {
            configuration: None,
        } => {
            gateway.probe().await?;
            let credentials = resolve_credentials(&settings)?;
            let pb = spinner("listing portal devices", global.quiet);
            let devices = engine.list_devices(&credentials).await;
            pb.finish_and_clear();

            let out = output::render_devices(&global.output, &devices?);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { name, uuid } => {
            gateway.probe().await?;
            let credentials = resolve_credentials(&settings)?;
            let pb = spinner("registering device", global.quiet);
            let result = engine.register_device(&credentials, &name, &uuid).await;
            pb.finish_and_clear();
            result?;

            let msg = format!("device {} registered as '{name}'", paint(&uuid, color));
            output::print_output(&msg, global.quiet);
            Ok(())
        }

        DevicesCommand::Attach {
            uuid,
            configuration,
        } => {
            // Fail on an unusable configuration before any portal call.
            settings.ios_profile(&configuration)?;
            gateway.probe().await?;
            let credentials = resolve_credentials(&settings)?;

            let pb = spinner("reconciling device with the developer portal", global.quiet);
            let outcome = engine
                .attach(&credentials, &uuid, &configuration, || {
                    pb.suspend(ask_device_name)
                })
                .await;
            pb.finish_and_clear();

            match outcome? {
                AttachOutcome::AlreadyRegistered => {
                    tracing::info!(%uuid, "device already in the developer portal");
                }
                AttachOutcome::Registered { name } => {
                    let msg = format!("device registered as '{name}'");
                    output::print_output(&msg, global.quiet);
                }
            }
            let msg = format!(
                "device {} attached to '{configuration}'; provisioning profile refreshed",
                paint(&uuid, color)
            );
            output::print_output(&msg, global.quiet);
            Ok(())
        }

        DevicesCommand::Detach {
            uuid,
            configuration,
        } => {
            settings.ios_profile(&configuration)?;
            let credentials = resolve_credentials(&settings)?;

            let pb = spinner("reconciling device with the developer portal", global.quiet);
            let result = engine.detach(&credentials, &uuid, &configuration).await;
            pb.finish_and_clear();
            result?;

            let msg = format!(
                "device {} detached from '{configuration}'; provisioning profile refreshed",
                paint(&uuid, color)
            );
            output::print_output(&msg, global.quiet);
            Ok(())
        }
    }
}

/// Profile paths in `levante.json` are relative to the project root;
/// rebase them so the engine sees absolute paths regardless of the
/// invocation directory.
fn rebase_profiles(settings: &ProjectSettings, root: &Path) -> ProjectSettings {
    let mut settings = settings.clone();
    for conf in settings.configurations.ios.values_mut() {
        if let Some(path) = conf.provisioning_profile_path.take() {
            let rebased = if Path::new(&path).is_absolute() {
                path
            } else {
                root.join(PathBuf::from(path)).display().to_string()
            };
            conf.provisioning_profile_path = Some(rebased);
        }
    }
    settings
}

/// Build one-invocation credentials: account and team from the project's
/// deploy section, password from the environment override or an
/// interactive prompt. Never persisted.
fn resolve_credentials(settings: &ProjectSettings) -> Result<Credentials, CliError> {
    let deploy = settings.deploy_account()?;
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Apple developer password: ")?,
    };
    Ok(Credentials {
        apple_id: deploy.apple_id.clone(),
        team: deploy.apple_developer_team.clone(),
        password: SecretString::from(password),
    })
}

fn ask_device_name() -> std::io::Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt("Device name")
        .interact_text()
        .map_err(std::io::Error::other)
}

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn paint(uuid: &str, color: bool) -> String {
    if color {
        uuid.yellow().to_string()
    } else {
        uuid.to_owned()
    }
}
