//! Project and toolchain overview.

use owo_colors::OwoColorize;

use levante_core::{IosGateway, ProjectSettings};

use crate::cli::GlobalOpts;
use crate::commands::platforms;
use crate::error::CliError;
use crate::output;

pub async fn handle(settings: &ProjectSettings, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut lines = Vec::new();

    lines.push(entry("levante version:", env!("CARGO_PKG_VERSION"), color));
    lines.push(entry(
        "project:",
        settings.name.as_deref().unwrap_or("(unnamed)"),
        color,
    ));
    lines.push(entry("app path:", &settings.app_path, color));

    let platforms = if settings.platforms.is_empty() {
        "(none)".to_owned()
    } else {
        settings.platforms.join(", ")
    };
    lines.push(entry("platforms:", &platforms, color));

    if settings.configurations.ios.is_empty() {
        lines.push(entry("ios configurations:", "(none)", color));
    } else {
        lines.push(entry("ios configurations:", "", color));
        for (name, conf) in &settings.configurations.ios {
            let profile = conf
                .provisioning_profile_name
                .as_deref()
                .unwrap_or("(no provisioning profile)");
            lines.push(format!("  {name} -> {profile}"));
        }
    }

    let ios_available = IosGateway::new().probe().await.is_ok();
    let cordova_available = platforms::probe_cordova().await;
    lines.push(entry("ios command:", availability(ios_available), color));
    lines.push(entry(
        "cordova command:",
        availability(cordova_available),
        color,
    ));

    output::print_output(&lines.join("\n"), global.quiet);
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available { "available" } else { "not available" }
}

fn entry(label: &str, value: &str, color: bool) -> String {
    if color {
        format!("{:<22} {value}", label.green())
    } else {
        format!("{label:<22} {value}")
    }
}
