//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders device listings and profile reports in the format selected by
//! `--output`. Table uses `tabled`, structured formats use serde, plain
//! emits one uuid per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use levante_core::Device;
use levante_core::engine::ProfileReport;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Device> for DeviceRow {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name.clone().unwrap_or_else(|| "-".into()),
            uuid: device.uuid.clone(),
            enabled: match device.enabled {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a device list in the chosen format.
pub fn render_devices(format: &OutputFormat, devices: &[Device]) -> String {
    match format {
        OutputFormat::Table => {
            let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(devices, false),
        OutputFormat::JsonCompact => render_json(devices, true),
        OutputFormat::Yaml => render_yaml(devices),
        OutputFormat::Plain => devices
            .iter()
            .map(|device| device.uuid.trim().to_owned())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a profile report. Table mode gets a colored headline above the
/// device table; structured modes serialize the whole report.
pub fn render_profile_report(
    format: &OutputFormat,
    report: &ProfileReport,
    color: bool,
) -> String {
    match format {
        OutputFormat::Table => {
            let headline = if color {
                format!(
                    "Provisioning profile {} ({})",
                    report.name.cyan(),
                    report.kind.yellow()
                )
            } else {
                format!("Provisioning profile {} ({})", report.name, report.kind)
            };
            if report.devices.is_empty() {
                return format!("{headline}\nNo devices authorized.");
            }
            let rows: Vec<DeviceRow> = report.devices.iter().map(DeviceRow::from).collect();
            format!("{headline}\n{}", render_table(&rows))
        }
        OutputFormat::Json => render_json(report, false),
        OutputFormat::JsonCompact => render_json(report, true),
        OutputFormat::Yaml => render_yaml(report),
        OutputFormat::Plain => report
            .devices
            .iter()
            .map(|device| device.uuid.trim().to_owned())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|err| format!("serialization error: {err}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|err| format!("serialization error: {err}"))
}

#[cfg(test)]
mod tests {
    use levante_core::Device;

    use super::render_devices;
    use crate::cli::OutputFormat;

    fn devices() -> Vec<Device> {
        vec![
            Device {
                name: Some("Kitchen iPad".into()),
                uuid: "111".into(),
                enabled: Some(true),
            },
            Device {
                name: None,
                uuid: "222".into(),
                enabled: None,
            },
        ]
    }

    #[test]
    fn table_mode_renders_all_rows() {
        let out = render_devices(&OutputFormat::Table, &devices());
        assert!(out.contains("Kitchen iPad"), "{out}");
        assert!(out.contains("111"), "{out}");
        assert!(out.contains("222"), "{out}");
    }

    #[test]
    fn plain_mode_is_one_uuid_per_line() {
        let out = render_devices(&OutputFormat::Plain, &devices());
        assert_eq!(out, "111\n222");
    }

    #[test]
    fn json_mode_round_trips() {
        let out = render_devices(&OutputFormat::Json, &devices());
        let parsed: Vec<Device> = serde_json::from_str(&out).expect("valid JSON");
        assert_eq!(parsed.len(), 2);
    }
}
