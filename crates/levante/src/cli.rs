//! Clap derive structures for the `levante` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// levante -- Cordova build platforms and iOS provisioning from the command line
#[derive(Debug, Parser)]
#[command(
    name = "levante",
    version,
    about = "Manage Cordova build platforms and iOS provisioning profiles",
    long_about = "A command-line helper for Cordova-based mobile projects.\n\n\
        Drives the Apple developer portal through the `ios` command-line\n\
        tool to keep devices and provisioning profiles in sync, and wraps\n\
        the `cordova` toolchain for platform management.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Project directory (defaults to searching upward from the current
    /// directory for levante.json)
    #[arg(long, short = 'C', env = "LEVANTE_PROJECT_DIR", global = true)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LEVANTE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage portal devices and provisioning-profile membership
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage Cordova build platforms
    #[command(alias = "plat", alias = "p")]
    Platforms(PlatformsArgs),

    /// Show project and toolchain information
    Info,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List portal devices, or the devices a configuration's profile
    /// authorizes
    #[command(alias = "ls")]
    List {
        /// Build configuration whose provisioning profile should be
        /// inspected instead of the portal account
        configuration: Option<String>,
    },

    /// Register a device with the developer-portal account
    Add {
        /// Human-readable device name
        name: String,

        /// Device UUID
        uuid: String,
    },

    /// Register a device if needed and add it to a configuration's
    /// provisioning profile
    Attach {
        /// Device UUID
        uuid: String,

        /// Build configuration to attach the device to
        configuration: String,
    },

    /// Remove a device from a configuration's provisioning profile
    Detach {
        /// Device UUID
        uuid: String,

        /// Build configuration to detach the device from
        configuration: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PLATFORMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PlatformsArgs {
    #[command(subcommand)]
    pub command: PlatformsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlatformsCommand {
    /// Add Cordova platforms to the project
    Add {
        /// Platforms to add (e.g. `ios`, `android@13`)
        #[arg(required = true)]
        platforms: Vec<String>,
    },

    /// Remove Cordova platforms from the project
    #[command(alias = "rm")]
    Remove {
        /// Platforms to remove
        #[arg(required = true)]
        platforms: Vec<String>,
    },

    /// Update installed Cordova platforms
    Update {
        /// Platforms to update
        #[arg(required = true)]
        platforms: Vec<String>,
    },

    /// List the platforms installed in the Cordova app directory
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
