use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Arc Command: Arc-style keyboard shortcuts for a Chromium-family browser.
#[derive(Parser, Debug)]
#[command(name = "arc-command", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every shortcut with its combo and whether it is enabled.
    Shortcuts {
        /// Platform whose combos to show (mac, windows, linux).
        #[arg(long)]
        platform: Option<String>,
    },

    /// Show which shortcuts a combo maps to and which one fires.
    Resolve {
        /// Combo such as "Cmd+Shift+T" or "ctrl+tab".
        combo: String,
        #[arg(long)]
        platform: Option<String>,
    },

    /// Read or change the persisted settings.
    Settings {
        /// Settings file override.
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Drive the whole extension against a simulated browser, one combo per
    /// stdin line. `type <text>` types into the overlay.
    Simulate {
        #[arg(long)]
        platform: Option<String>,
        /// Start with arc mode off.
        #[arg(long)]
        inert: bool,
        /// Use the settings file instead of throwaway in-memory storage.
        #[arg(long)]
        persist: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    ArcMode {
        #[arg(value_enum)]
        state: Toggle,
    },
    Enable {
        id: String,
    },
    Disable {
        id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

pub fn parse() -> Args {
    Args::parse()
}
