//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Snapshot, share and re-apply component configuration presets
#[derive(Parser, Debug)]
#[command(name = "cfgsnap", version)]
pub struct CliArgs {
    /// Application config file (defaults to <config dir>/cfgsnap/config.json)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, overriding RUST_LOG and the config file
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored presets, marking the ones live state matches
    List,

    /// Print one preset in detail
    Show { preset: String },

    /// Capture every live component into a new preset
    Snapshot { name: String },

    /// Create a preset with no configs
    Create { name: String },

    Delete { preset: String },

    Rename { preset: String, name: String },

    /// Bind a key combination, or clear the binding when none is given
    Bind {
        preset: String,
        combo: Option<String>,
    },

    /// Load the preset automatically when focus is gained or lost
    FocusTrigger {
        preset: String,
        #[arg(value_enum)]
        when: FocusTrigger,
    },

    /// Re-read every stored config of a preset from live state
    Update { preset: String },

    /// Print the sharing text of a preset, or write it to a file
    Export {
        preset: String,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Import a preset from sharing text in a file, or stdin when no file is given
    Import { file: Option<PathBuf> },

    /// Write a preset into live state
    Apply { preset: String },

    /// Simulate a key press: applies the next preset bound to the combination
    Press { combo: String },

    /// Simulate a focus change
    Focus {
        #[arg(value_enum)]
        change: FocusChange,
    },

    /// Edit one preset
    Edit {
        preset: String,
        #[command(subcommand)]
        op: EditOp,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditOp {
    /// Store a whole live component config
    AddConfig { component: String },

    RemoveConfig { component: String },

    /// Store one live setting of a component
    AddSetting {
        component: String,
        key: String,
        /// Store the setting with no value, so any live value matches
        #[arg(long)]
        any: bool,
    },

    RemoveSetting { component: String, key: String },

    /// Assert the enabled state of a component
    SetEnabled {
        component: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Stop asserting the enabled state of a component
    ClearEnabled { component: String },

    /// Store a setting written as <group>.<key>=<value>
    AddCustom { component: String, raw: String },

    /// Re-read one stored config from live state
    Refresh { component: String },

    /// Re-read every stored config from live state
    RefreshAll,

    ToggleLocal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FocusTrigger {
    Gain,
    Lose,
    Off,
}

impl FocusTrigger {
    pub fn as_option(self) -> Option<bool> {
        match self {
            FocusTrigger::Gain => Some(true),
            FocusTrigger::Lose => Some(false),
            FocusTrigger::Off => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FocusChange {
    Gained,
    Lost,
}
