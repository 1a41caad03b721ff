//! Configuration for conscope.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.conscope/config.toml`
//! - The terminal settings read by console sessions
//! - Descriptors for presenting the settings in a configuration surface
//!
//! # Configuration File
//!
//! ```toml
//! [terminal]
//! # Adjust cursor shape and visibility while editing
//! adjust_cursor_style = true
//!
//! # Who handles the mouse: "off" (the terminal), "on" (conscope) or "auto"
//! mouse_input = "auto"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config path")]
    NoHomeDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terminal negotiation settings
    pub terminal: TerminalConfig,
}

/// Terminal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub adjust_cursor_style: bool,
    pub mouse_input: MouseInput,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            adjust_cursor_style: true,
            mouse_input: MouseInput::Off,
        }
    }
}

/// Who handles mouse input while editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "MouseInputValue")]
pub enum MouseInput {
    /// The terminal handles the mouse (text selection etc).
    #[default]
    Off,
    /// The editor handles the mouse.
    On,
    /// The editor handles the mouse unless the terminal reserves it for
    /// quick-edit selection.
    Auto,
}

impl MouseInput {
    pub const NAMES: &'static str = "off,on,auto";

    pub fn as_str(&self) -> &'static str {
        match self {
            MouseInput::Off => "off",
            MouseInput::On => "on",
            MouseInput::Auto => "auto",
        }
    }

    fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(MouseInput::Off),
            1 => Some(MouseInput::On),
            2 => Some(MouseInput::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for MouseInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MouseInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "off" => Ok(MouseInput::Off),
            "on" => Ok(MouseInput::On),
            "auto" => Ok(MouseInput::Auto),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(Self::from_index)
                .ok_or_else(|| format!("Invalid mouse input '{}', expected one of {}", s, Self::NAMES)),
        }
    }
}

/// Accepts either a name or the numeric index of the option.
#[derive(Deserialize)]
#[serde(untagged)]
enum MouseInputValue {
    Name(String),
    Index(i64),
}

impl TryFrom<MouseInputValue> for MouseInput {
    type Error = String;

    fn try_from(value: MouseInputValue) -> Result<Self, Self::Error> {
        match value {
            MouseInputValue::Name(name) => name.parse(),
            MouseInputValue::Index(index) => Self::from_index(index)
                .ok_or_else(|| format!("Invalid mouse input index {}, expected 0-2", index)),
        }
    }
}

/// Metadata describing a setting for a configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub name: &'static str,
    pub summary: &'static str,
    pub details: &'static str,
    /// Allowed values for enumerated settings
    pub options: Option<&'static str>,
}

pub const ADJUST_CURSOR_STYLE: SettingDescriptor = SettingDescriptor {
    name: "terminal.adjust_cursor_style",
    summary: "Adjust the cursor shape and visibility",
    details: "When enabled the editor changes the cursor size to show insert or\n\
              overwrite mode and hides the cursor while redrawing. Disable it to\n\
              keep the cursor shape configured in the terminal's own properties.",
    options: None,
};

pub const MOUSE_INPUT: SettingDescriptor = SettingDescriptor {
    name: "terminal.mouse_input",
    summary: "Mouse input handling",
    details: "'off' leaves the mouse to the terminal.\n\
              'on' lets the editor handle clicks in the input line.\n\
              'auto' does the same in ConEmu, and in the Windows console when\n\
              Quick Edit mode is turned off.",
    options: Some(MouseInput::NAMES),
};

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHomeDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings exposed to a configuration surface
    pub fn descriptors() -> [SettingDescriptor; 2] {
        [ADJUST_CURSOR_STYLE, MOUSE_INPUT]
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        let dir = config_dir()?;
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Some(dir.join("config.toml"))
    }
}

/// `~/.conscope`
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".conscope"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.terminal.adjust_cursor_style);
        assert_eq!(config.terminal.mouse_input, MouseInput::Off);
    }

    #[test]
    fn test_parse_terminal_section() {
        let config = Config::parse(
            "[terminal]\nadjust_cursor_style = false\nmouse_input = \"Auto\"\n",
        )
        .unwrap();
        assert!(!config.terminal.adjust_cursor_style);
        assert_eq!(config.terminal.mouse_input, MouseInput::Auto);

        let config = Config::parse("[terminal]\nmouse_input = 1\n").unwrap();
        assert_eq!(config.terminal.mouse_input, MouseInput::On);
    }

    #[test]
    fn test_invalid_mouse_input() {
        assert!(Config::parse("[terminal]\nmouse_input = \"sometimes\"\n").is_err());
        assert!(Config::parse("[terminal]\nmouse_input = 7\n").is_err());
        assert!("".parse::<MouseInput>().is_err());
        assert_eq!(" on ".parse::<MouseInput>(), Ok(MouseInput::On));
        assert_eq!("2".parse::<MouseInput>(), Ok(MouseInput::Auto));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("conscope-test-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.terminal.mouse_input = MouseInput::Auto;
        config.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("mouse_input = \"auto\""));
        assert_eq!(Config::load_from(&path).unwrap(), config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_descriptors() {
        let names: Vec<_> = Config::descriptors().iter().map(|d| d.name).collect();
        assert_eq!(names, ["terminal.adjust_cursor_style", "terminal.mouse_input"]);
        assert_eq!(MOUSE_INPUT.options, Some("off,on,auto"));
    }
}
