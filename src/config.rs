//! Configuration and color scheme management for textconsole.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.textconsole/config.toml`
//! - Console behavior options (prompt label, echo, trimming, buffer cap)
//! - Built-in color schemes and style-class colors for the terminal surface
//!
//! # Configuration File
//!
//! ```toml
//! prompt_label = "$ "
//! echo_on_submit = true
//! trim_input_on_submit = true
//! max_buffer_lines = 1000
//! greeting = "Welcome!"
//! initial_scroll_anchor = "end"   # or "top"
//! tab_expansion = "    "
//!
//! # Color scheme: default, solarized-dark, nord, tokyo-night
//! color_scheme = "nord"
//!
//! # Colors for style classes passed to print_styled
//! [styles]
//! error = "red"
//! info = "cyan"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default prompt label
pub const DEFAULT_PROMPT: &str = "> ";

/// Default replacement for a tab character
pub const DEFAULT_TABS: &str = "    ";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not determine config path")]
    NoConfigPath,
}

/// Where the view starts after mounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAnchor {
    #[default]
    End,
    Top,
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Text shown in front of the input field
    pub prompt_label: String,
    /// Copy submitted lines into the transcript
    pub echo_on_submit: bool,
    /// Trim whitespace from submitted lines
    pub trim_input_on_submit: bool,
    /// Transcript line cap, 0 = unbounded
    pub max_buffer_lines: usize,
    /// Printed on mount and reset
    pub greeting: String,
    pub initial_scroll_anchor: ScrollAnchor,
    /// Replacement for tab characters
    pub tab_expansion: String,
    /// Padding around the text area, in surface units
    pub padding: u16,
    /// Color scheme name
    pub color_scheme: String,
    /// Style class name -> color name
    pub styles: BTreeMap<String, String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt_label: DEFAULT_PROMPT.to_string(),
            echo_on_submit: true,
            trim_input_on_submit: true,
            max_buffer_lines: 0,
            greeting: String::new(),
            initial_scroll_anchor: ScrollAnchor::End,
            tab_expansion: DEFAULT_TABS.to_string(),
            padding: 0,
            color_scheme: "default".to_string(),
            styles: BTreeMap::new(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the default location, falling back to
    /// defaults if the file is missing or invalid
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(config) = Self::load_from(&path) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigPath)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| ConfigError::Write { path, source })
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }

    /// Color for a style class, if configured or built in
    pub fn style_color(&self, class: &str) -> Option<Color> {
        match self.styles.get(class) {
            Some(name) => Color::by_name(name),
            None => ColorScheme::builtin_class(class),
        }
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color name or `#rrggbb`
    pub fn by_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }
        let color = match name.as_str() {
            "black" => Self::new(0, 0, 0),
            "red" => Self::new(205, 49, 49),
            "green" => Self::new(13, 188, 121),
            "yellow" => Self::new(229, 229, 16),
            "blue" => Self::new(36, 114, 200),
            "magenta" => Self::new(188, 63, 188),
            "cyan" => Self::new(17, 168, 205),
            "white" => Self::new(229, 229, 229),
            "gray" | "grey" => Self::new(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    // Transcript colors
    pub output_bg: Color,
    pub output_fg: Color,

    // Prompt colors
    pub prompt_fg: Color,
    pub input_fg: Color,

    // Scroll indicator
    pub indicator_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),
            output_bg: Color::new(0, 0, 0),
            output_fg: Color::new(204, 204, 204),
            prompt_fg: Color::new(13, 188, 121),
            input_fg: Color::new(255, 255, 255),
            indicator_fg: Color::new(128, 128, 128),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            output_bg: Color::new(0, 43, 54),
            output_fg: Color::new(147, 161, 161),
            prompt_fg: Color::new(181, 137, 0),
            input_fg: Color::new(253, 246, 227),
            indicator_fg: Color::new(101, 123, 131),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            output_bg: Color::new(46, 52, 64),
            output_fg: Color::new(216, 222, 233),
            prompt_fg: Color::new(136, 192, 208),
            input_fg: Color::new(236, 239, 244),
            indicator_fg: Color::new(76, 86, 106),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),
            output_bg: Color::new(26, 27, 38),
            output_fg: Color::new(169, 177, 214),
            prompt_fg: Color::new(122, 162, 247),
            input_fg: Color::new(192, 202, 245),
            indicator_fg: Color::new(86, 95, 137),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "solarized-dark" | "solarized_dark" => Self::solarized_dark(),
            "nord" => Self::nord(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "solarized-dark", "nord", "tokyo-night"]
    }

    /// Colors for the style classes every scheme understands
    pub fn builtin_class(class: &str) -> Option<Color> {
        match class {
            "error" => Color::by_name("red"),
            "warning" => Color::by_name("yellow"),
            "info" => Color::by_name("cyan"),
            "success" => Color::by_name("green"),
            "muted" => Color::by_name("gray"),
            _ => None,
        }
    }
}

/// Per-user data directory, `~/.textconsole`
pub fn data_dir() -> Option<PathBuf> {
    let home = home_dir()?;
    let dir = home.join(".textconsole");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
