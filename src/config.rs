//! Configuration file support
//!
//! Loads settings from ~/.blocklex.toml (or %USERPROFILE%\.blocklex.toml
//! on Windows). Read once at startup.
//!
//! Example:
//! ```toml
//! line-numbers = true
//! tab-width = 8
//!
//! [styles.keyword]
//! color = "#0000ff"
//! weight = "bold"
//!
//! [styles.comment]
//! color = "darkGreen"
//! slant = "italic"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use toml::{Table, Value};

use crate::error::{Error, Result};
use crate::syntax::{Color, Slant, StyleClass, StyleTable, Weight};

const FILE_NAME: &str = ".blocklex.toml";

/// Configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Style for each class
    pub styles: StyleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            tab_width: 4,
            styles: StyleTable::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(FILE_NAME))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(FILE_NAME))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file gives the defaults; a broken one is reported and
    /// also gives the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let table: Table = contents
            .parse()
            .map_err(|e: toml::de::Error| Error::Config(e.message().to_string()))?;
        let mut config = Config::default();
        config.apply(&table)?;
        Ok(config)
    }

    /// Apply settings from a parsed table
    fn apply(&mut self, table: &Table) -> Result<()> {
        for (key, value) in table {
            match key.as_str() {
                "line-numbers" => self.show_line_numbers = expect_bool(key, value)?,
                "tab-width" => {
                    let n = value
                        .as_integer()
                        .ok_or_else(|| Error::Config(format!("{} must be an integer", key)))?;
                    self.tab_width = n.clamp(1, 16) as usize; // Between 1 and 16
                }
                "styles" => {
                    let styles = value
                        .as_table()
                        .ok_or_else(|| Error::Config("styles must be a table".to_string()))?;
                    self.styles = parse_styles(styles)?;
                }
                other => warn!("unknown configuration key: {}", other),
            }
        }
        Ok(())
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::Config(format!("{} must be true or false", key)))
}

fn expect_str<'a>(class: &str, key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::Config(format!("styles.{}.{} must be a string", class, key)))
}

/// Parse `[styles.<class>]` tables over the default styles
fn parse_styles(styles: &Table) -> Result<StyleTable> {
    let mut overrides = Vec::with_capacity(styles.len());

    for (name, value) in styles {
        let class = StyleClass::from_name(name).ok_or_else(|| Error::UnknownStyle(name.clone()))?;
        let entry = value
            .as_table()
            .ok_or_else(|| Error::Config(format!("styles.{} must be a table", name)))?;

        let mut style = class.default_style();
        if let Some(value) = entry.get("color") {
            style.fg = Color::parse(expect_str(name, "color", value)?)?;
        }
        if let Some(value) = entry.get("weight") {
            let weight = expect_str(name, "weight", value)?;
            style.weight = Weight::parse(weight)
                .ok_or_else(|| Error::Config(format!("unknown weight: {}", weight)))?;
        }
        if let Some(value) = entry.get("slant") {
            let slant = expect_str(name, "slant", value)?;
            style.slant = Slant::parse(slant)
                .ok_or_else(|| Error::Config(format!("unknown slant: {}", slant)))?;
        }
        overrides.push((class, style));
    }

    Ok(StyleTable::with_overrides(overrides))
}
