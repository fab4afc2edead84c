//! Configuration stored as `config.json` in the devbox home directory.
//!
//! The home directory is `$DEVBOX_HOME` when set, otherwise the platform
//! config directory. History lives next to the config as `history.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use devbox_convert::units::CssContext;
use devbox_idcard::{GenerateOptions, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CliError;
use crate::output::OutputFormat;

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// History file name.
const HISTORY_FILE: &str = "history.json";

/// Overrides the home directory.
pub const HOME_ENV: &str = "DEVBOX_HOME";

/// Get the devbox home directory.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("dev", "devbox", "devbox")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn history_path(home: &Path) -> PathBuf {
    home.join(HISTORY_FILE)
}

/// CLI configuration. Every field has a default, so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: OutputFormat,
    pub history_enabled: bool,
    pub history_limit: usize,
    pub idcard: IdCardConfig,
    pub password: PasswordConfig,
    pub css: CssConfig,
    /// Offset for zone-less dates and local renderings, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCardConfig {
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub length: usize,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub root_font_px: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            history_enabled: true,
            history_limit: devbox_store::DEFAULT_HISTORY_LIMIT,
            idcard: IdCardConfig::default(),
            password: PasswordConfig::default(),
            css: CssConfig::default(),
            utc_offset_minutes: 8 * 60,
        }
    }
}

impl Default for IdCardConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            length: 16,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl Default for CssConfig {
    fn default() -> Self {
        let ctx = CssContext::default();
        Self {
            root_font_px: ctx.root_font_px,
            viewport_width: ctx.viewport_width,
            viewport_height: ctx.viewport_height,
        }
    }
}

/// Keys accepted by `devbox config set`.
pub const KEYS: &[&str] = &[
    "format",
    "history_enabled",
    "history_limit",
    "idcard.start_year",
    "idcard.end_year",
    "password.length",
    "password.symbols",
    "password.exclude_ambiguous",
    "css.root_font_px",
    "css.viewport_width",
    "css.viewport_height",
    "utc_offset_minutes",
];

impl Config {
    /// Load config from `home`, or return the default when absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = config_path(home);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to `home` with owner-only permissions.
    pub fn save(&self, home: &Path) -> Result<()> {
        let path = config_path(home);
        let contents = serde_json::to_string_pretty(self)?;
        devbox_store::write_atomic(&path, contents.as_bytes())
            .with_context(|| format!("Failed to write config to {:?}", path))
    }

    /// Updates one dotted key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CliError> {
        let value = value.trim();
        match key {
            "format" => {
                self.format = OutputFormat::from_str(value, true)
                    .map_err(|reason| invalid(key, reason))?
            }
            "history_enabled" => self.history_enabled = parse(key, value)?,
            "history_limit" => {
                let limit: usize = parse(key, value)?;
                if !(1..=devbox_store::MAX_HISTORY_LIMIT).contains(&limit) {
                    return Err(invalid(
                        key,
                        format!("must be between 1 and {}", devbox_store::MAX_HISTORY_LIMIT),
                    ));
                }
                self.history_limit = limit;
            }
            "idcard.start_year" => self.idcard.start_year = parse(key, value)?,
            "idcard.end_year" => self.idcard.end_year = parse(key, value)?,
            "password.length" => {
                let length: usize = parse(key, value)?;
                if !(devbox_codec::password::MIN_LENGTH..=devbox_codec::password::MAX_LENGTH)
                    .contains(&length)
                {
                    return Err(invalid(
                        key,
                        format!(
                            "must be between {} and {}",
                            devbox_codec::password::MIN_LENGTH,
                            devbox_codec::password::MAX_LENGTH
                        ),
                    ));
                }
                self.password.length = length;
            }
            "password.symbols" => self.password.symbols = parse(key, value)?,
            "password.exclude_ambiguous" => self.password.exclude_ambiguous = parse(key, value)?,
            "css.root_font_px" => self.css.root_font_px = positive(key, value)?,
            "css.viewport_width" => self.css.viewport_width = positive(key, value)?,
            "css.viewport_height" => self.css.viewport_height = positive(key, value)?,
            "utc_offset_minutes" => {
                let minutes: i32 = parse(key, value)?;
                if minutes.abs() > 18 * 60 {
                    return Err(invalid(key, "must be within ±1080 minutes"));
                }
                self.utc_offset_minutes = minutes;
            }
            other => return Err(CliError::UnknownConfigKey(other.to_string())),
        }
        Ok(())
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            start_year: self.idcard.start_year,
            end_year: self.idcard.end_year,
            ..Default::default()
        }
    }

    pub fn css_context(&self) -> CssContext {
        CssContext {
            root_font_px: self.css.root_font_px,
            parent_font_px: self.css.root_font_px,
            viewport_width: self.css.viewport_width,
            viewport_height: self.css.viewport_height,
        }
    }
}

fn invalid(key: &str, reason: impl ToString) -> CliError {
    CliError::InvalidConfigValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| invalid(key, e))
}

fn positive(key: &str, value: &str) -> Result<f64, CliError> {
    let v: f64 = parse(key, value)?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(key, "must be a positive number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.idcard.start_year, 1970);
        assert!(config.history_enabled);
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            r#"{"format": "json", "password": {"length": 24}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.password.length, 24);
        assert!(config.password.symbols);
        assert_eq!(config.history_limit, devbox_store::DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("devbox");
        let mut config = Config::default();
        config.set("history_limit", "50").unwrap();
        config.set("css.root_font_px", "10").unwrap();
        config.save(&home).unwrap();

        let loaded = Config::load(&home).unwrap();
        assert_eq!(loaded.history_limit, 50);
        assert_eq!(loaded.css_context().root_font_px, 10.0);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("history_limit", "0"),
            Err(CliError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("password.length", "lots"),
            Err(CliError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("utc_offset_minutes", "2000"),
            Err(CliError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(CliError::UnknownConfigKey(_))
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn every_listed_key_is_settable() {
        let samples = [
            "json", "false", "10", "1980", "1990", "20", "false", "true", "18", "1280", "720",
            "-300",
        ];
        let mut config = Config::default();
        for (key, value) in KEYS.iter().zip(samples) {
            config.set(key, value).unwrap();
        }
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.utc_offset_minutes, -300);
        assert_eq!(config.generate_options().start_year, 1980);
    }
}
