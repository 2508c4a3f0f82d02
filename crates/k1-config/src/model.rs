use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, path::PathBuf};

use crate::ConfigError;

/// Learner preferences for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// Game checks allowed before the learner may move on without a correct answer.
    #[serde(default = "Config::default_reveal_after_attempts")]
    pub reveal_after_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_worksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accessibility: AccessibilitySettings::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            currency_symbol: Self::default_currency_symbol(),
            reveal_after_attempts: Self::default_reveal_after_attempts(),
            last_worksheet: None,
            data_root: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "theme",
        "ui_color_enabled",
        "plain_output",
        "high_contrast",
        "currency_symbol",
        "reveal_after_attempts",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_reveal_after_attempts() -> u32 {
        2
    }

    /// Directory holding stored records: `data_root` when set, otherwise `default`.
    pub fn resolve_data_root(&self, default: PathBuf) -> PathBuf {
        self.data_root.clone().unwrap_or(default)
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "theme" => self.theme = Theme::from_str(value),
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            "plain_output" => self.accessibility.plain_output = parse_flag(key, value)?,
            "high_contrast" => self.accessibility.high_contrast = parse_flag(key, value)?,
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "must not be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            "reveal_after_attempts" => {
                let attempts: u32 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a whole number"))?;
                if attempts == 0 {
                    return Err(invalid(key, value, "must be at least 1"));
                }
                self.reveal_after_attempts = attempts;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("theme", self.theme.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("plain_output", self.accessibility.plain_output.to_string()),
            ("high_contrast", self.accessibility.high_contrast.to_string()),
            ("currency_symbol", self.currency_symbol.clone()),
            (
                "reveal_after_attempts",
                self.reveal_after_attempts.to_string(),
            ),
            (
                "last_worksheet",
                self.last_worksheet.clone().unwrap_or_else(|| "-".into()),
            ),
        ]
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected on/off")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Plain,
    #[default]
    Iconic,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_str(v.trim()))
            .unwrap_or_default()
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Theme::Plain,
            _ => Theme::Iconic,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Plain => "plain",
            Theme::Iconic => "iconic",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub high_contrast: bool,
}
