use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use k1_config::{Config, Theme};
use k1_domain::{rust_decimal::RoundingStrategy, Decimal};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub screen_reader_mode: bool,
    pub high_contrast_mode: bool,
    pub color_enabled: bool,
    pub icons: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            screen_reader_mode: false,
            high_contrast_mode: false,
            color_enabled: true,
            icons: true,
        }
    }
}

impl OutputPreferences {
    pub fn from_config(config: &Config) -> Self {
        Self {
            screen_reader_mode: config.accessibility.plain_output,
            high_contrast_mode: config.accessibility.high_contrast,
            color_enabled: config.ui_color_enabled,
            icons: config.theme == Theme::Iconic && !config.accessibility.plain_output,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[✓]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Hint => ("HINT", "[?]"),
        MessageKind::Section => ("INFO", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => text,
        _ => {
            let (label, icon) = build_label(kind);
            if icon.is_empty() || !prefs.icons {
                format!("{label}: {text}")
            } else {
                format!("{label}: {icon} {text}")
            }
        }
    };

    if prefs.screen_reader_mode || !prefs.color_enabled {
        return formatted;
    }

    if prefs.high_contrast_mode {
        return match kind {
            MessageKind::Success
            | MessageKind::Warning
            | MessageKind::Error
            | MessageKind::Section => formatted.bold().to_string(),
            _ => formatted,
        };
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Formats an amount with two decimals, e.g. `-$10000.00`.
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{symbol}{:.2}", rounded.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_sign_before_symbol() {
        assert_eq!(format_money(Decimal::from(20000), "$"), "$20000.00");
        assert_eq!(format_money(Decimal::from(-10000), "$"), "-$10000.00");
        assert_eq!(format_money(Decimal::new(12345, 3), "€"), "€12.35");
        assert_eq!(format_money(Decimal::new(-1, 3), "$"), "$0.00");
    }

    #[test]
    fn plain_output_drops_icons_and_color() {
        let prefs = OutputPreferences {
            screen_reader_mode: true,
            high_contrast_mode: false,
            color_enabled: true,
            icons: false,
        };
        assert_eq!(
            apply_style(MessageKind::Warning, "careful", &prefs),
            "WARNING: careful"
        );
        assert_eq!(apply_style(MessageKind::Section, " Quiz ", &prefs), "=== Quiz ===");
    }
}
