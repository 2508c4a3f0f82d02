pub mod config;
pub mod game;
pub mod progress;
pub mod quiz;
pub mod reference;
pub mod system;
pub mod worksheet;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(worksheet::definitions());
    commands.extend(quiz::definitions());
    commands.extend(game::definitions());
    commands.extend(progress::definitions());
    commands.extend(reference::definitions());
    commands.extend(config::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Parses a 1-based position typed by the user into a 0-based index.
pub(crate) fn parse_position(raw: &str, what: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "{what} must be a number starting at 1, got `{raw}`"
        ))),
    }
}

pub(crate) fn unknown_subcommand(command: &str, other: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown {command} subcommand `{other}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position("1", "entry").ok(), Some(0));
        assert_eq!(parse_position(" 3 ", "entry").ok(), Some(2));
        assert!(parse_position("0", "entry").is_err());
        assert!(parse_position("two", "entry").is_err());
    }

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<&str> = registry.names().collect();
        for expected in [
            "help", "version", "exit", "worksheet", "quiz", "answer", "game", "check", "retry",
            "next", "progress", "k1", "cases", "config",
        ] {
            assert_eq!(
                names.iter().filter(|name| **name == expected).count(),
                1,
                "{expected}"
            );
        }
    }
}
