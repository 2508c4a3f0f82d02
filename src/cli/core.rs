//! Core CLI dispatch, shell context construction, and error reporting.

use std::{io, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use k1_config::{ConfigError, ConfigManager};
use k1_content::{Catalogue, ContentError};
use k1_core::{
    CoreError, KeyValueStore, ProgressService, SnapshotService, SystemClock, WorksheetDraft,
};
use k1_storage_json::JsonFileStore;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{error, info};

use super::commands;
use super::io as cli_io;
use super::output::{set_preferences, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{Activity, CliMode, ShellContext};
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

const STORAGE_FAILURE_NOTICE: &str =
    "Could not reach local storage. The last change may not have been saved.";

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let store_root = config_manager
            .load()?
            .resolve_data_root(paths::store_dir(&base));
        let store = JsonFileStore::new(store_root)?;
        Self::with_parts(mode, Arc::new(store), config_manager)
    }

    /// Builds a context over an explicit store and config location.
    pub fn with_parts(
        mode: CliMode,
        store: Arc<dyn KeyValueStore>,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let catalogue = Catalogue::bundled()?;
        let config = config_manager.load()?;
        set_preferences(OutputPreferences::from_config(&config));

        let clock: Arc<dyn k1_core::Clock> = Arc::new(SystemClock);
        let snapshots = SnapshotService::new(store.clone(), clock.clone());
        let progress = ProgressService::new(store.clone(), clock.clone());
        info!(?mode, "shell context ready");

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            catalogue,
            store,
            clock,
            snapshots,
            progress,
            config_manager,
            config,
            draft: WorksheetDraft::default(),
            activity: Activity::Idle,
            last_command: None,
            running: true,
        })
    }

    /// `(name, usage)` pairs driving tab completion.
    pub(crate) fn completion_entries(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        set_preferences(OutputPreferences::from_config(&self.config));
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());
        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Prints a command failure. Nothing here stops the shell.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(core) if core.is_storage_failure() => {
                error!(error = %core, "storage operation failed");
                cli_io::print_error(STORAGE_FAILURE_NOTICE);
            }
            CommandError::Io(io_err) => {
                error!(error = %io_err, "I/O failure");
                cli_io::print_error(STORAGE_FAILURE_NOTICE);
            }
            CommandError::Config(config_err) => {
                error!(error = %config_err, "configuration failure");
                cli_io::print_error(config_err.to_string());
            }
            other => cli_io::print_error(other.to_string()),
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("No quiz in progress. Use `quiz start <id>` first.")]
    NoQuiz,
    #[error("No level in progress. Use `game play <level>` first.")]
    NoGame,
    #[error("Nothing to move on from. Start a quiz or a game level first.")]
    NoActivity,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. } => {
                CommandError::InvalidArguments(err.to_string())
            }
            other => CommandError::Config(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Runs `lines` through a script-mode shell backed by `store`.
pub fn process_script(
    store: Arc<dyn KeyValueStore>,
    config_manager: ConfigManager,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_parts(CliMode::Script, store, config_manager)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
