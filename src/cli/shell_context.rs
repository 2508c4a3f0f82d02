use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use k1_config::{Config, ConfigManager};
use k1_content::Catalogue;
use k1_core::{
    Clock, GameSession, KeyValueStore, ProgressService, QuizSession, SnapshotService,
    WorksheetDraft,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// The quiz or game level currently being played, if any.
#[derive(Debug, Default)]
pub enum Activity {
    #[default]
    Idle,
    Quiz(QuizSession),
    Game(GameSession),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub catalogue: &'static Catalogue,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub snapshots: SnapshotService,
    pub progress: ProgressService,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub draft: WorksheetDraft,
    pub activity: Activity,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn prompt(&self) -> String {
        let activity = match &self.activity {
            Activity::Idle => String::new(),
            Activity::Quiz(session) => format!(" quiz:{}", session.quiz().id),
            Activity::Game(session) => format!(" level:{}", session.level_id()),
        };
        let worksheet = if self.draft.name.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.draft.name)
        };
        format!("k1{activity}{worksheet}> ")
    }
}
