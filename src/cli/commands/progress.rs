use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "progress",
        "Show quiz results and unlocked game levels",
        "progress",
        cmd_progress,
    )]
}

fn cmd_progress(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let overview = context.progress.overview(context.catalogue.quizzes())?;
    output_section("Your progress");
    io::print_info(format!(
        "  Overall score    : {}%",
        overview.overall_percentage
    ));
    io::print_info(format!(
        "  Quizzes completed: {} of {}",
        overview.completed, overview.available
    ));

    if overview.rows.is_empty() {
        io::print_info("  No quiz results yet. Try `quiz list`.");
    }
    for row in &overview.rows {
        io::print_info(format!(
            "  {:<40} {}/{} ({}%)  {}",
            row.title,
            row.result.score,
            row.result.total_questions,
            row.result.percentage(),
            row.result.date.format("%Y-%m-%d")
        ));
    }

    let levels = context.progress.game_levels(context.catalogue.levels())?;
    let completed = levels.iter().filter(|level| level.completed).count();
    io::print_info(format!(
        "  Game levels      : {} of {} completed",
        completed,
        levels.len()
    ));
    Ok(())
}
