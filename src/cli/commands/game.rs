use k1_core::{GameAdvance, GameSession};
use k1_domain::Displayable;
use tracing::debug;

use super::unknown_subcommand;
use crate::cli::core::{Activity, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "game",
            "Play scenario levels that unlock one after another",
            "game [levels|play <level>|show|quit]",
            cmd_game,
        ),
        CommandEntry::new(
            "check",
            "Check answers for the current game question, one per field",
            "check <answer> [answer...]",
            cmd_check,
        ),
        CommandEntry::new(
            "retry",
            "Clear the last check and answer again",
            "retry",
            cmd_retry,
        ),
    ]
}

fn cmd_game(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return levels(context);
    }

    match args[0].to_lowercase().as_str() {
        "levels" | "list" => levels(context),
        "play" => {
            let level_id = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: game play <level>".into())
            })?;
            play(context, level_id)
        }
        "show" => match &context.activity {
            Activity::Game(session) => {
                print_question(session);
                Ok(())
            }
            _ => Err(CommandError::NoGame),
        },
        "quit" => {
            if !matches!(context.activity, Activity::Game(_)) {
                return Err(CommandError::NoGame);
            }
            context.activity = Activity::Idle;
            io::print_info("Level left. Progress on completed levels is kept.");
            Ok(())
        }
        other => Err(unknown_subcommand("game", other)),
    }
}

fn levels(context: &ShellContext) -> CommandResult {
    let levels = context.progress.game_levels(context.catalogue.levels())?;
    output_section("Game levels");
    for level in &levels {
        io::print_info(format!("  {}", level.display_label()));
    }
    io::print_info("Use `game play <level>` to start an unlocked level.");
    Ok(())
}

fn play(context: &mut ShellContext, level_id: &str) -> CommandResult {
    let level = context
        .progress
        .start_level(context.catalogue.levels(), level_id)?;
    let scenario = context.catalogue.scenario_for(&level.id);
    let session =
        GameSession::with_reveal_after(&level.id, scenario, context.config.reveal_after_attempts)?;

    output_section(format!("Level {}: {}", level.id, session.scenario().title));
    io::print_info(session.scenario().description.as_str());
    print_question(&session);
    debug!(level_id = %level.id, "level started");
    context.activity = Activity::Game(session);
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Activity::Game(session) = &mut context.activity else {
        return Err(CommandError::NoGame);
    };

    let outcome = session.check(args)?;
    for field in &outcome.fields {
        let mark = if field.correct { "ok" } else { "wrong" };
        io::print_info(format!("  {:<28} {:<12} {}", field.label, field.submitted, mark));
    }

    if outcome.correct {
        io::print_success("Correct!");
        io::print_info(format!("Explanation: {}", outcome.explanation));
        if outcome.level_cleared {
            let level_id = session.level_id().to_string();
            context
                .progress
                .complete_level(context.catalogue.levels(), &level_id)?;
            io::print_success(format!("Level {level_id} completed. The next level is unlocked."));
        }
        io::print_hint("Type `next` to continue.");
        return Ok(());
    }

    io::print_error(format!("Not quite. Attempts so far: {}.", outcome.attempts));
    if session.can_retry() {
        io::print_hint("Type `retry` to try again.");
    } else {
        let question = session.current_question();
        for field in &question.fields {
            io::print_info(format!("  {} = {}", field.label, field.expected));
        }
        io::print_info(format!("Explanation: {}", outcome.explanation));
        io::print_hint("Type `next` to move on.");
    }
    Ok(())
}

fn cmd_retry(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Activity::Game(session) = &mut context.activity else {
        return Err(CommandError::NoGame);
    };
    session.retry()?;
    print_question(session);
    Ok(())
}

pub(crate) fn advance_game(context: &mut ShellContext) -> CommandResult {
    let Activity::Game(session) = &mut context.activity else {
        return Err(CommandError::NoGame);
    };

    match session.advance()? {
        GameAdvance::Next { .. } => {
            print_question(session);
            Ok(())
        }
        GameAdvance::LevelFinished => {
            let cleared = session.is_cleared();
            let level_id = session.level_id().to_string();
            context.activity = Activity::Idle;
            output_section(format!("Level {level_id} finished"));
            if !cleared {
                io::print_info("Answer the last question correctly to complete this level.");
            }
            levels(context)
        }
    }
}

fn print_question(session: &GameSession) {
    let question = session.current_question();
    io::print_info(format!(
        "\nQuestion {} of {}: {}",
        session.current_index() + 1,
        session.scenario().questions.len(),
        question.prompt
    ));
    for (index, field) in question.fields.iter().enumerate() {
        io::print_info(format!("  {}. {}", index + 1, field.label));
    }
    io::print_hint("Type `check` followed by one answer per field, in order.");
}
