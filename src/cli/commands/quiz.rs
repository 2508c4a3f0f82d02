use k1_core::{feedback_for, CoreError, QuizAdvance, QuizSession};
use k1_domain::{percentage, Displayable, QuizQuestion};
use tracing::{debug, error};

use super::{game, parse_position, unknown_subcommand};
use crate::cli::core::{Activity, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "quiz",
            "Browse and take multiple-choice quizzes",
            "quiz [list|start <id>|show|quit]",
            cmd_quiz,
        ),
        CommandEntry::new(
            "answer",
            "Answer the current quiz question",
            "answer <option number>",
            cmd_answer,
        ),
        CommandEntry::new(
            "next",
            "Move to the next quiz question or game step",
            "next",
            cmd_next,
        ),
    ]
}

fn cmd_quiz(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return list(context);
    }

    match args[0].to_lowercase().as_str() {
        "list" => list(context),
        "start" => start(context, args.get(1).copied()),
        "show" => match &context.activity {
            Activity::Quiz(session) => {
                print_question(session);
                Ok(())
            }
            _ => Err(CommandError::NoQuiz),
        },
        "quit" => {
            if !matches!(context.activity, Activity::Quiz(_)) {
                return Err(CommandError::NoQuiz);
            }
            context.activity = Activity::Idle;
            io::print_info("Quiz abandoned. Nothing was recorded.");
            Ok(())
        }
        other => Err(unknown_subcommand("quiz", other)),
    }
}

fn list(context: &ShellContext) -> CommandResult {
    let results = context.progress.quiz_results()?;
    output_section("Quizzes");
    for quiz in context.catalogue.quizzes() {
        let last = results
            .get(&quiz.id)
            .map(|result| {
                format!(
                    " | last score {}/{} ({}%)",
                    result.score,
                    result.total_questions,
                    result.percentage()
                )
            })
            .unwrap_or_default();
        io::print_info(format!("  {:<14} {}{}", quiz.id, quiz.display_label(), last));
    }
    io::print_info("Use `quiz start <id>` to begin.");
    Ok(())
}

fn start(context: &mut ShellContext, id: Option<&str>) -> CommandResult {
    let id = match id {
        Some(id) => id.to_string(),
        None if context.can_prompt() => {
            let quizzes = context.catalogue.quizzes();
            let labels: Vec<String> = quizzes.iter().map(Displayable::display_label).collect();
            match io::select_item(&context.theme, "Choose a quiz", &labels)? {
                Some(index) => quizzes[index].id.clone(),
                None => {
                    io::print_info("Operation cancelled.");
                    return Ok(());
                }
            }
        }
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: quiz start <id>".into(),
            ))
        }
    };

    let quiz = context
        .catalogue
        .quiz(&id)
        .cloned()
        .ok_or_else(|| CoreError::QuizNotFound(id.clone()))?;
    let session = QuizSession::new(quiz)?;
    output_section(session.quiz().title.as_str());
    io::print_info(session.quiz().description.as_str());
    print_question(&session);
    debug!(quiz_id = %id, "quiz started");
    context.activity = Activity::Quiz(session);
    Ok(())
}

fn cmd_answer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: answer <option number>".into())
    })?;
    let option = parse_position(raw, "option")?;
    let Activity::Quiz(session) = &mut context.activity else {
        return Err(CommandError::NoQuiz);
    };

    let feedback = session.answer(option)?;
    let question = session.current_question();
    if feedback.correct {
        io::print_success("Correct!");
    } else {
        io::print_error(format!(
            "Incorrect. The answer is {}. {}",
            feedback.correct_option + 1,
            question.correct_text().unwrap_or_default()
        ));
    }
    io::print_info(format!("Explanation: {}", feedback.explanation));
    io::print_hint("Type `next` to continue.");
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.activity {
        Activity::Quiz(_) => advance_quiz(context),
        Activity::Game(_) => game::advance_game(context),
        Activity::Idle => Err(CommandError::NoActivity),
    }
}

fn advance_quiz(context: &mut ShellContext) -> CommandResult {
    let Activity::Quiz(session) = &mut context.activity else {
        return Err(CommandError::NoQuiz);
    };

    match session.advance()? {
        QuizAdvance::Next { .. } => {
            print_question(session);
            Ok(())
        }
        QuizAdvance::Finished { score, total } => {
            let quiz_id = session.quiz().id.clone();
            context.activity = Activity::Idle;
            let report = match context.progress.record_quiz_result(&quiz_id, score, total) {
                Ok(report) => Some(report),
                Err(err) if err.is_storage_failure() => {
                    error!(quiz_id = %quiz_id, error = %err, "quiz result not saved");
                    None
                }
                Err(err) => return Err(err.into()),
            };

            let percent = percentage(score.into(), total.into());
            output_section("Quiz complete");
            io::print_info(format!("  Score: {}/{} ({}%)", score, total, percent));
            io::print_info(format!("  {}", feedback_for(percent)));
            let Some(report) = report else {
                io::print_warning("Your score could not be saved to local storage.");
                return Ok(());
            };
            match report.previous {
                Some(previous) if report.new_best => io::print_success(format!(
                    "New best! Previous score was {}/{}.",
                    previous.score, previous.total_questions
                )),
                Some(previous) => io::print_info(format!(
                    "  Previous score: {}/{}.",
                    previous.score, previous.total_questions
                )),
                None => io::print_success("First attempt recorded."),
            }
            Ok(())
        }
    }
}

fn print_question(session: &QuizSession) {
    let question: &QuizQuestion = session.current_question();
    io::print_info(format!(
        "\nQuestion {} of {}: {}",
        session.current_index() + 1,
        session.total_questions(),
        question.prompt
    ));
    for (index, option) in question.options.iter().enumerate() {
        io::print_info(format!("  {}. {}", index + 1, option));
    }
    io::print_hint("Type `answer <number>` to choose.");
}
