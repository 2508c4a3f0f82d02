use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::debug;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

pub const SCRIPT_ENV: &str = "K1_TUTOR_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context.completion_entries());
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output_info("Welcome to the K-1 tutor. Type `help` to get started.");

    loop {
        if !context.running {
            break;
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    debug!(line, "dispatching command line");
    match context.process_line(line) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, then the subcommands listed in each command's usage.
struct CommandHelper {
    commands: BTreeMap<String, Vec<String>>,
}

impl CommandHelper {
    fn new(entries: Vec<(&'static str, &'static str)>) -> Self {
        let commands = entries
            .into_iter()
            .map(|(name, usage)| (name.to_ascii_lowercase(), subcommands(usage)))
            .collect();
        Self { commands }
    }

    fn candidates<'a>(
        &self,
        words: impl Iterator<Item = &'a String>,
        needle: &str,
    ) -> Vec<Pair> {
        words
            .filter(|word| word.starts_with(needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect()
    }
}

/// Alternatives inside the first `[a|b <arg>|c]` group of a usage line.
fn subcommands(usage: &str) -> Vec<String> {
    let Some(open) = usage.find('[') else {
        return Vec::new();
    };
    let Some(close) = usage.rfind(']') else {
        return Vec::new();
    };
    let group = &usage[open + 1..close];
    if !group.contains('|') {
        return Vec::new();
    }
    let mut words: Vec<String> = group
        .split('|')
        .filter_map(|option| option.split_whitespace().next())
        .filter(|word| word.chars().all(|ch| ch.is_ascii_lowercase()))
        .map(str::to_string)
        .collect();
    words.sort();
    words.dedup();
    words
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let earlier: Vec<&str> = prefix[..start].split_whitespace().collect();

        let candidates = match earlier.as_slice() {
            [] => self.candidates(self.commands.keys(), &needle),
            [command] => match self.commands.get(&command.to_ascii_lowercase()) {
                Some(subcommands) => self.candidates(subcommands.iter(), &needle),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"worksheet add increase 5000 "Capital contribution""#)
            .expect("parse");
        assert_eq!(
            tokens,
            vec!["worksheet", "add", "increase", "5000", "Capital contribution"]
        );
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"k1 search "open"#).is_err());
    }

    #[test]
    fn usage_groups_yield_subcommands() {
        assert_eq!(
            subcommands("config [show|set <key> <value>]"),
            vec!["set", "show"]
        );
        assert_eq!(
            subcommands("game [levels|play <level>|show|quit]"),
            vec!["levels", "play", "quit", "show"]
        );
        assert!(subcommands("help [command]").is_empty());
        assert!(subcommands("answer <option number>").is_empty());
    }

    #[test]
    fn helper_lowercases_command_names() {
        let helper = CommandHelper::new(vec![("Quiz", "quiz [list|start <id>]"), ("next", "next")]);
        assert_eq!(
            helper.commands.get("quiz").cloned(),
            Some(vec!["list".to_string(), "start".to_string()])
        );
        assert!(helper.commands["next"].is_empty());
    }
}
