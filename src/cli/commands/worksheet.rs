use k1_core::{BasisSummary, WorksheetDraft, WorksheetService};
use k1_domain::{EntryDirection, NEGATIVE_BASIS_WARNING};
use tracing::info;

use super::{parse_position, unknown_subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{format_money, section as output_section};
use crate::cli::registry::CommandEntry;

const USAGE: &str = "worksheet [show|start <amount>|add <increase|decrease> [amount] [description]|amount <n> <value>|describe <n> <text>|remove <n>|name <name>|save [name]|load [name]|list|clear]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "worksheet",
        "Track partner basis with a running ledger",
        USAGE,
        cmd_worksheet,
    )]
}

fn cmd_worksheet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context);
    }

    let rest = &args[1..];
    match args[0].to_lowercase().as_str() {
        "show" => show(context),
        "start" => set_start(context, rest),
        "add" => add(context, rest),
        "amount" => set_amount(context, rest),
        "describe" => describe(context, rest),
        "remove" => remove(context, rest),
        "name" => rename(context, rest),
        "save" => save(context, rest),
        "load" => load(context, rest),
        "list" => list(context),
        "clear" => clear(context),
        other => Err(unknown_subcommand("worksheet", other)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let symbol = context.config.currency_symbol.as_str();
    let worksheet = &context.draft.worksheet;
    let summary = BasisSummary::of(worksheet);

    let title = if context.draft.name.is_empty() {
        "Basis worksheet".to_string()
    } else {
        format!("Basis worksheet: {}", context.draft.name)
    };
    output_section(title);
    io::print_info(format!(
        "  Starting basis : {}",
        format_money(summary.starting, symbol)
    ));

    if worksheet.items.is_empty() {
        io::print_info("  No entries yet. Use `worksheet add increase|decrease`.");
    }
    for (position, entry) in worksheet.items.iter().enumerate() {
        let description = if entry.description.trim().is_empty() {
            "(no description)"
        } else {
            entry.description.as_str()
        };
        let sign = match entry.direction {
            EntryDirection::Increase => '+',
            EntryDirection::Decrease => '-',
        };
        io::print_info(format!(
            "  {:>2}. {} {:<30} {}",
            position + 1,
            sign,
            description,
            format_money(entry.amount_value(), symbol)
        ));
    }

    io::print_info(format!(
        "  Increases      : {}",
        format_money(summary.increases, symbol)
    ));
    io::print_info(format!(
        "  Decreases      : {}",
        format_money(summary.decreases, symbol)
    ));
    io::print_info(format!(
        "  Ending basis   : {}",
        format_money(summary.total, symbol)
    ));
    if summary.status.is_invalid() {
        io::print_warning(NEGATIVE_BASIS_WARNING);
    }
    Ok(())
}

fn set_start(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = args.join(" ");
    WorksheetService::set_starting_value(&mut context.draft.worksheet, value.trim());
    io::print_success(format!(
        "Starting basis set to {}.",
        format_money(
            context.draft.worksheet.starting_value(),
            &context.config.currency_symbol
        )
    ));
    Ok(())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let direction = args
        .first()
        .and_then(|label| EntryDirection::from_label(label))
        .ok_or_else(|| {
            CommandError::InvalidArguments(
                "usage: worksheet add <increase|decrease> [amount] [description]".into(),
            )
        })?;
    let amount = args.get(1).copied().unwrap_or_default();
    let description = args.get(2..).map(|words| words.join(" ")).unwrap_or_default();

    WorksheetService::add_entry_with(&mut context.draft.worksheet, direction, description, amount);
    let position = context.draft.worksheet.items.len();
    io::print_success(format!("{direction} entry {position} added."));
    report_total(context);
    Ok(())
}

fn set_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, value) = entry_and_text(context, args, "worksheet amount <n> <value>")?;
    WorksheetService::update_amount(&mut context.draft.worksheet, &id, value)?;
    report_total(context);
    Ok(())
}

fn describe(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, text) = entry_and_text(context, args, "worksheet describe <n> <text>")?;
    WorksheetService::update_description(&mut context.draft.worksheet, &id, text)?;
    io::print_success("Description updated.");
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: worksheet remove <n>".into())
    })?;
    let id = entry_id(context, raw)?;
    let removed = WorksheetService::remove_entry(&mut context.draft.worksheet, &id)?;
    io::print_success(format!("{} entry removed.", removed.direction));
    report_total(context);
    Ok(())
}

fn rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: worksheet name <name>".into(),
        ));
    }
    context.draft.name = name.trim().to_string();
    io::print_success(format!("Worksheet named `{}`.", context.draft.name));
    Ok(())
}

fn save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let typed = args.join(" ");
    let name = if typed.trim().is_empty() {
        context.draft.name.clone()
    } else {
        typed.trim().to_string()
    };

    let snapshot = context.snapshots.save(&name, &context.draft.worksheet)?;
    context.draft.name = snapshot.name.clone();
    context.config.last_worksheet = Some(snapshot.name.clone());
    context.persist_config()?;
    info!(name = %snapshot.name, "worksheet snapshot saved");
    io::print_success(format!("Worksheet `{}` saved.", snapshot.name));
    Ok(())
}

fn load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let typed = args.join(" ");
    let name = if !typed.trim().is_empty() {
        typed.trim().to_string()
    } else if context.can_prompt() {
        let names = context.snapshots.list_names()?;
        if names.is_empty() {
            io::print_info("No saved worksheets.");
            return Ok(());
        }
        match io::select_item(&context.theme, "Load which worksheet?", &names)? {
            Some(index) => names[index].clone(),
            None => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        }
    } else if let Some(last) = context.config.last_worksheet.clone() {
        last
    } else {
        return Err(CommandError::InvalidArguments(
            "usage: worksheet load <name>".into(),
        ));
    };

    let snapshot = context.snapshots.load(&name)?;
    context.draft = WorksheetDraft::from_snapshot(&snapshot);
    io::print_success(format!(
        "Loaded `{}` (saved {}).",
        snapshot.name,
        snapshot.date.format("%Y-%m-%d %H:%M")
    ));
    show(context)
}

fn list(context: &ShellContext) -> CommandResult {
    let names = context.snapshots.list_names()?;
    output_section("Saved worksheets");
    if names.is_empty() {
        io::print_info("  No saved worksheets.");
    }
    for (position, name) in names.iter().enumerate() {
        io::print_info(format!("  {:>2}. {}", position + 1, name));
    }
    Ok(())
}

fn clear(context: &mut ShellContext) -> CommandResult {
    if context.can_prompt()
        && !io::confirm_action(&context.theme, "Clear the current worksheet?", false)?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.draft.clear();
    io::print_success("Worksheet cleared.");
    Ok(())
}

fn report_total(context: &ShellContext) {
    let summary = BasisSummary::of(&context.draft.worksheet);
    io::print_info(format!(
        "Ending basis: {}",
        format_money(summary.total, &context.config.currency_symbol)
    ));
    if summary.status.is_invalid() {
        io::print_warning(NEGATIVE_BASIS_WARNING);
    }
}

fn entry_id(context: &ShellContext, raw: &str) -> Result<String, CommandError> {
    let index = parse_position(raw, "entry number")?;
    context
        .draft
        .worksheet
        .items
        .get(index)
        .map(|entry| entry.id.clone())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no entry {} (worksheet has {})",
                index + 1,
                context.draft.worksheet.items.len()
            ))
        })
}

fn entry_and_text(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<(String, String), CommandError> {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    let id = entry_id(context, args[0])?;
    Ok((id, args[1..].join(" ")))
}
