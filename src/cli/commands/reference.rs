use k1_domain::{K1Box, TaxCase};

use super::unknown_subcommand;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "k1",
            "Look up Schedule K-1 boxes",
            "k1 [list|show <box id>|search <text>]",
            cmd_k1,
        ),
        CommandEntry::new(
            "cases",
            "Read summaries of partnership tax cases",
            "cases [list|show <case id>|search <text>]",
            cmd_cases,
        ),
    ]
}

fn cmd_k1(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return list_boxes(context.catalogue.k1_boxes().iter(), "Schedule K-1 boxes");
    }

    match args[0].to_lowercase().as_str() {
        "list" => list_boxes(context.catalogue.k1_boxes().iter(), "Schedule K-1 boxes"),
        "show" => {
            let id = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: k1 show <box id>".into())
            })?;
            let k1_box = context
                .catalogue
                .k1_box(id)
                .ok_or_else(|| CommandError::Message(format!("K-1 box `{id}` not found")))?;
            print_box(context, k1_box);
            Ok(())
        }
        "search" => {
            let query = args[1..].join(" ");
            let matches = context.catalogue.search_boxes(&query);
            if matches.is_empty() {
                io::print_info(format!("No boxes match `{query}`."));
                return Ok(());
            }
            list_boxes(matches.into_iter(), "Matching boxes")
        }
        other => Err(unknown_subcommand("k1", other)),
    }
}

fn cmd_cases(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return list_cases(context.catalogue.tax_cases().iter(), "Tax cases");
    }

    match args[0].to_lowercase().as_str() {
        "list" => list_cases(context.catalogue.tax_cases().iter(), "Tax cases"),
        "show" => {
            let id = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: cases show <case id>".into())
            })?;
            let case = context
                .catalogue
                .tax_case(id)
                .ok_or_else(|| CommandError::Message(format!("Tax case `{id}` not found")))?;
            print_case(case);
            Ok(())
        }
        "search" => {
            let query = args[1..].join(" ");
            let matches = context.catalogue.search_cases(&query);
            if matches.is_empty() {
                io::print_info(format!("No cases match `{query}`."));
                return Ok(());
            }
            list_cases(matches.into_iter(), "Matching cases")
        }
        other => Err(unknown_subcommand("cases", other)),
    }
}

fn list_boxes<'a>(boxes: impl Iterator<Item = &'a K1Box>, title: &str) -> CommandResult {
    output_section(title);
    for k1_box in boxes {
        io::print_info(format!("  {:<8} {}", k1_box.id, k1_box.title));
    }
    Ok(())
}

fn list_cases<'a>(cases: impl Iterator<Item = &'a TaxCase>, title: &str) -> CommandResult {
    output_section(title);
    for case in cases {
        io::print_info(format!("  {:<14} {} ({})", case.id, case.title, case.year));
    }
    Ok(())
}

fn print_box(context: &ShellContext, k1_box: &K1Box) {
    output_section(&k1_box.title);
    io::print_info(&k1_box.description);
    io::print_info(format!("\n{}", k1_box.details));

    if !k1_box.examples.is_empty() {
        io::print_info("\nExamples:");
    }
    for example in &k1_box.examples {
        io::print_info(format!("  - {}", example.scenario));
        if let Some(calculation) = &example.calculation {
            io::print_info(format!("    Calculation: {calculation}"));
        }
        io::print_info(format!("    Result: {}", example.result));
    }

    if !k1_box.tips.is_empty() {
        io::print_info("\nTips:");
    }
    for tip in &k1_box.tips {
        io::print_hint(tip);
    }

    let related = context.catalogue.related_boxes(k1_box);
    if !related.is_empty() {
        let names: Vec<String> = related
            .iter()
            .map(|other| format!("{} ({})", other.title, other.id))
            .collect();
        io::print_info(format!("\nRelated: {}", names.join(", ")));
    }
}

fn print_case(case: &TaxCase) {
    output_section(&case.title);
    io::print_info(format!("{} ({})", case.citation, case.year));
    io::print_info(format!("\n{}", case.summary));
    if !case.key_points.is_empty() {
        io::print_info("\nKey points:");
    }
    for point in &case.key_points {
        io::print_info(format!("  - {point}"));
    }
    io::print_info(format!("\nImpact: {}", case.impact));
}

