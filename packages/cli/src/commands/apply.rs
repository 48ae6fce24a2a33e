use crate::commands::{load_page, write_page};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Editor, Mutation};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Page name
    pub page: String,

    /// JSON file with an array of edit steps
    pub script: String,

    /// Apply the steps but do not write the page back
    #[arg(long)]
    pub dry_run: bool,
}

/// One line of an edit script: a mutation, or a walk through history
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Step {
    History(HistoryStep),
    Edit(Mutation),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HistoryStep {
    Undo,
    Redo,
}

#[derive(Debug, Default, PartialEq)]
pub struct ApplySummary {
    pub applied: usize,
    pub skipped: usize,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut editor = load_page(&config, cwd, &args.page)?;

    let script = fs::read_to_string(&args.script).with_context(|| format!("reading {}", args.script))?;
    let steps: Vec<Step> = serde_json::from_str(&script).with_context(|| format!("parsing {}", args.script))?;

    println!(
        "{}",
        format!("✏️  Applying {} steps to {}...", steps.len(), args.page)
            .bright_blue()
            .bold()
    );

    let summary = run_steps(&mut editor, steps);

    println!();
    println!(
        "{} applied, {} skipped",
        summary.applied.to_string().green(),
        summary.skipped.to_string().yellow()
    );

    if args.dry_run {
        println!("{}", "Dry run: page not written".yellow());
    } else {
        write_page(&editor, &config.page_path(cwd, &args.page))?;
        println!("{}", "✅ Page saved".green().bold());
    }

    Ok(())
}

/// Run every step, reporting each one; failed steps are skipped
pub fn run_steps(editor: &mut Editor, steps: Vec<Step>) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for step in steps {
        let (name, outcome) = match step {
            Step::History(HistoryStep::Undo) => ("undo", moved(editor.undo(), "nothing to undo")),
            Step::History(HistoryStep::Redo) => ("redo", moved(editor.redo(), "nothing to redo")),
            Step::Edit(mutation) => {
                let name = mutation.name();
                let outcome = editor
                    .try_apply(mutation)
                    .map(|r| r.created_id)
                    .map_err(|e| e.to_string());
                (name, outcome)
            }
        };

        match outcome {
            Ok(created) => {
                summary.applied += 1;
                match created {
                    Some(id) => println!("  {} {} → {}", "✓".green(), name, id.bright_white()),
                    None => println!("  {} {}", "✓".green(), name),
                }
            }
            Err(reason) => {
                summary.skipped += 1;
                println!("  {} {} - {}", "✗".red(), name, reason);
            }
        }
    }

    summary
}

fn moved(changed: bool, reason: &str) -> Result<Option<String>, String> {
    if changed {
        Ok(None)
    } else {
        Err(reason.to_string())
    }
}
