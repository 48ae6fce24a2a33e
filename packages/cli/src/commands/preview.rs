use crate::commands::load_page;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Breakpoint, PreviewLayout, RowLayout};
use std::fmt::Write;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Page name
    pub page: String,

    /// Breakpoint to lay out for (mobile, tablet, desktop)
    #[arg(short, long, default_value = "desktop")]
    pub breakpoint: String,

    /// Print the layout as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let breakpoint: Breakpoint = args.breakpoint.parse()?;
    let editor = load_page(&config, cwd, &args.page)?;
    let layout = editor.preview(breakpoint);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print!("{}", render_outline(&layout));
    }
    Ok(())
}

/// Indented outline: one line per section and row, one per placed block
pub fn render_outline(layout: &PreviewLayout<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Preview".bright_blue().bold(),
        layout.breakpoint.to_string().bright_white()
    );

    for (i, section) in layout.sections.iter().enumerate() {
        let _ = writeln!(out, "section {} ({})", i + 1, section.section_id);
        for row in &section.rows {
            render_row(&mut out, row);
        }
    }
    out
}

fn render_row(out: &mut String, row: &RowLayout<'_>) {
    let widths: Vec<String> = row.column_widths.iter().map(|w| format!("{}%", w)).collect();
    let _ = writeln!(
        out,
        "  row {} [{}] {} grid rows",
        row.row_id,
        widths.join(" | "),
        row.grid_rows()
    );

    for placement in &row.placements {
        let _ = writeln!(
            out,
            "    ({}, {}) span {} {:?} {}",
            placement.grid_row,
            placement.grid_column,
            placement.span,
            placement.block.kind,
            placement.block.id.dimmed()
        );
    }
}
