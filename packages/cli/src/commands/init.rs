use crate::commands::write_page;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{BlockPatch, Editor};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Pages directory
    #[arg(short, long, default_value = "pages")]
    pub pages_dir: String,

    /// Publish directory
    #[arg(long, default_value = "public")]
    pub publish_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft site...".bright_blue().bold());

    let config = Config {
        pages_dir: args.pages_dir.clone(),
        publish_dir: args.publish_dir.clone(),
        ..Config::default()
    };

    // Create pages directory if it doesn't exist
    let pages_dir = config.pages_dir(cwd);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), args.pages_dir);
    }

    // Create example page
    let home = config.page_path(cwd, "home");
    if !home.exists() {
        write_page(&example_page(&config), &home)?;
        println!("  {} Created home.json", "✓".green());
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Site initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft preview home");
    println!("  2. Script edits with: pagecraft apply home edits.json");
    println!("  3. Run: pagecraft publish home");

    Ok(())
}

/// One section whose placeholder block reads as a welcome line
fn example_page(config: &Config) -> Editor {
    let mut editor = Editor::with_config(config.editor_config("home"));
    editor.add_section();

    let placeholder = editor.tree().blocks().next().map(|b| b.id.clone());
    if let Some(id) = placeholder {
        editor.update_block(&id, BlockPatch::content("text", "Welcome to our team"));
    }
    editor
}
