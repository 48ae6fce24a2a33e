use crate::commands::write_page;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Editor;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page name (file name without extension)
    pub name: String,

    /// Number of starter sections
    #[arg(short, long, default_value_t = 1)]
    pub sections: usize,

    /// Overwrite an existing page
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = config.page_path(cwd, &args.name);

    if path.exists() && !args.force {
        return Err(anyhow!(
            "Page {} already exists (use --force to overwrite)",
            args.name
        ));
    }

    let mut editor = Editor::with_config(config.editor_config(&args.name));
    for _ in 0..args.sections {
        editor.add_section();
    }
    write_page(&editor, &path)?;

    let (sections, rows, columns, blocks) = editor.tree().counts();
    println!(
        "  {} Created {} ({} sections, {} rows, {} columns, {} blocks)",
        "✓".green(),
        path.display(),
        sections,
        rows,
        columns,
        blocks
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::load_page;

    #[test]
    fn test_new_page() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let args = NewArgs {
            name: "careers".to_string(),
            sections: 2,
            force: false,
        };
        new(args, &cwd).unwrap();

        let editor = load_page(&Config::default(), &cwd, "careers").unwrap();
        assert_eq!(editor.tree().counts(), (2, 2, 2, 2));
    }

    #[test]
    fn test_new_page_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let args = || NewArgs {
            name: "careers".to_string(),
            sections: 1,
            force: false,
        };
        new(args(), &cwd).unwrap();
        assert!(new(args(), &cwd).is_err());
    }

    #[test]
    fn test_pages_do_not_share_ids() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        for name in ["home", "careers"] {
            let args = NewArgs {
                name: name.to_string(),
                sections: 1,
                force: false,
            };
            new(args, &cwd).unwrap();
        }

        let config = Config::default();
        let home = load_page(&config, &cwd, "home").unwrap();
        let careers = load_page(&config, &cwd, "careers").unwrap();
        let home_ids = home.tree().ids();
        assert!(careers.tree().ids().iter().all(|id| !home_ids.contains(id)));
    }
}
