use crate::commands::load_page;
use crate::config::Config;
use crate::store::FileDraftStore;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Page name
    pub page: String,

    /// Save a draft instead of publishing
    #[arg(long)]
    pub draft: bool,
}

pub fn publish(args: PublishArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let editor = load_page(&config, cwd, &args.page)?;
    let store = FileDraftStore::new(
        args.page.clone(),
        config.draft_dir(cwd),
        config.publish_dir(cwd),
    );

    if args.draft {
        editor.save_draft(&store)?;
        println!(
            "  {} Draft saved → {}",
            "✓".green(),
            store.draft_path().display()
        );
    } else {
        editor.publish(&store)?;
        println!(
            "{} {} → {}",
            "🚀 Published".green().bold(),
            args.page,
            store.publish_path().display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{new, NewArgs};

    #[test]
    fn test_draft_then_publish() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        new(
            NewArgs {
                name: "careers".to_string(),
                sections: 1,
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = Config::default();
        let args = |draft| PublishArgs {
            page: "careers".to_string(),
            draft,
        };

        publish(args(true), &cwd).unwrap();
        assert!(config.draft_dir(&cwd).join("careers.json").exists());
        assert!(!config.publish_dir(&cwd).join("careers.json").exists());

        publish(args(false), &cwd).unwrap();
        assert!(config.publish_dir(&cwd).join("careers.json").exists());
    }

    #[test]
    fn test_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let args = PublishArgs {
            page: "nowhere".to_string(),
            draft: false,
        };
        assert!(publish(args, &dir.path().display().to_string()).is_err());
    }
}
