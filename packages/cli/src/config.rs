use anyhow::Context;
use pagecraft_editor::{get_document_seed, EditorConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the page documents being edited
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Where saved drafts are written
    #[serde(default = "default_draft_dir")]
    pub draft_dir: String,

    /// Where published pages are written
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,

    /// Editor session settings
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_draft_dir() -> String {
    ".pagecraft/drafts".to_string()
}

fn default_publish_dir() -> String {
    "public".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config
                .editor
                .validate()
                .with_context(|| format!("invalid editor settings in {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Editor settings for page `name`; node ids are seeded per page
    pub fn editor_config(&self, name: &str) -> EditorConfig {
        EditorConfig {
            id_seed: get_document_seed(&format!("{}/{}", self.editor.id_seed, name)),
            ..self.editor.clone()
        }
    }

    pub fn pages_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pages_dir)
    }

    /// Path of the document for page `name`
    pub fn page_path(&self, cwd: &str, name: &str) -> PathBuf {
        self.pages_dir(cwd).join(format!("{}.json", name))
    }

    pub fn draft_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.draft_dir)
    }

    pub fn publish_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.publish_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            draft_dir: default_draft_dir(),
            publish_dir: default_publish_dir(),
            editor: EditorConfig::default(),
        }
    }
}
