pub mod apply;
pub mod init;
pub mod new;
pub mod preview;
pub mod publish;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use preview::{preview, PreviewArgs};
pub use publish::{publish, PublishArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use pagecraft_editor::Editor;
use std::fs;
use std::path::Path;

/// Open page `name` from the configured pages directory
pub(crate) fn load_page(config: &Config, cwd: &str, name: &str) -> Result<Editor> {
    let path = config.page_path(cwd, name);
    if !path.exists() {
        return Err(anyhow!("Page does not exist: {}", path.display()));
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let editor = Editor::from_json(&content, config.editor_config(name))
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(editor)
}

/// Write the editor's current page as an export document
pub(crate) fn write_page(editor: &Editor, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, editor.export_json()?).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
