//! # Export Format
//!
//! The serialized page handed to the draft/publish collaborator and to the
//! site renderer:
//!
//! ```json
//! { "schemaVersion": 1, "sections": [...], "globalStyles": {...}, "exportedAt": "..." }
//! ```

use crate::errors::EditorError;
use crate::index::NodeIndex;
use crate::model::{DocumentTree, PropertyMap, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written into every export. Readers do not migrate older versions.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    pub sections: Vec<Section>,

    #[serde(default)]
    pub global_styles: PropertyMap,

    pub exported_at: DateTime<Utc>,
}

impl ExportedDocument {
    pub fn new(tree: &DocumentTree, global_styles: &PropertyMap) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sections: tree.sections.clone(),
            global_styles: global_styles.clone(),
            exported_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate an exported document
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let document: ExportedDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    pub fn tree(&self) -> DocumentTree {
        DocumentTree {
            sections: self.sections.clone(),
        }
    }

    /// Check the structural rules the editor relies on
    pub fn validate(&self) -> Result<(), EditorError> {
        let tree = self.tree();

        let index = NodeIndex::build(&tree);
        if let Some(id) = index.duplicates().first() {
            return Err(EditorError::InvalidDocument(format!("duplicate id {}", id)));
        }

        for block in tree.blocks() {
            if !block.kind.is_layout() && !block.sub_blocks.is_empty() {
                return Err(EditorError::InvalidDocument(format!(
                    "block {} has sub-blocks but is not a layout",
                    block.id
                )));
            }
            for sub in &block.sub_blocks {
                if sub.kind.is_layout() || !sub.sub_blocks.is_empty() {
                    return Err(EditorError::InvalidDocument(format!(
                        "sub-block {} nests another level",
                        sub.id
                    )));
                }
            }
        }

        for column in tree
            .sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.columns.iter())
        {
            if !(column.width > 0.0 && column.width <= 100.0) {
                return Err(EditorError::InvalidDocument(format!(
                    "column {} has width {}",
                    column.id, column.width
                )));
            }
        }

        Ok(())
    }
}
