//! Current selection: at most one id per structural level

use crate::index::{NodeIndex, NodeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub section: Option<String>,
    pub row: Option<String>,
    pub column: Option<String>,
    /// Block or sub-block
    pub block: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` and its ancestors; deeper levels are cleared.
    /// Returns `false` (and changes nothing) if the id is not in the tree.
    pub fn select(&mut self, id: &str, index: &NodeIndex) -> bool {
        let Some(kind) = index.kind_of(id) else {
            return false;
        };

        let chain = index.ancestry(id);
        let mut levels = chain.into_iter();
        self.clear();

        self.section = levels.next();
        if kind == NodeKind::Section {
            return true;
        }
        self.row = levels.next();
        if kind == NodeKind::Row {
            return true;
        }
        self.column = levels.next();
        if kind == NodeKind::Column {
            return true;
        }
        // A sub-block's chain runs through its layout block; keep the innermost id
        self.block = levels.last();
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.section.is_none() && self.row.is_none() && self.column.is_none() && self.block.is_none()
    }

    /// Clear every level whose id no longer exists
    pub fn retain_existing(&mut self, index: &NodeIndex) {
        for slot in [&mut self.section, &mut self.row, &mut self.column, &mut self.block] {
            if slot.as_deref().is_some_and(|id| !index.contains(id)) {
                *slot = None;
            }
        }
    }

    /// Bring the selection in line with a changed tree: stale ids are
    /// dropped and the ancestors of the innermost remaining id are re-derived,
    /// so a moved block carries its new column, row and section.
    pub fn refresh(&mut self, index: &NodeIndex) {
        self.retain_existing(index);

        let innermost = [&self.block, &self.column, &self.row, &self.section]
            .into_iter()
            .flatten()
            .next()
            .cloned();
        if let Some(id) = innermost {
            self.select(&id, index);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        [&self.section, &self.row, &self.column, &self.block]
            .into_iter()
            .any(|slot| slot.as_deref() == Some(id))
    }
}
