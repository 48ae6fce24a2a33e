//! Node Index - maps every node id to its structural position
//!
//! Mutations address nodes by id alone. Instead of scanning
//! sections × rows × columns × blocks on every call, the editor keeps this
//! index and rebuilds it after each structural mutation (and after undo/redo,
//! which swap the whole tree).

use crate::model::DocumentTree;
use std::collections::HashMap;

/// Position of a node, as indices into its ancestors' child lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePath {
    Section {
        section: usize,
    },
    Row {
        section: usize,
        row: usize,
    },
    Column {
        section: usize,
        row: usize,
        column: usize,
    },
    Block {
        section: usize,
        row: usize,
        column: usize,
        block: usize,
    },
    SubBlock {
        section: usize,
        row: usize,
        column: usize,
        block: usize,
        sub_block: usize,
    },
}

/// Types of nodes we track in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Section,
    Row,
    Column,
    Block,
    SubBlock,
}

impl NodePath {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePath::Section { .. } => NodeKind::Section,
            NodePath::Row { .. } => NodeKind::Row,
            NodePath::Column { .. } => NodeKind::Column,
            NodePath::Block { .. } => NodeKind::Block,
            NodePath::SubBlock { .. } => NodeKind::SubBlock,
        }
    }
}

/// Index of all document nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    /// Map from node id to its path
    paths: HashMap<String, NodePath>,
    /// Map from node id to parent node id
    parents: HashMap<String, String>,
    /// Ids seen more than once while building
    duplicates: Vec<String>,
}

impl NodeIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a document tree
    pub fn build(tree: &DocumentTree) -> Self {
        let mut index = Self::new();

        for (s, section) in tree.sections.iter().enumerate() {
            index.insert(&section.id, None, NodePath::Section { section: s });

            for (r, row) in section.rows.iter().enumerate() {
                index.insert(&row.id, Some(&section.id), NodePath::Row { section: s, row: r });

                for (c, column) in row.columns.iter().enumerate() {
                    index.insert(
                        &column.id,
                        Some(&row.id),
                        NodePath::Column { section: s, row: r, column: c },
                    );

                    for (b, block) in column.blocks.iter().enumerate() {
                        index.insert(
                            &block.id,
                            Some(&column.id),
                            NodePath::Block { section: s, row: r, column: c, block: b },
                        );

                        for (sb, sub) in block.sub_blocks.iter().enumerate() {
                            index.insert(
                                &sub.id,
                                Some(&block.id),
                                NodePath::SubBlock {
                                    section: s,
                                    row: r,
                                    column: c,
                                    block: b,
                                    sub_block: sb,
                                },
                            );
                        }
                    }
                }
            }
        }

        tracing::trace!(nodes = index.paths.len(), "node index rebuilt");
        index
    }

    fn insert(&mut self, id: &str, parent: Option<&str>, path: NodePath) {
        if self.paths.contains_key(id) {
            self.duplicates.push(id.to_string());
            return;
        }

        self.paths.insert(id.to_string(), path);
        if let Some(parent) = parent {
            self.parents.insert(id.to_string(), parent.to_string());
        }
    }

    pub fn locate(&self, id: &str) -> Option<NodePath> {
        self.paths.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.locate(id).map(|p| p.kind())
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// Ids from the root section down to (and including) `id`
    pub fn ancestry(&self, id: &str) -> Vec<String> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut chain = vec![id.to_string()];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            chain.push(parent.to_string());
            current = parent;
        }
        chain.reverse();
        chain
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
