//! # Tree Mutations
//!
//! Every edit the block editor can make to a [`DocumentTree`].
//!
//! ## Design Principles
//!
//! 1. **Address by id**: callers never need a node's structural position;
//!    the [`NodeIndex`] resolves it
//! 2. **All or nothing**: a mutation either applies completely or returns an
//!    error and leaves the tree untouched
//! 3. **Serializable**: mutations are plain data and can be scripted
//!
//! ## Width Semantics
//!
//! - `AddColumn` / `AddRow` split the row into equal integer widths that sum to 100
//! - `DeleteColumn` / `DuplicateColumn` leave the other widths alone
//! - `ResizeColumn` clamps one column into bounds and touches nothing else
//!
//! ## Nesting
//!
//! Layout blocks hold sub-blocks one level deep. A layout block can never be
//! a sub-block.

use crate::id_generator::IdGenerator;
use crate::index::{NodeIndex, NodePath};
use crate::model::{
    Block, BlockPatch, BlockSpec, Breakpoint, Column, DocumentTree, Row, Section, Styles,
};
use crate::reconcile::{array_move, move_by_id, ColumnBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations of the page tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Append an empty section
    AddSection,

    /// Merge styles into a section
    UpdateSection { section_id: String, patch: Styles },

    DeleteSection { section_id: String },

    /// Deep copy with fresh ids, inserted after the original
    DuplicateSection { section_id: String },

    MoveSection { section_id: String, to_index: usize },

    /// Append a row split into `columns` equal columns (zero gives an empty row)
    AddRow { section_id: String, columns: usize },

    UpdateRow { section_id: String, row_id: String, patch: Styles },

    DeleteRow { section_id: String, row_id: String },

    DuplicateRow { section_id: String, row_id: String },

    MoveRow { section_id: String, row_id: String, to_index: usize },

    /// Append an empty column and redistribute widths equally
    AddColumn { section_id: String, row_id: String },

    UpdateColumn {
        section_id: String,
        row_id: String,
        column_id: String,
        patch: Styles,
    },

    /// Remove a column without redistributing the remaining widths
    DeleteColumn {
        section_id: String,
        row_id: String,
        column_id: String,
    },

    DuplicateColumn {
        section_id: String,
        row_id: String,
        column_id: String,
    },

    MoveColumn {
        section_id: String,
        row_id: String,
        column_id: String,
        to_index: usize,
    },

    /// Set one column's width, clamped to the configured bounds
    ResizeColumn {
        section_id: String,
        row_id: String,
        column_id: String,
        width: f64,
    },

    /// Set (or clear with `None`) a per-breakpoint width override
    SetColumnBreakpointWidth {
        section_id: String,
        row_id: String,
        column_id: String,
        breakpoint: Breakpoint,
        width: Option<f64>,
    },

    AddBlock {
        section_id: String,
        row_id: String,
        column_id: String,
        spec: BlockSpec,
    },

    /// Merge a patch into a block found anywhere in the tree
    UpdateBlock { block_id: String, patch: BlockPatch },

    DeleteBlock { block_id: String },

    /// Deep copy with a fresh id, inserted right after the original
    DuplicateBlock { block_id: String },

    /// Remove from the current column and append to the target column
    MoveBlock {
        block_id: String,
        section_id: String,
        row_id: String,
        column_id: String,
    },

    /// Drag a block onto the slot of a sibling in the same column
    ReorderBlock { block_id: String, over_id: String },

    AddSubBlock { block_id: String, spec: BlockSpec },

    UpdateSubBlock {
        block_id: String,
        sub_block_id: String,
        patch: BlockPatch,
    },

    DeleteSubBlock { block_id: String, sub_block_id: String },

    ReorderSubBlocks {
        block_id: String,
        dragged_id: String,
        over_id: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Row not found: {0}")]
    RowNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Sub-block not found: {0}")]
    SubBlockNotFound(String),

    #[error("Block {0} is not a layout block")]
    NotALayout(String),

    #[error("Layout blocks cannot be nested")]
    NestedLayout,

    #[error("Cannot delete the last column of row {0}")]
    LastColumn(String),

    #[error("Blocks {0} and {1} do not share a parent")]
    NotSiblings(String, String),

    #[error("Row cannot hold {0} columns")]
    TooManyColumns(usize),

    #[error("Invalid width: {0}")]
    InvalidWidth(f64),
}

/// What a successful mutation produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationEffect {
    /// Id of the node created by Add*/Duplicate* mutations
    pub created_id: Option<String>,
}

impl MutationEffect {
    fn created(id: String) -> Self {
        Self { created_id: Some(id) }
    }
}

/// Result of applying a mutation through an [`crate::Editor`]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New document version
    pub version: u64,

    /// Id of the node created by the mutation, if any
    pub created_id: Option<String>,
}

/// Session resources a mutation may need
pub struct MutationContext<'a> {
    pub ids: &'a mut IdGenerator,
    pub bounds: ColumnBounds,
}

/// Most columns a row can hold; equal integer widths need at least 1% each
pub const MAX_COLUMNS: usize = 100;

/// Split 100% into `count` integer widths; the remainder goes to the last columns
pub fn equal_widths(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let base = 100 / count;
    let remainder = 100 % count;
    (0..count)
        .map(|i| {
            let extra = usize::from(i >= count - remainder);
            (base + extra) as f64
        })
        .collect()
}

fn redistribute(row: &mut Row) {
    let widths = equal_widths(row.columns.len());
    for (column, width) in row.columns.iter_mut().zip(widths) {
        column.width = width;
    }
}

impl Mutation {
    /// Short name used for logging and history labels
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection => "add_section",
            Mutation::UpdateSection { .. } => "update_section",
            Mutation::DeleteSection { .. } => "delete_section",
            Mutation::DuplicateSection { .. } => "duplicate_section",
            Mutation::MoveSection { .. } => "move_section",
            Mutation::AddRow { .. } => "add_row",
            Mutation::UpdateRow { .. } => "update_row",
            Mutation::DeleteRow { .. } => "delete_row",
            Mutation::DuplicateRow { .. } => "duplicate_row",
            Mutation::MoveRow { .. } => "move_row",
            Mutation::AddColumn { .. } => "add_column",
            Mutation::UpdateColumn { .. } => "update_column",
            Mutation::DeleteColumn { .. } => "delete_column",
            Mutation::DuplicateColumn { .. } => "duplicate_column",
            Mutation::MoveColumn { .. } => "move_column",
            Mutation::ResizeColumn { .. } => "resize_column",
            Mutation::SetColumnBreakpointWidth { .. } => "set_column_breakpoint_width",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::ReorderBlock { .. } => "reorder_block",
            Mutation::AddSubBlock { .. } => "add_sub_block",
            Mutation::UpdateSubBlock { .. } => "update_sub_block",
            Mutation::DeleteSubBlock { .. } => "delete_sub_block",
            Mutation::ReorderSubBlocks { .. } => "reorder_sub_blocks",
        }
    }

    /// Whether the mutation adds, removes or moves nodes (and so invalidates the index)
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Mutation::UpdateSection { .. }
                | Mutation::UpdateRow { .. }
                | Mutation::UpdateColumn { .. }
                | Mutation::ResizeColumn { .. }
                | Mutation::SetColumnBreakpointWidth { .. }
                | Mutation::UpdateBlock { .. }
                | Mutation::UpdateSubBlock { .. }
        )
    }

    /// Apply the mutation to `tree`. `index` must describe `tree` as it is now.
    pub fn apply(
        &self,
        tree: &mut DocumentTree,
        index: &NodeIndex,
        ctx: &mut MutationContext<'_>,
    ) -> Result<MutationEffect, MutationError> {
        match self {
            Mutation::AddSection => {
                let id = ctx.ids.new_id();
                tree.sections.push(Section::new(id.clone()));
                Ok(MutationEffect::created(id))
            }

            Mutation::UpdateSection { section_id, patch } => {
                let s = section_at(index, section_id)?;
                tree.sections[s].styles.merge(patch.clone());
                Ok(MutationEffect::default())
            }

            Mutation::DeleteSection { section_id } => {
                let s = section_at(index, section_id)?;
                tree.sections.remove(s);
                Ok(MutationEffect::default())
            }

            Mutation::DuplicateSection { section_id } => {
                let s = section_at(index, section_id)?;
                let mut copy = tree.sections[s].clone();
                copy.refresh_ids(ctx.ids);
                let id = copy.id.clone();
                tree.sections.insert(s + 1, copy);
                Ok(MutationEffect::created(id))
            }

            Mutation::MoveSection { section_id, to_index } => {
                let s = section_at(index, section_id)?;
                array_move(&mut tree.sections, s, *to_index);
                Ok(MutationEffect::default())
            }

            Mutation::AddRow { section_id, columns } => {
                let s = section_at(index, section_id)?;
                if *columns > MAX_COLUMNS {
                    return Err(MutationError::TooManyColumns(*columns));
                }
                let mut row = Row::new(ctx.ids.new_id());
                for width in equal_widths(*columns) {
                    row.columns.push(Column::new(ctx.ids.new_id(), width));
                }
                let id = row.id.clone();
                tree.sections[s].rows.push(row);
                Ok(MutationEffect::created(id))
            }

            Mutation::UpdateRow { section_id, row_id, patch } => {
                let (s, r) = row_at(index, tree, section_id, row_id)?;
                tree.sections[s].rows[r].styles.merge(patch.clone());
                Ok(MutationEffect::default())
            }

            Mutation::DeleteRow { section_id, row_id } => {
                let (s, r) = row_at(index, tree, section_id, row_id)?;
                tree.sections[s].rows.remove(r);
                Ok(MutationEffect::default())
            }

            Mutation::DuplicateRow { section_id, row_id } => {
                let (s, r) = row_at(index, tree, section_id, row_id)?;
                let rows = &mut tree.sections[s].rows;
                let mut copy = rows[r].clone();
                copy.refresh_ids(ctx.ids);
                let id = copy.id.clone();
                rows.insert(r + 1, copy);
                Ok(MutationEffect::created(id))
            }

            Mutation::MoveRow { section_id, row_id, to_index } => {
                let (s, r) = row_at(index, tree, section_id, row_id)?;
                array_move(&mut tree.sections[s].rows, r, *to_index);
                Ok(MutationEffect::default())
            }

            Mutation::AddColumn { section_id, row_id } => {
                let (s, r) = row_at(index, tree, section_id, row_id)?;
                let row = &mut tree.sections[s].rows[r];
                if row.columns.len() >= MAX_COLUMNS {
                    return Err(MutationError::TooManyColumns(row.columns.len() + 1));
                }
                let id = ctx.ids.new_id();
                row.columns.push(Column::new(id.clone(), 100.0));
                redistribute(row);
                Ok(MutationEffect::created(id))
            }

            Mutation::UpdateColumn { section_id, row_id, column_id, patch } => {
                let column = column_mut(tree, index, section_id, row_id, column_id)?;
                column.styles.merge(patch.clone());
                Ok(MutationEffect::default())
            }

            Mutation::DeleteColumn { section_id, row_id, column_id } => {
                let (s, r, c) = column_at(index, tree, section_id, row_id, column_id)?;
                let row = &mut tree.sections[s].rows[r];
                if row.columns.len() == 1 {
                    return Err(MutationError::LastColumn(row_id.clone()));
                }
                row.columns.remove(c);
                Ok(MutationEffect::default())
            }

            Mutation::DuplicateColumn { section_id, row_id, column_id } => {
                let (s, r, c) = column_at(index, tree, section_id, row_id, column_id)?;
                let columns = &mut tree.sections[s].rows[r].columns;
                let mut copy = columns[c].clone();
                copy.refresh_ids(ctx.ids);
                let id = copy.id.clone();
                columns.insert(c + 1, copy);
                Ok(MutationEffect::created(id))
            }

            Mutation::MoveColumn { section_id, row_id, column_id, to_index } => {
                let (s, r, c) = column_at(index, tree, section_id, row_id, column_id)?;
                array_move(&mut tree.sections[s].rows[r].columns, c, *to_index);
                Ok(MutationEffect::default())
            }

            Mutation::ResizeColumn { section_id, row_id, column_id, width } => {
                if width.is_nan() {
                    return Err(MutationError::InvalidWidth(*width));
                }
                let bounds = ctx.bounds;
                let column = column_mut(tree, index, section_id, row_id, column_id)?;
                column.width = bounds.clamp(*width);
                Ok(MutationEffect::default())
            }

            Mutation::SetColumnBreakpointWidth {
                section_id,
                row_id,
                column_id,
                breakpoint,
                width,
            } => {
                if width.is_some_and(f64::is_nan) {
                    return Err(MutationError::InvalidWidth(f64::NAN));
                }
                let bounds = ctx.bounds;
                let column = column_mut(tree, index, section_id, row_id, column_id)?;
                match width {
                    Some(width) => {
                        column.responsive_width.insert(*breakpoint, bounds.clamp(*width));
                    }
                    None => {
                        column.responsive_width.remove(breakpoint);
                    }
                }
                Ok(MutationEffect::default())
            }

            Mutation::AddBlock { section_id, row_id, column_id, spec } => {
                let column = column_mut(tree, index, section_id, row_id, column_id)?;
                let id = ctx.ids.new_id();
                column.blocks.push(Block::from_spec(id.clone(), spec.clone()));
                Ok(MutationEffect::created(id))
            }

            Mutation::UpdateBlock { block_id, patch } => {
                match index.locate(block_id) {
                    Some(NodePath::Block { section, row, column, block }) => {
                        tree.sections[section].rows[row].columns[column].blocks[block]
                            .apply_patch(patch.clone());
                    }
                    Some(NodePath::SubBlock { section, row, column, block, sub_block }) => {
                        tree.sections[section].rows[row].columns[column].blocks[block]
                            .sub_blocks[sub_block]
                            .apply_patch(patch.clone());
                    }
                    _ => return Err(MutationError::BlockNotFound(block_id.clone())),
                }
                Ok(MutationEffect::default())
            }

            Mutation::DeleteBlock { block_id } => {
                let (s, r, c, b) = block_at(index, block_id)?;
                tree.sections[s].rows[r].columns[c].blocks.remove(b);
                Ok(MutationEffect::default())
            }

            Mutation::DuplicateBlock { block_id } => {
                let (s, r, c, b) = block_at(index, block_id)?;
                let blocks = &mut tree.sections[s].rows[r].columns[c].blocks;
                let mut copy = blocks[b].clone();
                copy.refresh_ids(ctx.ids);
                let id = copy.id.clone();
                blocks.insert(b + 1, copy);
                Ok(MutationEffect::created(id))
            }

            Mutation::MoveBlock { block_id, section_id, row_id, column_id } => {
                let (s, r, c, b) = block_at(index, block_id)?;
                // Resolve the target before detaching so a bad target leaves the block in place
                let (ts, tr, tc) = column_at(index, tree, section_id, row_id, column_id)?;

                let block = tree.sections[s].rows[r].columns[c].blocks.remove(b);
                tree.sections[ts].rows[tr].columns[tc].blocks.push(block);
                Ok(MutationEffect::default())
            }

            Mutation::ReorderBlock { block_id, over_id } => {
                let (s, r, c, _) = block_at(index, block_id)?;
                let (os, or, oc, _) = block_at(index, over_id)?;
                if (s, r, c) != (os, or, oc) {
                    return Err(MutationError::NotSiblings(block_id.clone(), over_id.clone()));
                }
                let blocks = &mut tree.sections[s].rows[r].columns[c].blocks;
                move_by_id(blocks, block_id, over_id, |b| b.id.as_str());
                Ok(MutationEffect::default())
            }

            Mutation::AddSubBlock { block_id, spec } => {
                if spec.kind.is_layout() {
                    return Err(MutationError::NestedLayout);
                }
                let layout = layout_mut(tree, index, block_id)?;
                let id = ctx.ids.new_id();
                layout.sub_blocks.push(Block::from_spec(id.clone(), spec.clone()));
                Ok(MutationEffect::created(id))
            }

            Mutation::UpdateSubBlock { block_id, sub_block_id, patch } => {
                let layout = layout_mut(tree, index, block_id)?;
                let sub = layout
                    .sub_blocks
                    .iter_mut()
                    .find(|b| &b.id == sub_block_id)
                    .ok_or_else(|| MutationError::SubBlockNotFound(sub_block_id.clone()))?;
                sub.apply_patch(patch.clone());
                Ok(MutationEffect::default())
            }

            Mutation::DeleteSubBlock { block_id, sub_block_id } => {
                let layout = layout_mut(tree, index, block_id)?;
                let pos = layout
                    .sub_blocks
                    .iter()
                    .position(|b| &b.id == sub_block_id)
                    .ok_or_else(|| MutationError::SubBlockNotFound(sub_block_id.clone()))?;
                layout.sub_blocks.remove(pos);
                Ok(MutationEffect::default())
            }

            Mutation::ReorderSubBlocks { block_id, dragged_id, over_id } => {
                let layout = layout_mut(tree, index, block_id)?;
                if !move_by_id(&mut layout.sub_blocks, dragged_id, over_id, |b| b.id.as_str()) {
                    return Err(MutationError::SubBlockNotFound(dragged_id.clone()));
                }
                Ok(MutationEffect::default())
            }
        }
    }
}

fn section_at(index: &NodeIndex, section_id: &str) -> Result<usize, MutationError> {
    match index.locate(section_id) {
        Some(NodePath::Section { section }) => Ok(section),
        _ => Err(MutationError::SectionNotFound(section_id.to_string())),
    }
}

fn row_at(
    index: &NodeIndex,
    tree: &DocumentTree,
    section_id: &str,
    row_id: &str,
) -> Result<(usize, usize), MutationError> {
    let s = section_at(index, section_id)?;
    match index.locate(row_id) {
        Some(NodePath::Row { section, row }) if section == s && tree.sections[s].rows[row].id == row_id => {
            Ok((section, row))
        }
        _ => Err(MutationError::RowNotFound(row_id.to_string())),
    }
}

fn column_at(
    index: &NodeIndex,
    tree: &DocumentTree,
    section_id: &str,
    row_id: &str,
    column_id: &str,
) -> Result<(usize, usize, usize), MutationError> {
    let (s, r) = row_at(index, tree, section_id, row_id)?;
    match index.locate(column_id) {
        Some(NodePath::Column { section, row, column }) if (section, row) == (s, r) => {
            Ok((section, row, column))
        }
        _ => Err(MutationError::ColumnNotFound(column_id.to_string())),
    }
}

fn column_mut<'t>(
    tree: &'t mut DocumentTree,
    index: &NodeIndex,
    section_id: &str,
    row_id: &str,
    column_id: &str,
) -> Result<&'t mut Column, MutationError> {
    let (s, r, c) = column_at(index, tree, section_id, row_id, column_id)?;
    Ok(&mut tree.sections[s].rows[r].columns[c])
}

fn block_at(index: &NodeIndex, block_id: &str) -> Result<(usize, usize, usize, usize), MutationError> {
    match index.locate(block_id) {
        Some(NodePath::Block { section, row, column, block }) => Ok((section, row, column, block)),
        _ => Err(MutationError::BlockNotFound(block_id.to_string())),
    }
}

fn layout_mut<'t>(
    tree: &'t mut DocumentTree,
    index: &NodeIndex,
    block_id: &str,
) -> Result<&'t mut Block, MutationError> {
    let (s, r, c, b) = block_at(index, block_id)?;
    let block = &mut tree.sections[s].rows[r].columns[c].blocks[b];
    if !block.kind.is_layout() {
        return Err(MutationError::NotALayout(block_id.to_string()));
    }
    Ok(block)
}
