//! # Preview Projection
//!
//! Read-only grid placement of a [`DocumentTree`] for preview and export
//! renderers. Nothing here mutates the tree or touches history.
//!
//! ## Placement
//!
//! Each row becomes a grid with one track per column. Columns are walked
//! left to right and their blocks top to bottom. A block covers
//! `[column_index, column_index + span)` where the span is truncated to the
//! columns remaining in the row. It lands in the first grid row, at or
//! below its column's cursor, where none of those cells are taken.

use crate::model::{Block, Breakpoint, DocumentTree, Row, Section};
use crate::reconcile::effective_span;
use serde::Serialize;
use std::collections::HashSet;

/// Where one block sits in its row's grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement<'a> {
    pub block: &'a Block,
    pub grid_row: usize,
    pub grid_column: usize,
    pub span: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLayout<'a> {
    pub row_id: &'a str,
    /// Column widths resolved for the projected breakpoint
    pub column_widths: Vec<f64>,
    pub placements: Vec<Placement<'a>>,
}

impl RowLayout<'_> {
    /// Number of grid rows used
    pub fn grid_rows(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.grid_row + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLayout<'a> {
    pub section_id: &'a str,
    pub rows: Vec<RowLayout<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLayout<'a> {
    pub breakpoint: Breakpoint,
    pub sections: Vec<SectionLayout<'a>>,
}

/// Project the whole tree for one breakpoint
pub fn project(tree: &DocumentTree, breakpoint: Breakpoint) -> PreviewLayout<'_> {
    PreviewLayout {
        breakpoint,
        sections: tree
            .sections
            .iter()
            .map(|section| project_section(section, breakpoint))
            .collect(),
    }
}

pub fn project_section(section: &Section, breakpoint: Breakpoint) -> SectionLayout<'_> {
    SectionLayout {
        section_id: &section.id,
        rows: section
            .rows
            .iter()
            .map(|row| project_row(row, breakpoint))
            .collect(),
    }
}

pub fn project_row(row: &Row, breakpoint: Breakpoint) -> RowLayout<'_> {
    let total_columns = row.columns.len();
    let mut occupied: HashSet<(usize, usize)> = HashSet::new();
    let mut placements = Vec::new();

    for (column_index, column) in row.columns.iter().enumerate() {
        let mut cursor = 0;

        for block in &column.blocks {
            let span = effective_span(block.column_span, total_columns, column_index);
            let cells = column_index..column_index + span as usize;

            let mut grid_row = cursor;
            while cells.clone().any(|c| occupied.contains(&(grid_row, c))) {
                grid_row += 1;
            }

            for c in cells {
                occupied.insert((grid_row, c));
            }

            placements.push(Placement {
                block,
                grid_row,
                grid_column: column_index,
                span,
            });
            cursor = grid_row + 1;
        }
    }

    RowLayout {
        row_id: &row.id,
        column_widths: row.columns.iter().map(|c| c.width_at(breakpoint)).collect(),
        placements,
    }
}
