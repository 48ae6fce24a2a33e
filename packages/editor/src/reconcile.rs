//! # Reorder/Resize Reconciler
//!
//! Turns pointer gestures into engine mutations:
//!
//! - drag-and-drop reorders become an array move of the dragged id onto
//!   the id it was dropped on
//! - dragging the handle between two columns becomes a pair of
//!   `ResizeColumn` mutations
//! - a block's stored span is truncated to the columns left in its row

use crate::model::DocumentTree;
use crate::mutations::Mutation;
use serde::{Deserialize, Serialize};

/// Allowed range for a single column width, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBounds {
    pub min: f64,
    pub max: f64,
}

impl ColumnBounds {
    /// Clamp `width` into range. Never panics, even on inverted bounds.
    pub fn clamp(&self, width: f64) -> f64 {
        width.max(self.min).min(self.max)
    }

    /// Both finite and `0 < min <= max <= 100`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min <= self.max
            && self.max <= 100.0
    }
}

impl Default for ColumnBounds {
    fn default() -> Self {
        Self { min: 10.0, max: 90.0 }
    }
}

/// How the two columns around a resize handle are clamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeMode {
    /// Each column is clamped on its own; their sum can drift at the bounds
    #[default]
    Independent,
    /// The delta is limited so both stay in bounds and their sum is kept
    Joint,
}

/// Move the element at `from` so that it ends up at `to`
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }

    let to = to.min(items.len() - 1);
    if from == to {
        return true;
    }

    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Drag `active_id` onto the position currently held by `over_id`
pub fn move_by_id<T>(
    items: &mut Vec<T>,
    active_id: &str,
    over_id: &str,
    id_of: impl Fn(&T) -> &str,
) -> bool {
    let from = items.iter().position(|item| id_of(item) == active_id);
    let to = items.iter().position(|item| id_of(item) == over_id);

    match (from, to) {
        (Some(from), Some(to)) => array_move(items, from, to),
        _ => false,
    }
}

/// Span a block actually covers when rendered: never past the row's last column, never below 1
pub fn effective_span(stored_span: u32, total_columns: usize, column_index: usize) -> u32 {
    let available = total_columns.saturating_sub(column_index).max(1);
    let available = u32::try_from(available).unwrap_or(u32::MAX);
    stored_span.min(available).max(1)
}

/// Convert a horizontal pointer delta into a percentage of the container
pub fn pixel_delta_to_percent(delta_px: f64, container_width_px: f64) -> Option<f64> {
    if !(container_width_px > 0.0) || !delta_px.is_finite() {
        return None;
    }
    Some(delta_px / container_width_px * 100.0)
}

/// Requested widths for the columns left and right of a handle.
///
/// In independent mode these are the raw `width ± delta` values; the
/// `ResizeColumn` primitive clamps each one separately. In joint mode the
/// returned widths are already within bounds and keep the pair's sum.
pub fn plan_resize(
    left: f64,
    right: f64,
    delta: f64,
    bounds: ColumnBounds,
    mode: ResizeMode,
) -> (f64, f64) {
    match mode {
        ResizeMode::Independent => (left + delta, right - delta),
        ResizeMode::Joint => {
            let lowest = (bounds.min - left).max(right - bounds.max);
            let highest = (bounds.max - left).min(right - bounds.min);

            if !(lowest <= highest) {
                // No delta keeps both in bounds (pair sum outside [2*min, 2*max])
                return (left + delta, right - delta);
            }

            let delta = delta.max(lowest).min(highest);
            (left + delta, right - delta)
        }
    }
}

/// Pointer drag on the handle between column `handle_index` and the one after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResizeGesture {
    pub section_id: String,
    pub row_id: String,
    pub handle_index: usize,
    pub delta_px: f64,
    pub container_width_px: f64,
}

impl ColumnResizeGesture {
    /// The two `ResizeColumn` mutations for this gesture, or none if the
    /// row or the pair of columns does not exist
    pub fn to_mutations(
        &self,
        tree: &DocumentTree,
        bounds: ColumnBounds,
        mode: ResizeMode,
    ) -> Vec<Mutation> {
        let Some(row) = tree.row(&self.section_id, &self.row_id) else {
            return Vec::new();
        };
        let (Some(left), Some(right)) = (
            row.columns.get(self.handle_index),
            row.columns.get(self.handle_index + 1),
        ) else {
            return Vec::new();
        };
        let Some(delta) = pixel_delta_to_percent(self.delta_px, self.container_width_px) else {
            return Vec::new();
        };

        let (left_width, right_width) = plan_resize(left.width, right.width, delta, bounds, mode);

        vec![
            Mutation::ResizeColumn {
                section_id: self.section_id.clone(),
                row_id: self.row_id.clone(),
                column_id: left.id.clone(),
                width: left_width,
            },
            Mutation::ResizeColumn {
                section_id: self.section_id.clone(),
                row_id: self.row_id.clone(),
                column_id: right.id.clone(),
                width: right_width,
            },
        ]
    }
}
