use crate::errors::EditorError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::reconcile::{ColumnBounds, ResizeMode};
use serde::{Deserialize, Serialize};

/// Editor session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept for undo (0 = unlimited)
    pub history_limit: usize,

    /// Smallest width a column can be resized to, in percent
    pub min_column_width: f64,

    /// Largest width a column can be resized to, in percent
    pub max_column_width: f64,

    /// How the two columns around a resize handle are clamped
    pub resize_mode: ResizeMode,

    /// Seed for generated node ids
    pub id_seed: String,

    /// Give new sections a row, a column and a placeholder block
    pub auto_populate_sections: bool,

    /// Approximate editor canvas width used to turn pixel drags into percentages
    pub container_width: f64,
}

impl EditorConfig {
    /// Clamp range for column widths. Invalid configured bounds fall back
    /// to the defaults so resizing stays total.
    pub fn column_bounds(&self) -> ColumnBounds {
        let bounds = ColumnBounds {
            min: self.min_column_width,
            max: self.max_column_width,
        };
        if bounds.is_valid() {
            bounds
        } else {
            tracing::warn!(
                min = self.min_column_width,
                max = self.max_column_width,
                "invalid column bounds, using defaults"
            );
            ColumnBounds::default()
        }
    }

    /// Reject settings the editor cannot honour
    pub fn validate(&self) -> Result<(), EditorError> {
        if !self.column_bounds_valid() {
            return Err(EditorError::InvalidConfig(format!(
                "column widths must satisfy 0 < minColumnWidth <= maxColumnWidth <= 100, got {} and {}",
                self.min_column_width, self.max_column_width
            )));
        }
        if !(self.container_width.is_finite() && self.container_width > 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "containerWidth must be positive, got {}",
                self.container_width
            )));
        }
        Ok(())
    }

    fn column_bounds_valid(&self) -> bool {
        ColumnBounds {
            min: self.min_column_width,
            max: self.max_column_width,
        }
        .is_valid()
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_column_width: 10.0,
            max_column_width: 90.0,
            resize_mode: ResizeMode::Independent,
            id_seed: "pagecraft".to_string(),
            auto_populate_sections: true,
            container_width: 1200.0,
        }
    }
}
