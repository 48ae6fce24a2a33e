//! # Pagecraft Editor
//!
//! Editing engine for block-based pages (career sites, landing pages).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI gestures: clicks, drags, resize handles  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editor session + mutations          │
//! │  - Section → Row → Column → Block tree      │
//! │  - Id-addressed mutations, no-op on miss    │
//! │  - Snapshot undo/redo (50 entries)          │
//! │  - Selection per structural level           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ preview grid / JSON export / draft store    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: preview layouts and exports are derived views
//! 2. **Ids, not positions**: every operation addresses nodes by id
//! 3. **Total operations**: stale ids are skipped, never panics
//! 4. **Snapshots, not inverses**: history stores whole trees
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_editor::{BlockKind, BlockSpec, Breakpoint, Editor};
//!
//! let mut editor = Editor::new();
//! let section = editor.add_section().unwrap();
//! let row = editor.add_row(&section).unwrap();
//! let column = editor.sections()[0].rows[1].columns[0].id.clone();
//!
//! editor.add_block(&section, &row, &column, BlockSpec::new(BlockKind::Heading));
//! assert!(editor.undo());
//!
//! let preview = editor.preview(Breakpoint::Desktop);
//! assert_eq!(preview.sections.len(), 1);
//! ```

mod config;
mod editor;
mod errors;
mod export;
mod history;
mod id_generator;
mod index;
mod model;
mod mutations;
mod persistence;
mod projection;
mod reconcile;
mod selection;

pub use config::EditorConfig;
pub use editor::Editor;
pub use errors::EditorError;
pub use export::{ExportedDocument, SCHEMA_VERSION};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use id_generator::{get_document_seed, IdGenerator};
pub use index::{NodeIndex, NodeKind, NodePath};
pub use model::{
    merge_properties, Block, BlockKind, BlockPatch, BlockSpec, Breakpoint, Column, DocumentTree,
    PropertyMap, Row, Section, Styles, PLACEHOLDER_TEXT,
};
pub use mutations::{
    equal_widths, Mutation, MutationContext, MutationEffect, MutationError, MutationResult,
    MAX_COLUMNS,
};
pub use persistence::{DraftStore, MemoryStore};
pub use projection::{project, project_row, project_section, Placement, PreviewLayout, RowLayout, SectionLayout};
pub use reconcile::{
    array_move, effective_span, move_by_id, pixel_delta_to_percent, plan_resize, ColumnBounds,
    ColumnResizeGesture, ResizeMode,
};
pub use selection::Selection;
