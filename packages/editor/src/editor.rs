//! # Editor Session
//!
//! Single owner of one page being edited: the live tree plus everything
//! derived from it (id index, history, selection).
//!
//! ## Lifecycle
//!
//! ```text
//! gesture/command → Mutation → apply to tree → reindex → snapshot → fix selection
//!                                                   ↓
//!                                          preview / export (read-only)
//! ```
//!
//! Every public operation is total. A mutation whose ids are stale or whose
//! request is structurally impossible is logged and skipped: the tree, the
//! history and the version stay as they were.

use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::export::ExportedDocument;
use crate::history::History;
use crate::id_generator::IdGenerator;
use crate::index::NodeIndex;
use crate::model::{
    merge_properties, BlockPatch, BlockSpec, Breakpoint, DocumentTree, PropertyMap, Section, Styles,
};
use crate::mutations::{Mutation, MutationContext, MutationError, MutationResult};
use crate::persistence::DraftStore;
use crate::projection::{project, PreviewLayout};
use crate::reconcile::ColumnResizeGesture;
use crate::selection::Selection;

/// Editable page
#[derive(Debug)]
pub struct Editor {
    tree: DocumentTree,
    global_styles: PropertyMap,
    index: NodeIndex,
    history: History,
    selection: Selection,
    ids: IdGenerator,
    config: EditorConfig,

    /// Increments on every applied mutation, undo and redo
    version: u64,
}

impl Editor {
    /// Empty page with default settings
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Empty page. History starts empty; the first mutation records entry 0.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            tree: DocumentTree::new(),
            global_styles: PropertyMap::new(),
            index: NodeIndex::new(),
            history: History::with_limit(config.history_limit),
            selection: Selection::new(),
            ids: IdGenerator::new(&config.id_seed),
            config,
            version: 0,
        }
    }

    /// Resume editing an exported page. The loaded tree is recorded as the
    /// first history entry so the first edit can be undone.
    pub fn from_export(document: ExportedDocument, config: EditorConfig) -> Result<Self, EditorError> {
        if let Err(err) = document.validate() {
            tracing::warn!(error = %err, "document rejected");
            return Err(err);
        }

        let mut editor = Self::with_config(config);
        editor.tree = document.tree();
        editor.global_styles = document.global_styles;
        editor.index = NodeIndex::build(&editor.tree);
        for id in editor.tree.ids() {
            editor.ids.observe(id);
        }
        editor.history.record(&editor.tree, "load");

        tracing::info!(
            sections = editor.tree.sections.len(),
            nodes = editor.index.len(),
            "document loaded"
        );
        Ok(editor)
    }

    pub fn from_json(json: &str, config: EditorConfig) -> Result<Self, EditorError> {
        Self::from_export(ExportedDocument::from_json(json)?, config)
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn sections(&self) -> &[Section] {
        &self.tree.sections
    }

    pub fn global_styles(&self) -> &PropertyMap {
        &self.global_styles
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a mutation, or explain why it was skipped
    pub fn try_apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let mut ctx = MutationContext {
            ids: &mut self.ids,
            bounds: self.config.column_bounds(),
        };
        let effect = mutation.apply(&mut self.tree, &self.index, &mut ctx)?;

        self.version += 1;
        if mutation.is_structural() {
            self.index = NodeIndex::build(&self.tree);
        }
        self.selection.refresh(&self.index);
        self.history.record(&self.tree, mutation.name());

        tracing::debug!(op = mutation.name(), version = self.version, "mutation applied");
        Ok(MutationResult {
            version: self.version,
            created_id: effect.created_id,
        })
    }

    /// Apply a mutation; stale ids and impossible requests are silent no-ops
    pub fn apply(&mut self, mutation: Mutation) -> Option<MutationResult> {
        let op = mutation.name();
        match self.try_apply(mutation) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::debug!(op, error = %err, "mutation skipped");
                None
            }
        }
    }

    fn apply_created(&mut self, mutation: Mutation) -> Option<String> {
        self.apply(mutation).and_then(|r| r.created_id)
    }

    fn apply_ok(&mut self, mutation: Mutation) -> bool {
        self.apply(mutation).is_some()
    }

    /// Run several mutations as one undo step
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.history.begin_batch();
        let result = f(self);
        self.history.end_batch(&self.tree);
        result
    }

    // Sections

    /// Append a section and select it. With auto-population the section gets
    /// a row, a column and a placeholder block, each its own history step.
    pub fn add_section(&mut self) -> Option<String> {
        let section_id = self.apply_created(Mutation::AddSection)?;

        if self.config.auto_populate_sections {
            self.populate_section(&section_id);
        }

        self.selection.select(&section_id, &self.index);
        Some(section_id)
    }

    fn populate_section(&mut self, section_id: &str) -> Option<()> {
        let row_id = self.apply_created(Mutation::AddRow {
            section_id: section_id.to_string(),
            columns: 0,
        })?;
        let column_id = self.apply_created(Mutation::AddColumn {
            section_id: section_id.to_string(),
            row_id: row_id.clone(),
        })?;
        self.apply_created(Mutation::AddBlock {
            section_id: section_id.to_string(),
            row_id,
            column_id,
            spec: BlockSpec::placeholder(),
        })?;
        Some(())
    }

    pub fn update_section(&mut self, section_id: &str, patch: Styles) -> bool {
        self.apply_ok(Mutation::UpdateSection {
            section_id: section_id.to_string(),
            patch,
        })
    }

    pub fn delete_section(&mut self, section_id: &str) -> bool {
        self.apply_ok(Mutation::DeleteSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn duplicate_section(&mut self, section_id: &str) -> Option<String> {
        self.apply_created(Mutation::DuplicateSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn move_section(&mut self, section_id: &str, to_index: usize) -> bool {
        self.apply_ok(Mutation::MoveSection {
            section_id: section_id.to_string(),
            to_index,
        })
    }

    // Rows

    /// Append a row with one full-width column
    pub fn add_row(&mut self, section_id: &str) -> Option<String> {
        self.add_row_with_columns(section_id, 1)
    }

    pub fn add_row_with_columns(&mut self, section_id: &str, columns: usize) -> Option<String> {
        self.apply_created(Mutation::AddRow {
            section_id: section_id.to_string(),
            columns,
        })
    }

    pub fn update_row(&mut self, section_id: &str, row_id: &str, patch: Styles) -> bool {
        self.apply_ok(Mutation::UpdateRow {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            patch,
        })
    }

    pub fn delete_row(&mut self, section_id: &str, row_id: &str) -> bool {
        self.apply_ok(Mutation::DeleteRow {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
        })
    }

    pub fn duplicate_row(&mut self, section_id: &str, row_id: &str) -> Option<String> {
        self.apply_created(Mutation::DuplicateRow {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
        })
    }

    pub fn move_row(&mut self, section_id: &str, row_id: &str, to_index: usize) -> bool {
        self.apply_ok(Mutation::MoveRow {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            to_index,
        })
    }

    // Columns

    /// Append a column; all columns of the row get equal widths
    pub fn add_column(&mut self, section_id: &str, row_id: &str) -> Option<String> {
        self.apply_created(Mutation::AddColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
        })
    }

    pub fn update_column(&mut self, section_id: &str, row_id: &str, column_id: &str, patch: Styles) -> bool {
        self.apply_ok(Mutation::UpdateColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            patch,
        })
    }

    /// Remove a column. Remaining widths are not redistributed.
    pub fn delete_column(&mut self, section_id: &str, row_id: &str, column_id: &str) -> bool {
        self.apply_ok(Mutation::DeleteColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
        })
    }

    pub fn duplicate_column(&mut self, section_id: &str, row_id: &str, column_id: &str) -> Option<String> {
        self.apply_created(Mutation::DuplicateColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
        })
    }

    pub fn move_column(&mut self, section_id: &str, row_id: &str, column_id: &str, to_index: usize) -> bool {
        self.apply_ok(Mutation::MoveColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            to_index,
        })
    }

    /// Set one column's width, clamped; neighbours are untouched
    pub fn resize_column(&mut self, section_id: &str, row_id: &str, column_id: &str, width: f64) -> bool {
        self.apply_ok(Mutation::ResizeColumn {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            width,
        })
    }

    /// Override (or with `None`, clear) a column's width for one breakpoint
    pub fn set_column_breakpoint_width(
        &mut self,
        section_id: &str,
        row_id: &str,
        column_id: &str,
        breakpoint: Breakpoint,
        width: Option<f64>,
    ) -> bool {
        self.apply_ok(Mutation::SetColumnBreakpointWidth {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            breakpoint,
            width,
        })
    }

    pub fn clear_column_breakpoint_width(
        &mut self,
        section_id: &str,
        row_id: &str,
        column_id: &str,
        breakpoint: Breakpoint,
    ) -> bool {
        self.set_column_breakpoint_width(section_id, row_id, column_id, breakpoint, None)
    }

    /// Apply a drag of the handle between two columns as one undo step
    pub fn resize_between(&mut self, gesture: &ColumnResizeGesture) -> bool {
        let mutations =
            gesture.to_mutations(&self.tree, self.config.column_bounds(), self.config.resize_mode);
        if mutations.is_empty() {
            tracing::debug!(row = %gesture.row_id, "resize gesture ignored");
            return false;
        }

        self.batch(|editor| {
            mutations
                .into_iter()
                .fold(false, |changed, m| editor.apply_ok(m) || changed)
        })
    }

    /// [`Editor::resize_between`] using the configured container width
    pub fn drag_column_handle(
        &mut self,
        section_id: &str,
        row_id: &str,
        handle_index: usize,
        delta_px: f64,
    ) -> bool {
        let gesture = ColumnResizeGesture {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            handle_index,
            delta_px,
            container_width_px: self.config.container_width,
        };
        self.resize_between(&gesture)
    }

    // Blocks

    pub fn add_block(&mut self, section_id: &str, row_id: &str, column_id: &str, spec: BlockSpec) -> Option<String> {
        self.apply_created(Mutation::AddBlock {
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            spec,
        })
    }

    /// Merge a patch into a block (or sub-block) wherever it is
    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> bool {
        self.apply_ok(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            patch,
        })
    }

    /// Store a column span. It is not checked against the row; the preview truncates it.
    pub fn set_block_span(&mut self, block_id: &str, span: u32) -> bool {
        self.update_block(block_id, BlockPatch::span(span))
    }

    /// Set the media fields chosen in the media picker
    pub fn set_block_media(&mut self, block_id: &str, src: &str, alt: &str) -> bool {
        self.update_block(block_id, BlockPatch::media(src, alt))
    }

    pub fn delete_block(&mut self, block_id: &str) -> bool {
        self.apply_ok(Mutation::DeleteBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.apply_created(Mutation::DuplicateBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn move_block(&mut self, block_id: &str, section_id: &str, row_id: &str, column_id: &str) -> bool {
        self.apply_ok(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            section_id: section_id.to_string(),
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
        })
    }

    pub fn reorder_block(&mut self, block_id: &str, over_id: &str) -> bool {
        self.apply_ok(Mutation::ReorderBlock {
            block_id: block_id.to_string(),
            over_id: over_id.to_string(),
        })
    }

    // Sub-blocks

    pub fn add_sub_block(&mut self, layout_id: &str, spec: BlockSpec) -> Option<String> {
        self.apply_created(Mutation::AddSubBlock {
            block_id: layout_id.to_string(),
            spec,
        })
    }

    pub fn update_sub_block(&mut self, layout_id: &str, sub_block_id: &str, patch: BlockPatch) -> bool {
        self.apply_ok(Mutation::UpdateSubBlock {
            block_id: layout_id.to_string(),
            sub_block_id: sub_block_id.to_string(),
            patch,
        })
    }

    pub fn delete_sub_block(&mut self, layout_id: &str, sub_block_id: &str) -> bool {
        self.apply_ok(Mutation::DeleteSubBlock {
            block_id: layout_id.to_string(),
            sub_block_id: sub_block_id.to_string(),
        })
    }

    pub fn reorder_sub_blocks(&mut self, layout_id: &str, dragged_id: &str, over_id: &str) -> bool {
        self.apply_ok(Mutation::ReorderSubBlocks {
            block_id: layout_id.to_string(),
            dragged_id: dragged_id.to_string(),
            over_id: over_id.to_string(),
        })
    }

    // History

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.tree = snapshot.clone();
        self.after_restore("undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.tree = snapshot.clone();
        self.after_restore("redo");
        true
    }

    fn after_restore(&mut self, action: &str) {
        self.version += 1;
        self.index = NodeIndex::build(&self.tree);
        self.selection.clear();
        tracing::info!(action, cursor = ?self.history.cursor(), "history restored");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Selection

    /// Select a node by id; unknown ids leave the selection unchanged
    pub fn select(&mut self, id: &str) -> bool {
        self.selection.select(id, &self.index)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // Page-wide styles and output

    /// Shallow-merge page-wide styles. These are not part of undo history.
    pub fn set_global_styles(&mut self, patch: PropertyMap) {
        merge_properties(&mut self.global_styles, patch);
    }

    pub fn export(&self) -> ExportedDocument {
        ExportedDocument::new(&self.tree, &self.global_styles)
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        self.export().to_json()
    }

    pub fn preview(&self, breakpoint: Breakpoint) -> PreviewLayout<'_> {
        project(&self.tree, breakpoint)
    }

    pub fn save_draft<S: DraftStore>(&self, store: &S) -> Result<(), S::Error> {
        tracing::info!(version = self.version, "saving draft");
        store.save_draft(&self.export())
    }

    pub fn publish<S: DraftStore>(&self, store: &S) -> Result<(), S::Error> {
        tracing::info!(version = self.version, "publishing");
        store.publish(&self.export())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
