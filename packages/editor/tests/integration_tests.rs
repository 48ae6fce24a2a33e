//! Integration tests for the editor crate

use pagecraft_editor::{
    BlockKind, BlockPatch, BlockSpec, Breakpoint, ColumnResizeGesture, Editor, EditorConfig,
    ExportedDocument, MemoryStore, NodeIndex, ResizeMode, MAX_COLUMNS, PLACEHOLDER_TEXT,
};

/// Editor with one auto-populated section; returns (section, row, column) ids
fn editor_with_section() -> (Editor, String, String, String) {
    let mut editor = Editor::new();
    let section = editor.add_section().unwrap();
    let row = editor.sections()[0].rows[0].id.clone();
    let column = editor.sections()[0].rows[0].columns[0].id.clone();
    (editor, section, row, column)
}

#[test]
fn test_add_section_history_scenario() {
    let mut editor = Editor::new();
    editor.add_section();

    assert_eq!(editor.tree().counts(), (1, 1, 1, 1));
    assert_eq!(editor.history().len(), 4);
    assert_eq!(editor.history().cursor(), Some(3));

    let block = &editor.sections()[0].rows[0].columns[0].blocks[0];
    assert_eq!(block.kind, BlockKind::Text);
    assert_eq!(block.content["text"], PLACEHOLDER_TEXT);

    for _ in 0..3 {
        assert!(editor.undo());
    }
    assert_eq!(editor.tree().counts(), (1, 0, 0, 0));
    assert_eq!(editor.history().cursor(), Some(0));

    assert!(editor.redo());
    assert_eq!(editor.tree().counts(), (1, 1, 0, 0));
    assert!(editor.redo());
    assert!(editor.redo());
    assert_eq!(editor.tree().counts(), (1, 1, 1, 1));
}

#[test]
fn test_add_column_redistributes() {
    let (mut editor, s, r, _) = editor_with_section();
    editor.add_column(&s, &r);
    assert_eq!(editor.tree().row(&s, &r).unwrap().column_widths(), vec![50.0, 50.0]);

    editor.add_column(&s, &r);
    let row = editor.tree().row(&s, &r).unwrap();
    assert_eq!(row.column_widths(), vec![33.0, 33.0, 34.0]);
    assert_eq!(row.total_width(), 100.0);
}

#[test]
fn test_width_sum_after_many_adds() {
    let (mut editor, s, r, _) = editor_with_section();

    for _ in 0..10 {
        editor.add_column(&s, &r);
        let row = editor.tree().row(&s, &r).unwrap();
        assert_eq!(row.total_width(), 100.0, "widths {:?}", row.column_widths());
    }
}

#[test]
fn test_resize_clamps_single_column() {
    let (mut editor, s, r, c) = editor_with_section();
    editor.add_column(&s, &r);

    assert!(editor.resize_column(&s, &r, &c, 95.0));
    assert_eq!(editor.tree().row(&s, &r).unwrap().column_widths(), vec![90.0, 50.0]);

    assert!(editor.resize_column(&s, &r, &c, 2.0));
    assert_eq!(editor.tree().row(&s, &r).unwrap().column_widths(), vec![10.0, 50.0]);
}

#[test]
fn test_independent_drag_drifts_at_bounds() {
    let (mut editor, s, r, _) = editor_with_section();
    editor.add_column(&s, &r);

    // +50% would push the pair to [100, 0]
    assert!(editor.drag_column_handle(&s, &r, 0, 600.0));
    let row = editor.tree().row(&s, &r).unwrap();
    assert_eq!(row.column_widths(), vec![90.0, 10.0]);
    assert_eq!(row.total_width(), 100.0);

    // Another push: left stays at 90, right already at minimum
    editor.drag_column_handle(&s, &r, 0, 240.0);
    assert_eq!(editor.tree().row(&s, &r).unwrap().column_widths(), vec![90.0, 10.0]);
}

#[test]
fn test_joint_drag_preserves_pair_sum() {
    let config = EditorConfig {
        resize_mode: ResizeMode::Joint,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config(config);
    let s = editor.add_section().unwrap();
    let r = editor.sections()[0].rows[0].id.clone();
    editor.add_column(&s, &r);
    editor.add_column(&s, &r);

    let gesture = ColumnResizeGesture {
        section_id: s.clone(),
        row_id: r.clone(),
        handle_index: 1,
        delta_px: 1200.0,
        container_width_px: 1200.0,
    };
    assert!(editor.resize_between(&gesture));

    let row = editor.tree().row(&s, &r).unwrap();
    assert_eq!(row.column_widths(), vec![33.0, 57.0, 10.0]);
    assert_eq!(row.total_width(), 100.0);
}

#[test]
fn test_stale_ids_are_noops() {
    let (mut editor, s, r, c) = editor_with_section();
    let before = editor.tree().clone();
    let entries = editor.history().len();

    assert!(!editor.delete_section("gone"));
    assert!(!editor.delete_row(&s, "gone"));
    assert!(!editor.delete_column(&s, "gone", &c));
    assert!(!editor.resize_column(&s, &r, "gone", 40.0));
    assert!(editor.add_block(&s, &r, "gone", BlockSpec::new(BlockKind::Text)).is_none());
    assert!(!editor.update_block("gone", BlockPatch::content("text", "x")));
    assert!(editor.duplicate_block("gone").is_none());
    assert!(!editor.move_block("gone", &s, &r, &c));

    assert_eq!(editor.tree(), &before);
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn test_history_exhaustion_is_noop() {
    let (mut editor, ..) = editor_with_section();

    assert!(!editor.redo());
    while editor.undo() {}
    assert_eq!(editor.history().cursor(), Some(0));
    assert!(!editor.undo());
    assert_eq!(editor.tree().counts(), (1, 0, 0, 0));
}

#[test]
fn test_history_cap() {
    let mut editor = Editor::new();
    let config = EditorConfig {
        auto_populate_sections: false,
        ..EditorConfig::default()
    };
    let mut bare = Editor::with_config(config);

    for _ in 0..60 {
        bare.add_section();
    }
    assert_eq!(bare.history().len(), 50);
    assert_eq!(bare.history().cursor(), Some(49));

    // Oldest surviving entry is the state after the 11th mutation
    assert_eq!(bare.history().entries()[0].tree.sections.len(), 11);

    let mut undos = 0;
    while bare.undo() {
        undos += 1;
    }
    assert_eq!(undos, 49);
    assert_eq!(bare.sections().len(), 11);

    // Same cap with auto-populated sections
    for _ in 0..20 {
        editor.add_section();
    }
    assert_eq!(editor.history().len(), 50);
}

#[test]
fn test_new_mutation_drops_redo_branch() {
    let (mut editor, s, r, c) = editor_with_section();
    editor.add_block(&s, &r, &c, BlockSpec::new(BlockKind::Image));
    editor.undo();
    assert!(editor.can_redo());

    editor.add_block(&s, &r, &c, BlockSpec::new(BlockKind::Video));
    assert!(!editor.can_redo());

    let kinds: Vec<_> = editor.tree().column(&s, &r, &c).unwrap().blocks.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Text, BlockKind::Video]);
}

#[test]
fn test_duplicate_section_fresh_descendants() {
    let (mut editor, s, r, c) = editor_with_section();
    let layout = editor.add_block(&s, &r, &c, BlockSpec::new(BlockKind::Layout)).unwrap();
    editor.add_sub_block(&layout, BlockSpec::new(BlockKind::Button));

    let copy = editor.duplicate_section(&s).unwrap();
    assert_ne!(copy, s);
    assert_eq!(editor.sections()[1].id, copy);

    let original_ids: Vec<String> = {
        let tree = pagecraft_editor::DocumentTree {
            sections: vec![editor.sections()[0].clone()],
        };
        tree.ids().into_iter().map(str::to_string).collect()
    };
    let copy_tree = pagecraft_editor::DocumentTree {
        sections: vec![editor.sections()[1].clone()],
    };
    let copy_ids = copy_tree.ids();

    assert_eq!(original_ids.len(), copy_ids.len());
    for id in copy_ids {
        assert!(!original_ids.iter().any(|o| o == id), "{} reused", id);
    }
    assert!(NodeIndex::build(editor.tree()).duplicates().is_empty());
}

#[test]
fn test_move_block_between_columns() {
    let (mut editor, s, r, c) = editor_with_section();
    let target = editor.add_column(&s, &r).unwrap();
    let block = editor.sections()[0].rows[0].columns[0].blocks[0].id.clone();

    assert!(editor.move_block(&block, &s, &r, &target));

    assert!(editor.tree().column(&s, &r, &c).unwrap().blocks.is_empty());
    let moved = &editor.tree().column(&s, &r, &target).unwrap().blocks;
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, block);

    // The index follows the move
    assert!(editor.select(&block));
    assert_eq!(editor.selection().column.as_deref(), Some(target.as_str()));
}

#[test]
fn test_layout_block_nesting() {
    let (mut editor, s, r, c) = editor_with_section();
    let text = editor.sections()[0].rows[0].columns[0].blocks[0].id.clone();
    let layout = editor.add_block(&s, &r, &c, BlockSpec::new(BlockKind::Layout)).unwrap();

    assert!(editor.add_sub_block(&layout, BlockSpec::new(BlockKind::Layout)).is_none());
    assert!(editor.add_sub_block(&text, BlockSpec::new(BlockKind::Image)).is_none());

    let a = editor.add_sub_block(&layout, BlockSpec::new(BlockKind::Heading)).unwrap();
    let b = editor.add_sub_block(&layout, BlockSpec::new(BlockKind::Button)).unwrap();

    // Global lookup reaches sub-blocks
    assert!(editor.update_block(&b, BlockPatch::content("label", "Apply now")));
    assert!(editor.reorder_sub_blocks(&layout, &b, &a));

    let subs = &editor.tree().find_block(&layout).unwrap().sub_blocks;
    assert_eq!(subs[0].id, b);
    assert_eq!(subs[0].content["label"], "Apply now");

    assert!(editor.select(&a));
    assert_eq!(editor.selection().block.as_deref(), Some(a.as_str()));
    assert!(editor.delete_sub_block(&layout, &a));
    assert_eq!(editor.selection().block, None);
}

#[test]
fn test_span_stored_then_truncated_in_preview() {
    let (mut editor, s, r, c) = editor_with_section();
    editor.add_column(&s, &r);
    let block = editor.tree().column(&s, &r, &c).unwrap().blocks[0].id.clone();

    assert!(editor.set_block_span(&block, 4));
    assert_eq!(editor.tree().find_block(&block).unwrap().column_span, 4);

    let preview = editor.preview(Breakpoint::Desktop);
    let placement = &preview.sections[0].rows[0].placements[0];
    assert_eq!(placement.span, 2);

    // Deleting a column narrows the rendered span; the stored one is kept
    let second = editor.sections()[0].rows[0].columns[1].id.clone();
    editor.delete_column(&s, &r, &second);
    let preview = editor.preview(Breakpoint::Desktop);
    assert_eq!(preview.sections[0].rows[0].placements[0].span, 1);
    assert_eq!(editor.tree().find_block(&block).unwrap().column_span, 4);
}

#[test]
fn test_responsive_width_in_preview() {
    let (mut editor, s, r, c) = editor_with_section();
    editor.add_column(&s, &r);

    assert!(editor.set_column_breakpoint_width(&s, &r, &c, Breakpoint::Mobile, Some(100.0)));
    let mobile = editor.preview(Breakpoint::Mobile);
    // 100 is clamped to the configured maximum
    assert_eq!(mobile.sections[0].rows[0].column_widths, vec![90.0, 50.0]);

    let desktop = editor.preview(Breakpoint::Desktop);
    assert_eq!(desktop.sections[0].rows[0].column_widths, vec![50.0, 50.0]);

    assert!(editor.clear_column_breakpoint_width(&s, &r, &c, Breakpoint::Mobile));
    let mobile = editor.preview(Breakpoint::Mobile);
    assert_eq!(mobile.sections[0].rows[0].column_widths, vec![50.0, 50.0]);
}

#[test]
fn test_export_import_round_trip() {
    let (mut editor, s, r, c) = editor_with_section();
    let layout = editor.add_block(&s, &r, &c, BlockSpec::new(BlockKind::Layout)).unwrap();
    editor.add_sub_block(&layout, BlockSpec::new(BlockKind::Image).with_content("src", "/hero.png"));
    let mut styles = pagecraft_editor::PropertyMap::new();
    styles.insert("fontFamily".to_string(), "Inter".into());
    editor.set_global_styles(styles);

    let json = editor.export_json().unwrap();
    let document = ExportedDocument::from_json(&json).unwrap();
    assert_eq!(document.sections, editor.sections());
    assert_eq!(document.global_styles["fontFamily"], "Inter");

    let resumed = Editor::from_export(document, EditorConfig::default()).unwrap();
    assert_eq!(resumed.tree(), editor.tree());
}

#[test]
fn test_draft_and_publish() {
    let (mut editor, ..) = editor_with_section();
    let store = MemoryStore::new();

    editor.save_draft(&store).unwrap();
    editor.add_section();
    editor.save_draft(&store).unwrap();
    editor.publish(&store).unwrap();

    assert_eq!(store.drafts().len(), 2);
    assert_eq!(store.drafts()[0].sections.len(), 1);
    assert_eq!(store.published()[0].sections.len(), 2);
}

#[test]
fn test_widest_row_survives_export() {
    let (mut editor, s, ..) = editor_with_section();
    assert!(editor.add_row_with_columns(&s, MAX_COLUMNS + 1).is_none());

    let row = editor.add_row_with_columns(&s, MAX_COLUMNS).unwrap();
    assert!(editor.add_column(&s, &row).is_none());
    assert_eq!(editor.tree().row(&s, &row).unwrap().total_width(), 100.0);

    let resumed = Editor::from_json(&editor.export_json().unwrap(), EditorConfig::default()).unwrap();
    assert_eq!(resumed.tree(), editor.tree());
}
