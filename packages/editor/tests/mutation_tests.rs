//! Mutations as plain data: scripted edits applied through `Editor::try_apply`

use pagecraft_editor::{BlockKind, Editor, Mutation, MutationError};
use serde_json::json;

fn script(editor: &mut Editor, steps: serde_json::Value) -> Vec<Result<Option<String>, MutationError>> {
    let steps: Vec<Mutation> = serde_json::from_value(steps).unwrap();
    steps
        .into_iter()
        .map(|m| editor.try_apply(m).map(|r| r.created_id))
        .collect()
}

#[test]
fn test_scripted_page() -> anyhow::Result<()> {
    let mut editor = Editor::new();
    let section = editor.add_section().unwrap();
    let row = editor.sections()[0].rows[0].id.clone();
    let column = editor.sections()[0].rows[0].columns[0].id.clone();

    let results = script(
        &mut editor,
        json!([
            { "op": "add_block", "section_id": section, "row_id": row, "column_id": column,
              "spec": { "type": "heading", "content": { "text": "Work with us" } } },
            { "op": "add_column", "section_id": section, "row_id": row },
            { "op": "update_section", "section_id": section,
              "patch": { "background": "#f5f5f5", "responsive": { "mobile": { "padding": "8px" } } } }
        ]),
    );

    assert!(results.iter().all(|r| r.is_ok()));
    let heading_id = results[0].clone()?.unwrap();
    let heading = editor.tree().find_block(&heading_id).unwrap();
    assert_eq!(heading.kind, BlockKind::Heading);
    assert_eq!(heading.content["text"], "Work with us");

    let styles = &editor.sections()[0].styles;
    assert_eq!(styles.get("background"), Some(&json!("#f5f5f5")));
    assert_eq!(
        styles.resolve("padding", pagecraft_editor::Breakpoint::Mobile),
        Some(&json!("8px"))
    );
    Ok(())
}

#[test]
fn test_try_apply_reports_reason() {
    let mut editor = Editor::new();
    let section = editor.add_section().unwrap();
    let row = editor.sections()[0].rows[0].id.clone();
    let column = editor.sections()[0].rows[0].columns[0].id.clone();
    let version = editor.version();

    let results = script(
        &mut editor,
        json!([
            { "op": "delete_row", "section_id": section, "row_id": "nope" },
            { "op": "delete_column", "section_id": section, "row_id": row, "column_id": column },
            { "op": "add_sub_block", "block_id": "nope", "spec": { "type": "text" } }
        ]),
    );

    assert_eq!(results[0], Err(MutationError::RowNotFound("nope".to_string())));
    assert_eq!(results[1], Err(MutationError::LastColumn(row.clone())));
    assert!(results[2].is_err());
    assert_eq!(editor.version(), version);
}

#[test]
fn test_version_counts_applied_mutations() {
    let mut editor = Editor::new();
    let section = editor.add_section().unwrap();
    assert_eq!(editor.version(), 4);

    let result = editor
        .try_apply(Mutation::AddRow {
            section_id: section,
            columns: 2,
        })
        .unwrap();
    assert_eq!(result.version, 5);
    assert!(result.created_id.is_some());

    editor.undo();
    assert_eq!(editor.version(), 6);
}

#[test]
fn test_mutation_json_shape() {
    let mutation = Mutation::MoveSection {
        section_id: "s1".to_string(),
        to_index: 2,
    };
    let value = serde_json::to_value(&mutation).unwrap();
    assert_eq!(value, json!({ "op": "move_section", "section_id": "s1", "to_index": 2 }));
}
