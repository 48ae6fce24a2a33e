//! # Document Model
//!
//! The page tree edited by the block editor:
//!
//! ```text
//! DocumentTree
//!  └─ Section*
//!      └─ Row*
//!          └─ Column*   (percentage width + responsive overrides)
//!              └─ Block*
//!                  └─ sub-block*   (layout blocks only, one level deep)
//! ```
//!
//! Every node is exclusively owned by its parent. There are no back
//! references; anything that needs to find a node by id goes through
//! [`crate::NodeIndex`] or one of the linear finders on [`DocumentTree`].

use crate::errors::EditorError;
use crate::id_generator::IdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Free-form property bag used for block content and style values
pub type PropertyMap = Map<String, Value>;

/// Text shown in the block that seeds every new section
pub const PLACEHOLDER_TEXT: &str = "Start writing here...";

/// Responsive context used for style and width overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Breakpoint::Mobile),
            "tablet" => Ok(Breakpoint::Tablet),
            "desktop" => Ok(Breakpoint::Desktop),
            other => Err(EditorError::UnknownBreakpoint(other.to_string())),
        }
    }
}

/// Visual properties of a node (colors, spacing, animation, ...)
///
/// Base values serialize inline next to an optional `responsive` map that
/// holds per-breakpoint overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    #[serde(flatten)]
    pub base: PropertyMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive: BTreeMap<Breakpoint, PropertyMap>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style base property setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    /// Builder-style override setter for one breakpoint
    pub fn with_override(
        mut self,
        breakpoint: Breakpoint,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.responsive
            .entry(breakpoint)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.base.get(key)
    }

    /// Look up a property for a breakpoint, falling back to the base value
    pub fn resolve(&self, key: &str, breakpoint: Breakpoint) -> Option<&Value> {
        self.responsive
            .get(&breakpoint)
            .and_then(|overrides| overrides.get(key))
            .or_else(|| self.base.get(key))
    }

    /// Shallow-merge `patch` into these styles, breakpoint by breakpoint
    pub fn merge(&mut self, patch: Styles) {
        merge_properties(&mut self.base, patch.base);
        for (breakpoint, overrides) in patch.responsive {
            merge_properties(self.responsive.entry(breakpoint).or_default(), overrides);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.responsive.is_empty()
    }
}

/// Shallow merge: top-level keys of `patch` replace those in `target`
pub fn merge_properties(target: &mut PropertyMap, patch: PropertyMap) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Closed set of block variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Heading,
    Image,
    Gallery,
    Video,
    Button,
    Contact,
    Reference,
    Map,
    Divider,
    Icon,
    Table,
    Layout,
}

impl BlockKind {
    pub fn is_layout(&self) -> bool {
        matches!(self, BlockKind::Layout)
    }
}

fn default_span() -> u32 {
    1
}

fn is_default_span(span: &u32) -> bool {
    *span == 1
}

/// Typed unit of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Variant-specific fields, owned by the block renderers
    #[serde(default)]
    pub content: PropertyMap,

    #[serde(default)]
    pub styles: Styles,

    /// Number of row columns this block wants to cover; truncated at render time
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub column_span: u32,

    /// Present only on layout blocks; never contains another layout block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_blocks: Vec<Block>,
}

impl Block {
    pub fn from_spec(id: String, spec: BlockSpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            content: spec.content,
            styles: spec.styles,
            column_span: spec.column_span.max(1),
            sub_blocks: Vec::new(),
        }
    }

    /// Merge a patch into content and styles
    pub fn apply_patch(&mut self, patch: BlockPatch) {
        merge_properties(&mut self.content, patch.content);
        if let Some(styles) = patch.styles {
            self.styles.merge(styles);
        }
        if let Some(span) = patch.column_span {
            self.column_span = span.max(1);
        }
    }

    pub fn sub_block(&self, id: &str) -> Option<&Block> {
        self.sub_blocks.iter().find(|b| b.id == id)
    }

    /// Give this block (and its sub-blocks) fresh ids
    pub fn refresh_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();
        for sub in &mut self.sub_blocks {
            sub.refresh_ids(ids);
        }
    }
}

/// Template for a block that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpec {
    #[serde(rename = "type")]
    pub kind: BlockKind,

    #[serde(default)]
    pub content: PropertyMap,

    #[serde(default)]
    pub styles: Styles,

    #[serde(default = "default_span")]
    pub column_span: u32,
}

impl BlockSpec {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            content: PropertyMap::new(),
            styles: Styles::default(),
            column_span: 1,
        }
    }

    /// The text block every auto-populated section starts with
    pub fn placeholder() -> Self {
        Self::new(BlockKind::Text).with_content("text", PLACEHOLDER_TEXT)
    }

    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_span(mut self, span: u32) -> Self {
        self.column_span = span;
        self
    }
}

/// Partial update for a block. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub content: PropertyMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<u32>,
}

impl BlockPatch {
    pub fn content(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut content = PropertyMap::new();
        content.insert(key.into(), value.into());
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn styles(styles: Styles) -> Self {
        Self {
            styles: Some(styles),
            ..Self::default()
        }
    }

    pub fn span(span: u32) -> Self {
        Self {
            column_span: Some(span),
            ..Self::default()
        }
    }

    /// Patch produced by the media picker
    pub fn media(src: impl Into<String>, alt: impl Into<String>) -> Self {
        let mut patch = Self::content("src", src.into());
        patch.content.insert("alt".to_string(), Value::String(alt.into()));
        patch
    }
}

/// Vertical slot within a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,

    /// Percentage of the parent row, `0 < width <= 100`
    pub width: f64,

    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default)]
    pub styles: Styles,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive_width: BTreeMap<Breakpoint, f64>,
}

impl Column {
    pub fn new(id: String, width: f64) -> Self {
        Self {
            id,
            width,
            blocks: Vec::new(),
            styles: Styles::default(),
            responsive_width: BTreeMap::new(),
        }
    }

    /// Width for a breakpoint, falling back to the base width
    pub fn width_at(&self, breakpoint: Breakpoint) -> f64 {
        self.responsive_width
            .get(&breakpoint)
            .copied()
            .unwrap_or(self.width)
    }

    pub fn refresh_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();
        for block in &mut self.blocks {
            block.refresh_ids(ids);
        }
    }
}

/// Horizontal container of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub styles: Styles,
}

impl Row {
    pub fn new(id: String) -> Self {
        Self {
            id,
            columns: Vec::new(),
            styles: Styles::default(),
        }
    }

    pub fn total_width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn column_widths(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn refresh_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();
        for column in &mut self.columns {
            column.refresh_ids(ids);
        }
    }
}

/// Top-level container of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,

    #[serde(default)]
    pub rows: Vec<Row>,

    #[serde(default)]
    pub styles: Styles,
}

impl Section {
    pub fn new(id: String) -> Self {
        Self {
            id,
            rows: Vec::new(),
            styles: Styles::default(),
        }
    }

    pub fn refresh_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();
        for row in &mut self.rows {
            row.refresh_ids(ids);
        }
    }
}

/// The whole page: an ordered list of sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn row(&self, section_id: &str, row_id: &str) -> Option<&Row> {
        self.section(section_id)?.rows.iter().find(|r| r.id == row_id)
    }

    pub fn column(&self, section_id: &str, row_id: &str, column_id: &str) -> Option<&Column> {
        self.row(section_id, row_id)?
            .columns
            .iter()
            .find(|c| c.id == column_id)
    }

    /// Find a block (top-level or nested in a layout) anywhere in the tree
    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.blocks().find_map(|block| {
            if block.id == id {
                Some(block)
            } else {
                block.sub_block(id)
            }
        })
    }

    /// Iterate over every top-level block, in document order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.blocks.iter())
    }

    /// Every id in the tree, in document order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for section in &self.sections {
            ids.push(section.id.as_str());
            for row in &section.rows {
                ids.push(row.id.as_str());
                for column in &row.columns {
                    ids.push(column.id.as_str());
                    for block in &column.blocks {
                        ids.push(block.id.as_str());
                        ids.extend(block.sub_blocks.iter().map(|b| b.id.as_str()));
                    }
                }
            }
        }
        ids
    }

    /// Node counts as `(sections, rows, columns, blocks)`
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let rows = self.sections.iter().map(|s| s.rows.len()).sum();
        let columns = self
            .sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| r.columns.len())
            .sum();
        (self.sections.len(), rows, columns, self.blocks().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_resolution_falls_back_to_base() {
        let styles = Styles::new()
            .with("padding", "16px")
            .with("color", "#222")
            .with_override(Breakpoint::Mobile, "padding", "8px");

        assert_eq!(styles.resolve("padding", Breakpoint::Mobile), Some(&json!("8px")));
        assert_eq!(styles.resolve("padding", Breakpoint::Desktop), Some(&json!("16px")));
        assert_eq!(styles.resolve("color", Breakpoint::Mobile), Some(&json!("#222")));
        assert_eq!(styles.resolve("margin", Breakpoint::Tablet), None);
    }

    #[test]
    fn test_styles_serialize_inline_with_responsive_map() {
        let styles = Styles::new()
            .with("background", "white")
            .with_override(Breakpoint::Tablet, "background", "gray");

        let value = serde_json::to_value(&styles).unwrap();
        assert_eq!(
            value,
            json!({ "background": "white", "responsive": { "tablet": { "background": "gray" } } })
        );

        let back: Styles = serde_json::from_value(value).unwrap();
        assert_eq!(back, styles);
    }

    #[test]
    fn test_styles_merge_is_shallow() {
        let mut styles = Styles::new()
            .with("margin", json!({ "top": 4, "bottom": 4 }))
            .with("color", "red");

        styles.merge(Styles::new().with("margin", json!({ "top": 10 })));

        assert_eq!(styles.get("margin"), Some(&json!({ "top": 10 })));
        assert_eq!(styles.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_block_patch_merges_content() {
        let mut block = Block::from_spec(
            "b-1".to_string(),
            BlockSpec::new(BlockKind::Image).with_content("caption", "Office"),
        );

        block.apply_patch(BlockPatch::media("/uploads/office.jpg", "Our office"));

        assert_eq!(block.content["src"], json!("/uploads/office.jpg"));
        assert_eq!(block.content["alt"], json!("Our office"));
        assert_eq!(block.content["caption"], json!("Office"));
    }

    #[test]
    fn test_span_never_below_one() {
        let mut block = Block::from_spec("b-1".to_string(), BlockSpec::new(BlockKind::Text).with_span(0));
        assert_eq!(block.column_span, 1);

        block.apply_patch(BlockPatch::span(0));
        assert_eq!(block.column_span, 1);

        block.apply_patch(BlockPatch::span(3));
        assert_eq!(block.column_span, 3);
    }

    #[test]
    fn test_column_width_at_breakpoint() {
        let mut column = Column::new("c-1".to_string(), 50.0);
        column.responsive_width.insert(Breakpoint::Mobile, 100.0);

        assert_eq!(column.width_at(Breakpoint::Mobile), 100.0);
        assert_eq!(column.width_at(Breakpoint::Desktop), 50.0);
    }

    #[test]
    fn test_block_json_shape() {
        let json = r#"{
            "id": "b-7",
            "type": "layout",
            "content": { "layout": "two-up" },
            "columnSpan": 2,
            "subBlocks": [
                { "id": "b-8", "type": "image", "content": { "src": "/a.png" } }
            ]
        }"#;

        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.kind, BlockKind::Layout);
        assert_eq!(block.column_span, 2);
        assert_eq!(block.sub_blocks.len(), 1);
        assert_eq!(block.sub_blocks[0].column_span, 1);
        assert!(block.sub_blocks[0].styles.is_empty());
    }

    #[test]
    fn test_breakpoint_from_str() {
        assert_eq!("tablet".parse::<Breakpoint>().unwrap(), Breakpoint::Tablet);
        assert!("watch".parse::<Breakpoint>().is_err());
    }
}
