//! The block-level document tree.
//!
//! Block nodes own copies of their raw inline text; inline markup is only
//! scanned when the tree is formatted, and never stored.

use smallvec::SmallVec;

use crate::arena_tree::Node;

/// The core block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// The root of every document.
    Document,

    /// A `>` block quote. Contains other blocks.
    BlockQuote,

    /// A `>!` spoiler block. Contains other blocks.
    BlockSpoiler,

    /// A list. Contains `Item`s.
    List(NodeList),

    /// A list item. Contains `ItemText` and/or other blocks.
    Item(NodeItem),

    /// The inline text of a tight list item.
    ItemText(Vec<u8>),

    /// A paragraph, holding its raw inline text.
    Paragraph(Vec<u8>),

    /// An ATX or setext header.
    Heading(NodeHeading),

    /// An indented or fenced code block.
    CodeBlock(NodeCodeBlock),

    /// A horizontal rule.
    ThematicBreak,

    /// A table. Contains one header `TableRow` followed by body rows.
    Table(NodeTable),

    /// A table row. The `bool` is true for the header row.
    TableRow(bool),

    /// A table cell, holding its raw inline text.
    TableCell(NodeTableCell),
}

impl NodeValue {
    /// Whether the node's children are other blocks.
    pub fn contains_blocks(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::BlockSpoiler
                | NodeValue::List(..)
                | NodeValue::Item(..)
        )
    }

    /// Short name of the node type, for debugging and logs.
    pub fn xml_node_name(&self) -> &'static str {
        match *self {
            NodeValue::Document => "document",
            NodeValue::BlockQuote => "block_quote",
            NodeValue::BlockSpoiler => "block_spoiler",
            NodeValue::List(..) => "list",
            NodeValue::Item(..) => "item",
            NodeValue::ItemText(..) => "item_text",
            NodeValue::Paragraph(..) => "paragraph",
            NodeValue::Heading(..) => "heading",
            NodeValue::CodeBlock(..) => "code_block",
            NodeValue::ThematicBreak => "thematic_break",
            NodeValue::Table(..) => "table",
            NodeValue::TableRow(..) => "table_row",
            NodeValue::TableCell(..) => "table_cell",
        }
    }
}

/// The metadata of a list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeList {
    /// `1.`-style rather than bulleted.
    pub ordered: bool,
}

/// The metadata of a list item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeItem {
    /// The item belongs to a loose list: its text renders as paragraphs.
    pub block: bool,
}

/// The metadata and raw text of a header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeHeading {
    /// 1 to 6.
    pub level: u8,

    /// Raw inline text.
    pub content: Vec<u8>,
}

/// The metadata and contents of a code block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeCodeBlock {
    /// The fence's language string, if any. Always `None` for indented
    /// blocks.
    pub info: Option<Vec<u8>>,

    /// The literal contents, ending in a newline.
    pub literal: Vec<u8>,
}

/// Alignment of a table column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl TableAlignment {
    pub(crate) fn xml_name(&self) -> Option<&'static str> {
        match *self {
            TableAlignment::None => None,
            TableAlignment::Left => Some("left"),
            TableAlignment::Center => Some("center"),
            TableAlignment::Right => Some("right"),
        }
    }
}

/// The metadata of a table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeTable {
    /// Per-column alignment, one entry per column.
    pub alignments: SmallVec<[TableAlignment; 8]>,
}

/// A table cell.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeTableCell {
    pub alignment: TableAlignment,
    /// Columns spanned; more than 1 only for the padding cell of a short row.
    pub colspan: usize,
    /// Raw inline text.
    pub content: Vec<u8>,
}

/// A node in the block tree.
pub type AstNode<'a> = Node<'a, NodeValue>;
