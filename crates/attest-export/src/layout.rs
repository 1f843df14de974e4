//! The in-memory document tree handed to the renderer.
//!
//! A [`Page`] is built once per request, rendered, and discarded. The tree
//! is fully serializable so tests and fake renderers can assert its shape
//! without decoding PDF bytes. Page-number references in the footer stay
//! symbolic ([`Inline::CurrentPage`] / [`Inline::TotalPages`]) until
//! pagination has finished.

use serde::{Deserialize, Serialize};

use crate::styles::{Color, TextStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub regions: Vec<Region>,
}

impl Page {
    /// The region order is fixed: header, content, footer.
    pub fn new(header: Region, content: Region, footer: Region) -> Self {
        Self {
            regions: vec![header, content, footer],
        }
    }

    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Header,
    Content,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Title {
        text: String,
        style: TextStyle,
    },
    KeyValueTable {
        rows: Vec<KeyValueRow>,
        key_style: TextStyle,
        value_style: TextStyle,
        spacing_after: f32,
    },
    Paragraph {
        spans: Vec<Inline>,
        style: TextStyle,
    },
    Divider {
        weight: f32,
        color: Color,
        spacing_before: f32,
        spacing_after: f32,
    },
}

impl Block {
    /// A paragraph holding a single literal span.
    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Block::Paragraph {
            spans: vec![Inline::Text(text.into())],
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub key: String,
    pub value: String,
}

/// Inline content of a paragraph.
///
/// The page-number variants are placeholders: the renderer substitutes real
/// values when it stamps footers, after the total page count is known.
/// Outside a footer they resolve to empty text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    CurrentPage,
    TotalPages,
}
