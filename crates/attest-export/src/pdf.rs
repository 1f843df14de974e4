//! PDF rendering of the layout tree.
//!
//! Rendering is two-pass: content blocks are first flowed into per-page
//! operation lists, then the footer, which needs the final page count, is
//! stamped onto every page. Header and footer regions repeat on each page.
//!
//! Output is uncompressed PDF 1.5 using the base-14 Helvetica family, with
//! stable object numbering and no embedded timestamps, so identical trees
//! produce identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use attest_core::models::artifact::RenderedArtifact;

use crate::error::ExportError;
use crate::layout::{Block, Inline, Page, Region, RegionKind};
use crate::styles::{Align, Color, PageGeometry, TextStyle};

/// Approximate Helvetica advance width as a fraction of the font size,
/// used for wrapping and centering. Exact metrics are not required for a
/// fixed template.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Vertical advance per wrapped line as a multiple of the font size.
const LINE_SPACING: f32 = 1.3;

/// Space reserved under the content area for the footer line.
const FOOTER_CLEARANCE: f32 = 24.0;

/// Padding inside each key/value table cell.
const TABLE_CELL_PADDING: f32 = 3.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";
const FONT_BOLD_ITALIC: &str = "F4";

/// Render a layout tree into a complete PDF document.
///
/// Fails with [`ExportError::Encoding`] if any text cannot be drawn with
/// the base fonts; no partial artifact is produced.
pub fn render(page: &Page, geometry: &PageGeometry) -> Result<RenderedArtifact, ExportError> {
    let (header_ops, header_height) = match page.region(RegionKind::Header) {
        Some(region) => {
            layout_region(region, geometry, geometry.height - geometry.margin, None)?
        }
        None => (Vec::new(), 0.0),
    };

    let content_pages = match page.region(RegionKind::Content) {
        Some(region) => flow_content(region, geometry, header_height)?,
        None => vec![Vec::new()],
    };
    let total = content_pages.len();

    tracing::debug!(pages = total, "certificate layout complete");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = doc.add_object(font_resources());

    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (index, content_ops) in content_pages.into_iter().enumerate() {
        let mut operations = header_ops.clone();
        operations.extend(content_ops);
        if let Some(region) = page.region(RegionKind::Footer) {
            let (footer_ops, _) = layout_region(
                region,
                geometry,
                geometry.margin + FOOTER_CLEARANCE,
                Some((index + 1, total)),
            )?;
            operations.extend(footer_ops);
        }

        let encoded = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.0.into(),
            0.0.into(),
            geometry.width.into(),
            geometry.height.into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(RenderedArtifact::pdf(bytes))
}

fn font_resources() -> Dictionary {
    dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => dictionary! {
                "Type" => "Font", "Subtype" => "Type1",
                "BaseFont" => "Helvetica", "Encoding" => "WinAnsiEncoding",
            },
            FONT_BOLD => dictionary! {
                "Type" => "Font", "Subtype" => "Type1",
                "BaseFont" => "Helvetica-Bold", "Encoding" => "WinAnsiEncoding",
            },
            FONT_ITALIC => dictionary! {
                "Type" => "Font", "Subtype" => "Type1",
                "BaseFont" => "Helvetica-Oblique", "Encoding" => "WinAnsiEncoding",
            },
            FONT_BOLD_ITALIC => dictionary! {
                "Type" => "Font", "Subtype" => "Type1",
                "BaseFont" => "Helvetica-BoldOblique", "Encoding" => "WinAnsiEncoding",
            },
        },
    }
}

fn font_for(style: &TextStyle) -> &'static str {
    match (style.bold, style.italic) {
        (false, false) => FONT_REGULAR,
        (true, false) => FONT_BOLD,
        (false, true) => FONT_ITALIC,
        (true, true) => FONT_BOLD_ITALIC,
    }
}

/// One positioned line-level primitive. Blocks are reduced to atoms so the
/// content flow can break pages between lines, never through them.
enum Atom {
    Line {
        piece: TextPiece,
        align: Align,
        height: f32,
    },
    Row {
        cells: Vec<(f32, TextPiece)>,
        size: f32,
        height: f32,
    },
    Rule {
        weight: f32,
        color: Color,
    },
    Gap(f32),
}

struct TextPiece {
    text: String,
    font: &'static str,
    size: f32,
    color: Color,
}

impl Atom {
    fn height(&self) -> f32 {
        match self {
            Atom::Line { height, .. } | Atom::Row { height, .. } => *height,
            Atom::Rule { weight, .. } => *weight,
            Atom::Gap(height) => *height,
        }
    }
}

/// Lay out a region from `top` downward with no pagination. Returns the
/// operations and the height consumed. Used for the header and footer.
fn layout_region(
    region: &Region,
    geometry: &PageGeometry,
    top: f32,
    pages: Option<(usize, usize)>,
) -> Result<(Vec<Operation>, f32), ExportError> {
    let mut ops = Vec::new();
    let mut cursor = top;
    for block in &region.blocks {
        for atom in block_atoms(block, geometry, pages) {
            emit(&mut ops, &atom, &mut cursor, geometry)?;
        }
    }
    Ok((ops, top - cursor))
}

/// Flow the content region into one operation list per output page.
/// A block that does not fit moves to the next page; gaps never lead a page.
fn flow_content(
    region: &Region,
    geometry: &PageGeometry,
    header_height: f32,
) -> Result<Vec<Vec<Operation>>, ExportError> {
    let top = geometry.height - geometry.margin - header_height;
    let floor = geometry.margin + FOOTER_CLEARANCE;

    let mut pages = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut cursor = top;

    for block in &region.blocks {
        for atom in block_atoms(block, geometry, None) {
            if matches!(atom, Atom::Gap(_)) && cursor >= top {
                continue;
            }
            if cursor - atom.height() < floor && !ops.is_empty() {
                pages.push(std::mem::take(&mut ops));
                cursor = top;
                if matches!(atom, Atom::Gap(_)) {
                    continue;
                }
            }
            emit(&mut ops, &atom, &mut cursor, geometry)?;
        }
    }

    pages.push(ops);
    Ok(pages)
}

fn block_atoms(block: &Block, geometry: &PageGeometry, pages: Option<(usize, usize)>) -> Vec<Atom> {
    match block {
        Block::Title { text, style } => text_atoms(text, style, geometry),
        Block::Paragraph { spans, style } => {
            text_atoms(&flatten_spans(spans, pages), style, geometry)
        }
        Block::KeyValueTable {
            rows,
            key_style,
            value_style,
            spacing_after,
        } => {
            let value_offset = (geometry.width - 2.0 * geometry.margin) / 2.0;
            let size = key_style.size.max(value_style.size);
            let mut atoms: Vec<Atom> = rows
                .iter()
                .map(|row| Atom::Row {
                    cells: vec![
                        (TABLE_CELL_PADDING, piece(&row.key, key_style)),
                        (value_offset + TABLE_CELL_PADDING, piece(&row.value, value_style)),
                    ],
                    size,
                    height: size + 2.0 * TABLE_CELL_PADDING,
                })
                .collect();
            push_gap(&mut atoms, *spacing_after);
            atoms
        }
        Block::Divider {
            weight,
            color,
            spacing_before,
            spacing_after,
        } => {
            let mut atoms = Vec::new();
            push_gap(&mut atoms, *spacing_before);
            atoms.push(Atom::Rule {
                weight: *weight,
                color: *color,
            });
            push_gap(&mut atoms, *spacing_after);
            atoms
        }
    }
}

fn text_atoms(text: &str, style: &TextStyle, geometry: &PageGeometry) -> Vec<Atom> {
    let max_width = geometry.width - 2.0 * geometry.margin;
    let mut atoms: Vec<Atom> = wrap(text, style.size, max_width)
        .into_iter()
        .map(|line| Atom::Line {
            piece: TextPiece {
                text: line,
                font: font_for(style),
                size: style.size,
                color: style.color,
            },
            align: style.align,
            height: style.size * LINE_SPACING,
        })
        .collect();
    push_gap(&mut atoms, style.spacing_after);
    atoms
}

fn piece(text: &str, style: &TextStyle) -> TextPiece {
    TextPiece {
        text: text.to_string(),
        font: font_for(style),
        size: style.size,
        color: style.color,
    }
}

fn push_gap(atoms: &mut Vec<Atom>, gap: f32) {
    if gap > 0.0 {
        atoms.push(Atom::Gap(gap));
    }
}

/// Resolve paragraph spans into literal text. Page-number placeholders take
/// their values from `pages` when the footer is stamped; elsewhere they
/// resolve to empty text.
fn flatten_spans(spans: &[Inline], pages: Option<(usize, usize)>) -> String {
    let mut text = String::new();
    for span in spans {
        match span {
            Inline::Text(literal) => text.push_str(literal),
            Inline::CurrentPage => {
                if let Some((current, _)) = pages {
                    text.push_str(&current.to_string());
                }
            }
            Inline::TotalPages => {
                if let Some((_, total)) = pages {
                    text.push_str(&total.to_string());
                }
            }
        }
    }
    text
}

/// Greedy word wrap against the estimated line capacity.
fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (size * GLYPH_WIDTH_RATIO)) as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO
}

fn emit(
    ops: &mut Vec<Operation>,
    atom: &Atom,
    cursor: &mut f32,
    geometry: &PageGeometry,
) -> Result<(), ExportError> {
    match atom {
        Atom::Line {
            piece,
            align,
            height,
        } => {
            let baseline = *cursor - piece.size;
            let x = match align {
                Align::Left => geometry.margin,
                Align::Center => {
                    ((geometry.width - text_width(&piece.text, piece.size)) / 2.0)
                        .max(geometry.margin)
                }
            };
            push_text(ops, piece, x, baseline)?;
            *cursor -= height;
        }
        Atom::Row {
            cells,
            size,
            height,
        } => {
            let baseline = *cursor - TABLE_CELL_PADDING - size;
            for (offset, piece) in cells {
                push_text(ops, piece, geometry.margin + offset, baseline)?;
            }
            *cursor -= height;
        }
        Atom::Rule { weight, color } => {
            let y = *cursor - weight / 2.0;
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new("w", vec![(*weight).into()]));
            ops.push(Operation::new(
                "RG",
                vec![color.r.into(), color.g.into(), color.b.into()],
            ));
            ops.push(Operation::new("m", vec![geometry.margin.into(), y.into()]));
            ops.push(Operation::new(
                "l",
                vec![(geometry.width - geometry.margin).into(), y.into()],
            ));
            ops.push(Operation::new("S", vec![]));
            ops.push(Operation::new("Q", vec![]));
            *cursor -= weight;
        }
        Atom::Gap(height) => *cursor -= height,
    }
    Ok(())
}

fn push_text(
    ops: &mut Vec<Operation>,
    piece: &TextPiece,
    x: f32,
    baseline: f32,
) -> Result<(), ExportError> {
    let encoded = encode_text(&piece.text)?;
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![piece.font.into(), piece.size.into()],
    ));
    ops.push(Operation::new(
        "rg",
        vec![
            piece.color.r.into(),
            piece.color.g.into(),
            piece.color.b.into(),
        ],
    ));
    ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encoded, StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
    Ok(())
}

/// Map text to the Latin-1 subset of WinAnsi. Anything outside it cannot be
/// drawn with the base fonts, and the render fails rather than substituting
/// glyphs.
fn encode_text(text: &str) -> Result<Vec<u8>, ExportError> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => Ok(code as u8),
            _ => Err(ExportError::Encoding { character: c }),
        })
        .collect()
}
