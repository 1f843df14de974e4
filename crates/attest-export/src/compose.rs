//! Builds the certificate layout tree from a validated request.

use jiff::civil::Date;

use attest_core::models::certificate::CertificateRequest;

use crate::layout::{Block, Inline, KeyValueRow, Page, Region, RegionKind};
use crate::styles::{Align, TextStyle, GREY_DARK, GREY_MEDIUM, HEADING_BLUE};

const TITLE: &str = "CERTIFICATE OF INSURANCE";

const DISCLAIMER: &str = "This certificate is issued as a matter of information only and \
confers no rights upon the certificate holder. This certificate does not affirmatively or \
negatively amend, extend or alter the coverage afforded by the policies below.";

/// Every date on the certificate renders as `MM/DD/YYYY`.
fn mdy(date: Date) -> String {
    date.strftime("%m/%d/%Y").to_string()
}

/// Build the full page tree for one certificate.
///
/// `generated_on` is the caller-supplied generation date; composition never
/// reads the clock, so identical inputs always produce identical trees.
pub fn certificate_page(request: &CertificateRequest, generated_on: Date) -> Page {
    Page::new(header(generated_on), content(request), footer())
}

fn title_style() -> TextStyle {
    TextStyle {
        bold: true,
        color: HEADING_BLUE,
        spacing_after: 5.0,
        ..TextStyle::body(18.0)
    }
}

fn meta_style() -> TextStyle {
    TextStyle {
        color: GREY_DARK,
        spacing_after: 10.0,
        ..TextStyle::body(9.0)
    }
}

fn section_title_style() -> TextStyle {
    TextStyle {
        bold: true,
        color: HEADING_BLUE,
        spacing_after: 5.0,
        ..TextStyle::body(12.0)
    }
}

fn party_name_style() -> TextStyle {
    TextStyle {
        bold: true,
        ..TextStyle::body(11.0)
    }
}

fn party_line_style() -> TextStyle {
    TextStyle::body(9.0)
}

/// Last line of a section: carries the gap before the next section title.
fn party_end_style() -> TextStyle {
    TextStyle {
        spacing_after: 25.0,
        ..party_line_style()
    }
}

fn disclaimer_style() -> TextStyle {
    TextStyle {
        italic: true,
        color: GREY_MEDIUM,
        ..TextStyle::body(8.0)
    }
}

fn header(generated_on: Date) -> Region {
    Region {
        kind: RegionKind::Header,
        blocks: vec![
            Block::Title {
                text: TITLE.to_string(),
                style: title_style(),
            },
            Block::paragraph(format!("Issue Date: {}", mdy(generated_on)), meta_style()),
            Block::Divider {
                weight: 2.0,
                color: HEADING_BLUE,
                spacing_before: 0.0,
                spacing_after: 10.0,
            },
        ],
    }
}

fn section_title(text: &str) -> [Block; 2] {
    [
        Block::Title {
            text: text.to_string(),
            style: section_title_style(),
        },
        Block::Divider {
            weight: 1.0,
            color: HEADING_BLUE,
            spacing_before: 0.0,
            spacing_after: 10.0,
        },
    ]
}

fn content(request: &CertificateRequest) -> Region {
    let mut blocks = Vec::new();

    blocks.extend(section_title("POLICY INFORMATION"));
    blocks.push(Block::KeyValueTable {
        rows: vec![
            KeyValueRow {
                key: "Policy Number:".to_string(),
                value: request.policy_number.clone(),
            },
            KeyValueRow {
                key: "Certificate Number:".to_string(),
                value: request.certificate_number.clone(),
            },
            KeyValueRow {
                key: "Issue Date:".to_string(),
                value: mdy(request.issue_date),
            },
            KeyValueRow {
                key: "Effective Date:".to_string(),
                value: mdy(request.policy_effective_date),
            },
            KeyValueRow {
                key: "Expiration Date:".to_string(),
                value: mdy(request.policy_expiration_date),
            },
        ],
        key_style: TextStyle {
            bold: true,
            ..TextStyle::body(9.0)
        },
        value_style: TextStyle::body(9.0),
        spacing_after: 25.0,
    });

    blocks.extend(section_title("CARRIER INFORMATION"));
    blocks.push(Block::paragraph(&request.carrier_name, party_name_style()));
    blocks.push(Block::paragraph(&request.carrier_address, party_line_style()));
    blocks.push(Block::paragraph(
        format!("Email: {}", request.carrier_email),
        party_end_style(),
    ));

    blocks.extend(section_title("PRODUCER INFORMATION"));
    blocks.push(Block::paragraph(&request.producer_name, party_name_style()));
    blocks.push(Block::paragraph(&request.producer_address, party_line_style()));
    blocks.push(Block::paragraph(
        format!("Email: {}", request.producer_email),
        party_end_style(),
    ));

    blocks.extend(section_title("INSURED INFORMATION"));
    blocks.push(Block::paragraph(
        &request.insured_company_name,
        party_name_style(),
    ));
    blocks.push(Block::paragraph(
        &request.insured_company_address,
        party_line_style(),
    ));
    blocks.push(Block::paragraph(
        format!("Phone: {}", request.insured_company_phone),
        party_end_style(),
    ));

    blocks.push(Block::Divider {
        weight: 1.0,
        color: GREY_MEDIUM,
        spacing_before: 5.0,
        spacing_after: 10.0,
    });
    blocks.push(Block::paragraph(DISCLAIMER, disclaimer_style()));

    Region {
        kind: RegionKind::Content,
        blocks,
    }
}

fn footer() -> Region {
    Region {
        kind: RegionKind::Footer,
        blocks: vec![Block::Paragraph {
            spans: vec![
                Inline::Text("Page ".to_string()),
                Inline::CurrentPage,
                Inline::Text(" of ".to_string()),
                Inline::TotalPages,
            ],
            style: TextStyle {
                align: Align::Center,
                ..TextStyle::body(10.0)
            },
        }],
    }
}
