use jiff::civil::date;

use attest_core::models::certificate::CertificateRequest;
use attest_export::compose::certificate_page;
use attest_export::layout::{Block, Inline, Page, RegionKind};

fn sample_request() -> CertificateRequest {
    CertificateRequest {
        policy_number: "POL-001".to_string(),
        certificate_number: "CERT-001".to_string(),
        policy_effective_date: date(2024, 1, 1),
        policy_expiration_date: date(2025, 1, 1),
        issue_date: date(2024, 3, 5),
        carrier_name: "Acme Insurance".to_string(),
        carrier_address: "100 Main St, Springfield, IL".to_string(),
        carrier_email: "contact@acme-insurance.example".to_string(),
        producer_name: "Jordan Reyes".to_string(),
        producer_address: "200 Oak Ave, Springfield, IL".to_string(),
        producer_email: "jordan@producers.example".to_string(),
        insured_company_name: "Widget Works LLC".to_string(),
        insured_company_address: "300 Elm Rd, Springfield, IL".to_string(),
        insured_company_phone: "555-0100".to_string(),
    }
}

fn sample_page() -> Page {
    certificate_page(&sample_request(), date(2024, 3, 5))
}

fn section_titles(page: &Page) -> Vec<String> {
    page.region(RegionKind::Content)
        .unwrap()
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Title { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn regions_are_header_content_footer_in_order() {
    let page = sample_page();
    let kinds: Vec<_> = page.regions.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RegionKind::Header, RegionKind::Content, RegionKind::Footer]
    );
}

#[test]
fn content_sections_appear_in_fixed_order() {
    let page = sample_page();
    assert_eq!(
        section_titles(&page),
        vec![
            "POLICY INFORMATION",
            "CARRIER INFORMATION",
            "PRODUCER INFORMATION",
            "INSURED INFORMATION",
        ]
    );

    // The fifth section is the disclaimer paragraph, last in the region.
    let content = page.region(RegionKind::Content).unwrap();
    match content.blocks.last().unwrap() {
        Block::Paragraph { spans, .. } => match &spans[0] {
            Inline::Text(text) => {
                assert!(text.contains("matter of information only"));
            }
            other => panic!("unexpected disclaimer span: {other:?}"),
        },
        other => panic!("expected disclaimer paragraph, got {other:?}"),
    }
}

#[test]
fn policy_table_rows_and_date_formats() {
    let page = sample_page();
    let content = page.region(RegionKind::Content).unwrap();

    let rows = content
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::KeyValueTable { rows, .. } => Some(rows),
            _ => None,
        })
        .unwrap();

    let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "Policy Number:",
            "Certificate Number:",
            "Issue Date:",
            "Effective Date:",
            "Expiration Date:",
        ]
    );

    assert_eq!(rows[0].value, "POL-001");
    assert_eq!(rows[2].value, "03/05/2024");
    assert_eq!(rows[3].value, "01/01/2024");
    assert_eq!(rows[4].value, "01/01/2025");
}

#[test]
fn header_carries_the_supplied_generation_date() {
    let page = certificate_page(&sample_request(), date(2024, 1, 15));
    let header = page.region(RegionKind::Header).unwrap();

    let has_date_line = header.blocks.iter().any(|block| match block {
        Block::Paragraph { spans, .. } => {
            matches!(&spans[0], Inline::Text(text) if text == "Issue Date: 01/15/2024")
        }
        _ => false,
    });
    assert!(has_date_line);
}

#[test]
fn footer_keeps_page_numbers_symbolic() {
    let page = sample_page();
    let footer = page.region(RegionKind::Footer).unwrap();

    match &footer.blocks[0] {
        Block::Paragraph { spans, .. } => {
            assert!(spans.contains(&Inline::CurrentPage));
            assert!(spans.contains(&Inline::TotalPages));
        }
        other => panic!("expected footer paragraph, got {other:?}"),
    }
}

#[test]
fn layout_tree_round_trips_through_serde() {
    let page = sample_page();
    let json = serde_json::to_string(&page).unwrap();
    let back: Page = serde_json::from_str(&json).unwrap();
    assert_eq!(page, back);
}
