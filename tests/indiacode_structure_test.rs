mod common;

use common::{load_fixture, ORIGIN};
use indiacode_ingest::html_tree::HtmlDocument;
use indiacode_ingest::sources::indiacode::structure::{
    extract_act_structure, extract_chapters, extract_sections,
};
use std::collections::HashSet;

#[test]
fn test_grouping_chapter_with_sub_chapters() {
    let html = load_fixture("indiacode/act_grouped.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let chapters = extract_chapters(&doc);

    assert_eq!(chapters.len(), 1);
    let chapter = &chapters[0];
    assert_eq!(chapter.number, "PART I");
    assert_eq!(chapter.title.as_deref(), Some("PRELIMINARY"));
    assert_eq!(chapter.chapter_id, None);
    assert_eq!(
        chapter.sub_chapters,
        vec![
            (
                "AC_CEN_3_20_00005_190816_1517807324077_p1".to_string(),
                "Short title, extent and commencement".to_string()
            ),
            (
                "AC_CEN_3_20_00005_190816_1517807324077_p2".to_string(),
                "Definitions".to_string()
            ),
        ]
    );
    assert!(chapter.sections.is_empty());
}

#[test]
fn test_leaf_chapters_and_malformed_entries() {
    let html = load_fixture("indiacode/act_leaf_chapters.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let chapters = extract_chapters(&doc);

    // The blank label and the chapter without a nested list are skipped.
    let numbers = chapters.iter().map(|c| c.number.as_str()).collect::<Vec<_>>();
    assert_eq!(numbers, vec!["CHAPTER I", "CHAPTER IIA"]);

    assert_eq!(chapters[0].title.as_deref(), Some("PRELIMINARY"));
    assert_eq!(chapters[0].chapter_id.as_deref(), Some("chapter1"));
    assert!(chapters[0].sub_chapters.is_empty());

    assert_eq!(chapters[1].title.as_deref(), Some("BOARDS & INSPECTORS"));
    assert_eq!(chapters[1].chapter_id.as_deref(), Some("chapter2a"));
}

#[test]
fn test_sections_with_notification_flag() {
    let html = load_fixture("indiacode/act_grouped.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let (sections, web_act_id) = extract_sections(&doc, ORIGIN);

    assert_eq!(web_act_id, "AC_CEN_3_20_00005_190816_1517807324077");
    assert_eq!(sections.len(), 3);

    assert_eq!(sections[0].web_number, "1001");
    assert_eq!(sections[0].number, "1");
    assert_eq!(sections[0].title, "Short title, extent and commencement.");
    assert_eq!(
        sections[0].url,
        "https://www.indiacode.nic.in/show-data?actid=AC_CEN_3_20_00005_190816_1517807324077&sectionId=1001&sectionno=1"
    );
    assert!(!sections[0].has_notification);

    assert_eq!(sections[1].number, "2");
    assert_eq!(sections[1].title, "Definitions.");
    assert!(sections[1].has_notification);

    // Absolute hrefs are kept as they are.
    assert_eq!(sections[2].number, "2A");
    assert_eq!(
        sections[2].url,
        "https://www.indiacode.nic.in/show-data?actid=AC_CEN_3_20_00005_190816_1517807324077&sectionId=1003&sectionno=2A"
    );
}

#[test]
fn test_sections_skip_malformed_and_duplicate_anchors() {
    let html = load_fixture("indiacode/act_leaf_chapters.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let (sections, web_act_id) = extract_sections(&doc, ORIGIN);

    assert_eq!(web_act_id, "AC_CEN_9_45_00001");
    let web_numbers = sections
        .iter()
        .map(|s| s.web_number.as_str())
        .collect::<Vec<_>>();
    assert_eq!(web_numbers, vec!["7", "9"]);
    assert_eq!(sections[0].title, "Short title.");

    let unique = web_numbers.iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), web_numbers.len());
}

#[test]
fn test_missing_regions_give_empty_collections() {
    let html = load_fixture("indiacode/act_no_sections.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let structure = extract_act_structure(&doc, ORIGIN);

    assert!(structure.chapters.is_empty());
    assert!(structure.sections.is_empty());
    assert_eq!(structure.web_act_id, "");
}

#[test]
fn test_end_to_end_listing_page() {
    let html = load_fixture("indiacode/act_grouped.html");
    let doc = HtmlDocument::parse(&html).unwrap();
    let structure = extract_act_structure(&doc, ORIGIN);

    assert_eq!(structure.chapters.len(), 1);
    assert_eq!(structure.chapters[0].sub_chapters.len(), 2);
    assert_eq!(structure.sections.len(), 3);
    assert_eq!(
        structure
            .sections
            .iter()
            .filter(|s| s.has_notification)
            .count(),
        1
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let html = load_fixture("indiacode/act_grouped.html");
    let first = extract_act_structure(&HtmlDocument::parse(&html).unwrap(), ORIGIN);
    let second = extract_act_structure(&HtmlDocument::parse(&html).unwrap(), ORIGIN);
    assert_eq!(first, second);
}
