use crate::html_tree::{Element, HtmlDocument};
use crate::sources::common::{is_safe_path_segment, rebase_url};
use crate::types::{ChapterInfo, SectionInfo};
use std::collections::HashSet;

const TOC_CONTAINER_CLASS: &str = "col-sm-4";
const CHAPTER_HEADING_CLASS: &str = "headingtwo";
const SUB_CHAPTER_HEADING_CLASS: &str = "headingthree";
const SECTIONS_TABLE_ID: &str = "myTableActSection";
const SECTION_LINK_CLASS: &str = "title";
const NOTIFICATION_CLASS: &str = "label-default";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActStructure {
    pub chapters: Vec<ChapterInfo>,
    pub sections: Vec<SectionInfo>,
    pub web_act_id: String,
}

pub fn extract_act_structure(document: &HtmlDocument<'_>, site_origin: &str) -> ActStructure {
    let chapters = extract_chapters(document);
    let (sections, web_act_id) = extract_sections(document, site_origin);
    ActStructure {
        chapters,
        sections,
        web_act_id,
    }
}

/// Table of contents in page order. A page without the TOC container has no
/// chapters.
pub fn extract_chapters(document: &HtmlDocument<'_>) -> Vec<ChapterInfo> {
    let Some(container) = document.find_first(|el| el.is_with_class("div", TOC_CONTAINER_CLASS))
    else {
        return Vec::new();
    };

    let mut chapters = Vec::new();
    for item in container.children_matching(|el| el.is("li")) {
        match parse_chapter_item(&item) {
            Ok(chapter) => {
                tracing::debug!("[Extract] Chapter {}", chapter.number);
                chapters.push(chapter);
            }
            Err(reason) => tracing::warn!("[Extract] Skipping chapter entry: {}", reason),
        }
    }
    chapters
}

fn parse_chapter_item(item: &Element<'_, '_>) -> Result<ChapterInfo, String> {
    let number = item
        .first_child_matching(|el| el.is("b"))
        .map(|label| label.text())
        .filter(|label| !label.is_empty())
        .ok_or_else(|| "chapter number not found".to_string())?;

    let inner = item
        .first_child_matching(|el| el.is("ul"))
        .and_then(|list| list.first_child_matching(|el| el.is("li")))
        .ok_or_else(|| format!("chapter {number} has no nested list item"))?;

    if let Some(heading) =
        inner.first_child_matching(|el| el.is_with_class("a", CHAPTER_HEADING_CLASS))
    {
        return Ok(ChapterInfo {
            title: non_empty(heading.text()),
            chapter_id: heading.id(),
            number,
            sub_chapters: Vec::new(),
            sections: Vec::new(),
        });
    }

    let mut sub_chapters = Vec::new();
    for list in inner.children_matching(|el| el.is("ul")) {
        for entry in list.children_matching(|el| el.is("li")) {
            for link in
                entry.children_matching(|el| el.is_with_class("a", SUB_CHAPTER_HEADING_CLASS))
            {
                match link.id() {
                    Some(anchor_id) => sub_chapters.push((anchor_id, link.text())),
                    None => tracing::warn!(
                        "[Extract] Chapter {}: sub-chapter link without id: {}",
                        number,
                        link.text()
                    ),
                }
            }
        }
    }

    Ok(ChapterInfo {
        title: inner.own_text(),
        chapter_id: None,
        number,
        sub_chapters,
        sections: Vec::new(),
    })
}

/// Sections in statutory order plus the act id recovered from their anchors.
/// The act id of the last anchor wins; a page without the sections table
/// yields no sections and an empty act id.
pub fn extract_sections(document: &HtmlDocument<'_>, site_origin: &str) -> (Vec<SectionInfo>, String) {
    let Some(table) = document.find_first(|el| {
        el.is("table") && el.id().as_deref() == Some(SECTIONS_TABLE_ID)
    }) else {
        return (Vec::new(), String::new());
    };

    let mut sections = Vec::new();
    let mut seen = HashSet::new();
    let mut web_act_id = String::new();

    for anchor in table.descendants_matching(|el| el.is_with_class("a", SECTION_LINK_CLASS)) {
        let (act_id, section) = match parse_section_anchor(&anchor, site_origin) {
            Ok(parsed) => parsed,
            Err(reason) => {
                tracing::warn!("[Extract] Skipping section entry: {}", reason);
                continue;
            }
        };
        web_act_id = act_id;

        if !seen.insert(section.web_number.clone()) {
            tracing::warn!(
                "[Extract] Skipping duplicate section web number {}",
                section.web_number
            );
            continue;
        }
        sections.push(section);
    }

    (sections, web_act_id)
}

fn parse_section_anchor(
    anchor: &Element<'_, '_>,
    site_origin: &str,
) -> Result<(String, SectionInfo), String> {
    let anchor_id = anchor
        .id()
        .ok_or_else(|| format!("section link without id: {}", anchor.text()))?;
    let (act_id, web_number) = split_section_anchor_id(&anchor_id)
        .ok_or_else(|| format!("malformed section anchor id: {anchor_id}"))?;

    let marker = anchor
        .first_child_matching(|el| el.is("span"))
        .ok_or_else(|| format!("section {web_number} has no number marker"))?;

    let href = anchor.attribute("href").unwrap_or_default();
    let section = SectionInfo {
        web_number: web_number.to_string(),
        number: marker.text(),
        title: anchor.text_after(&marker),
        url: rebase_url(&href, site_origin),
        has_notification: marker.has_class(NOTIFICATION_CLASS),
    };
    Ok((act_id.to_string(), section))
}

/// Splits `"<web_act_id>#<web_number>"` on the first `#`. The web number names
/// files on disk, so it must be a single safe path segment.
pub fn split_section_anchor_id(anchor_id: &str) -> Option<(&str, &str)> {
    let (act_id, web_number) = anchor_id.split_once('#')?;
    let web_number = web_number.trim();
    if !is_safe_path_segment(web_number) {
        return None;
    }
    Some((act_id.trim(), web_number))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
