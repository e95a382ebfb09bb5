use serde::{Deserialize, Serialize};

/// One entry in an act's table of contents.
///
/// A leaf chapter carries a `chapter_id`; a grouping chapter carries
/// `sub_chapters` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub number: String,
    pub title: Option<String>,
    pub chapter_id: Option<String>,
    /// `(anchor_id, title)` pairs, serialized as two-element arrays.
    pub sub_chapters: Vec<(String, String)>,
    /// Always empty. Kept so persisted records keep their shape.
    #[serde(default)]
    pub sections: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub web_number: String,
    pub number: String,
    pub title: String,
    pub url: String,
    pub has_notification: bool,
}

/// The structured record persisted as `<web_number>.json` for every act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActDetails {
    pub url: String,
    pub web_number: String,
    pub web_act_id: String,
    pub chapters: Vec<ChapterInfo>,
    pub sections: Vec<SectionInfo>,
    pub pdf_urls: Vec<String>,
    #[serde(default)]
    pub citation_pdf_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdatedDate {
    pub last_updated_date: String,
}

/// One row of a catalogue browse table, as stored in `act_infos.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActListEntry {
    #[serde(rename = "Enactment Date")]
    pub enactment_date: String,
    #[serde(rename = "Act Number")]
    pub act_number: String,
    #[serde(rename = "Short Title")]
    pub short_title: String,
    #[serde(rename = "View")]
    pub view: String,
}

/// A catalogue collection (Central Acts, or one state's acts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    pub href: String,
}
