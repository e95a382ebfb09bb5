//! "Last updated" dates printed at the top of citation PDFs.
//!
//! Two rule sets exist. The phrase rules look for the site's own banners
//! ("As modified upto the 28th January, 2019", "Text as on [7 June 2024]")
//! line by line. The legacy block rules only run when the opening lines
//! mention a section, and then accept any date-looking token.

use crate::sources::common::capitalize_first;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::LazyLock;

pub const MAX_EXAMINED_LINES: usize = 10;

static MODIFIED_UPTO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:as modified up\s*to|as modified upto)\s*\(?\s*the\s*(\d{1,2})\s*(?:st|nd|rd|th)?\s*(?:of\s*)?([A-Za-z]+),?\s*(\d{4})",
    )
    .unwrap()
});
static TEXT_AS_ON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)text as on ").unwrap());
static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\s+(\d{4})").unwrap()
});
static LEGACY_DATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b",
        r"(?i)\b(\d{4}[/-]\d{1,2}[/-]\d{1,2})\b",
        r"(?i)\b(\d{1,2} [A-Za-z]+ \d{4})\b",
        r"(?i)Last updated[:\s]*([\w\s,/-]+\d{4})",
        r"(?i)Updated on[:\s]*([\w\s,/-]+\d{4})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Banner phrases only.
    #[default]
    Phrase,
    /// Banner phrases first, then the legacy block rules when nothing matched.
    PhraseThenLegacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateExtraction {
    pub date: Option<String>,
    /// The lines that were examined, for diagnostics when no date was found.
    pub examined_lines: Vec<String>,
}

/// The first `limit` non-blank lines of extracted PDF text.
pub fn first_lines(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .take(limit)
        .map(ToString::to_string)
        .collect()
}

pub fn extract_last_updated_date(lines: &[String], policy: DatePolicy) -> Option<String> {
    let lines = &lines[..lines.len().min(MAX_EXAMINED_LINES)];
    let phrase = extract_by_phrase(lines);
    match policy {
        DatePolicy::Phrase => phrase,
        DatePolicy::PhraseThenLegacy => phrase.or_else(|| extract_by_legacy_block(lines)),
    }
}

pub fn extract_by_phrase(lines: &[String]) -> Option<String> {
    for line in lines {
        let lowered = line
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !(lowered.contains("as modified upto") || lowered.contains("as modified up to")) {
            continue;
        }
        if let Some(caps) = MODIFIED_UPTO_RE.captures(&lowered) {
            return Some(normalize_date(&caps[1], &caps[2], &caps[3]));
        }
    }

    for line in lines {
        let Some(found) = TEXT_AS_ON_RE.find(line) else {
            continue;
        };
        let remainder = line[found.end()..]
            .trim()
            .trim_matches(|c| c == '[' || c == ']')
            .trim();
        if remainder.is_empty() {
            continue;
        }
        if let Some(caps) = DAY_MONTH_YEAR_RE.captures(remainder) {
            return Some(normalize_date(&caps[1], &caps[2], &caps[3]));
        }
        // Not a recognizable date; hand back whatever the banner says.
        return Some(remainder.to_string());
    }

    None
}

pub fn extract_by_legacy_block(lines: &[String]) -> Option<String> {
    if !lines
        .iter()
        .any(|line| line.to_lowercase().contains("section"))
    {
        return None;
    }
    let block = lines.join("\n");
    LEGACY_DATE_RES.iter().find_map(|pattern| {
        pattern
            .captures(&block)
            .map(|caps| caps[1].trim().to_string())
    })
}

/// `"<day> <Month> <year>"`, day without leading zeros.
fn normalize_date(day: &str, month: &str, year: &str) -> String {
    let day = day
        .parse::<u32>()
        .map(|value| value.to_string())
        .unwrap_or_else(|_| day.to_string());
    let month = capitalize_first(&month.to_lowercase());
    format!("{day} {month} {year}")
}

/// Reads the opening lines of a PDF. Any failure, including a panic inside
/// the PDF decoder, is reported as an error string.
pub fn read_pdf_lines(path: &Path, limit: usize) -> Result<Vec<String>, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match result {
        Ok(Ok(text)) => Ok(first_lines(&text, limit)),
        Ok(Err(e)) => Err(format!("Failed to extract text from {}: {e}", path.display())),
        Err(_) => Err(format!("PDF decoder panicked on {}", path.display())),
    }
}

/// `None` when the PDF cannot be read at all; otherwise the date (if any)
/// and the lines that were examined.
pub fn extract_date_from_pdf(path: &Path, policy: DatePolicy) -> Option<DateExtraction> {
    let lines = match read_pdf_lines(path, MAX_EXAMINED_LINES) {
        Ok(lines) => lines,
        Err(err) => {
            tracing::warn!("[Extract] Error reading PDF: {}", err);
            return None;
        }
    };
    Some(DateExtraction {
        date: extract_last_updated_date(&lines, policy),
        examined_lines: lines,
    })
}
