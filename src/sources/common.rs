use crate::html_tree::decode_entities;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn normalize_text(input: &str) -> String {
    let decoded = decode_entities(input).replace('\u{00A0}', " ");
    WHITESPACE_RE
        .replace_all(decoded.trim(), " ")
        .trim()
        .to_string()
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether `value` can be used as one directory or file name: non-empty, no
/// path separators, no `..`.
pub fn is_safe_path_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '\\']) && !value.contains("..")
}

/// Absolute `http(s)` hrefs are returned unchanged; anything else is appended
/// to `origin`.
pub fn rebase_url(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        return href.to_string();
    }
    match (origin.ends_with('/'), href.starts_with('/')) {
        (true, true) => format!("{}{}", origin.trim_end_matches('/'), href),
        (false, false) if !href.is_empty() => format!("{origin}/{href}"),
        _ => format!("{origin}{href}"),
    }
}

/// Path component of a URL, ignoring scheme, host, query and fragment.
pub fn url_path(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url.trim()) {
        return parsed.path().to_string();
    }
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    match without_query.split_once("://") {
        Some((_, rest)) => rest
            .find('/')
            .map(|index| rest[index..].to_string())
            .unwrap_or_else(|| "/".to_string()),
        None => without_query.to_string(),
    }
}
