use crate::error::ExtractError;
use crate::html_tree::HtmlDocument;
use crate::sources::common::{rebase_url, url_path};

const CITATION_META_NAME: &str = "citation_pdf_url";
const STORAGE_PATH_MARKER: &str = "/bitstream/";
const PDF_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfLinks {
    /// Zero or one URL.
    pub citation_pdf_urls: Vec<String>,
    /// Remaining PDF links in page order, minus any that point at the
    /// citation PDF's path.
    pub pdf_urls: Vec<String>,
}

pub fn classify_pdf_links(
    document: &HtmlDocument<'_>,
    site_origin: &str,
) -> Result<PdfLinks, ExtractError> {
    let citation_pdf_urls = document
        .find_all(|el| el.is("meta") && el.attribute("name").as_deref() == Some(CITATION_META_NAME))
        .into_iter()
        .filter_map(|meta| meta.attribute("content"))
        .map(|content| content.trim().to_string())
        .collect::<Vec<_>>();

    if citation_pdf_urls.len() > 1 {
        return Err(ExtractError::IntegrityViolation {
            count: citation_pdf_urls.len(),
        });
    }

    let links = document
        .find_all(|el| el.is("a"))
        .into_iter()
        .filter_map(|anchor| anchor.attribute("href"))
        .filter(|href| href.contains(STORAGE_PATH_MARKER) && href.contains(PDF_EXTENSION))
        .map(|href| rebase_url(&href, site_origin))
        .collect::<Vec<_>>();

    let pdf_urls = exclude_citation_path(links, citation_pdf_urls.first().map(String::as_str));

    Ok(PdfLinks {
        citation_pdf_urls,
        pdf_urls,
    })
}

/// Drops every URL whose path matches the citation URL's path. The same file
/// is often linked once with and once without a query string.
pub fn exclude_citation_path(urls: Vec<String>, citation_url: Option<&str>) -> Vec<String> {
    let Some(citation_path) = citation_url.map(url_path) else {
        return urls;
    };
    urls.into_iter()
        .filter(|url| url_path(url) != citation_path)
        .collect()
}
