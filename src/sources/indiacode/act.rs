use crate::error::ExtractError;
use crate::html_tree::HtmlDocument;
use crate::sources::indiacode::pdf_links::classify_pdf_links;
use crate::sources::indiacode::structure::extract_act_structure;
use crate::types::ActDetails;

/// Builds the structured record for one act page. Always re-derives from the
/// document; whether a cached record should be used instead is the caller's
/// decision.
pub fn build_act_details(
    html: &str,
    act_url: &str,
    web_number: &str,
    site_origin: &str,
) -> Result<ActDetails, ExtractError> {
    let document = HtmlDocument::parse(html)?;
    let structure = extract_act_structure(&document, site_origin);
    let links = classify_pdf_links(&document, site_origin)?;

    tracing::debug!(
        "[Extract] {}: {} chapters, {} sections, {} citation PDFs, {} other PDFs",
        web_number,
        structure.chapters.len(),
        structure.sections.len(),
        links.citation_pdf_urls.len(),
        links.pdf_urls.len()
    );

    Ok(ActDetails {
        url: act_url.to_string(),
        web_number: web_number.to_string(),
        web_act_id: structure.web_act_id,
        chapters: structure.chapters,
        sections: structure.sections,
        pdf_urls: links.pdf_urls,
        citation_pdf_urls: links.citation_pdf_urls,
    })
}

pub fn act_details_to_json(details: &ActDetails) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(details)?)
}
