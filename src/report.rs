//! Markdown overview of a crawled collection, newest acts first.

use crate::runtime::cache::ArtifactCache;
use crate::sources::indiacode::listing::web_number_from_view_url;
use crate::types::{ActDetails, ActListEntry, LastUpdatedDate};
use std::path::Path;

const AWAITING_PROCESSING: &str = "A/P";

pub fn render_collection_report(website_dir: &Path, collection: &str) -> Result<String, String> {
    let cache = ArtifactCache::new(website_dir);
    let infos_path = cache.act_infos_path(collection);
    let acts = cache
        .load_json::<Vec<ActListEntry>>(&infos_path)?
        .ok_or_else(|| format!("Could not find {}", infos_path.display()))?;

    let mut lines = vec![
        format!("# {collection}\n"),
        "| Enactment Date | Act Number | Short Title | # Sections | Last Updated Date | Citation PDFs | Other PDFs |".to_string(),
        "|---|---|---|---|---|---|---|".to_string(),
    ];
    for act in acts.iter().rev() {
        lines.push(render_row(&cache, collection, act));
    }
    lines.push(format!("\n{AWAITING_PROCESSING} is 'Awaiting Processing'"));
    Ok(lines.join("\n"))
}

fn render_row(cache: &ArtifactCache, collection: &str, act: &ActListEntry) -> String {
    let mut num_sections = AWAITING_PROCESSING.to_string();
    let mut last_updated_date = String::new();
    let mut citation_link = String::new();
    let mut other_pdfs = 0;

    let Some(web_number) = web_number_from_view_url(&act.view) else {
        tracing::warn!("[Report] No usable web number in {}", act.view);
        return format_row(act, &num_sections, &last_updated_date, &citation_link, other_pdfs);
    };

    match cache.load_json::<ActDetails>(&cache.act_json_path(collection, &web_number)) {
        Ok(Some(details)) => {
            if !details.sections.is_empty() {
                num_sections = details.sections.len().to_string();
            }
            if let Some(url) = details.citation_pdf_urls.first() {
                citation_link = format!("[1]({url})");
            }
            other_pdfs = details.pdf_urls.len();

            let date_path = cache.last_updated_date_path(collection, &web_number);
            if let Ok(Some(date)) = cache.load_json::<LastUpdatedDate>(&date_path) {
                last_updated_date = date.last_updated_date;
            }
        }
        Ok(None) => {}
        Err(err) => tracing::warn!("[Report] {}: {}", web_number, err),
    }

    format_row(act, &num_sections, &last_updated_date, &citation_link, other_pdfs)
}

fn format_row(
    act: &ActListEntry,
    num_sections: &str,
    last_updated_date: &str,
    citation_link: &str,
    other_pdfs: usize,
) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} | {} |",
        act.enactment_date,
        act.act_number,
        act.short_title,
        num_sections,
        last_updated_date,
        citation_link,
        other_pdfs
    )
}

pub fn write_report(website_dir: &Path, collection: &str, output: &Path) -> Result<(), String> {
    let content = render_collection_report(website_dir, collection)?;
    std::fs::write(output, content)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    tracing::info!("[Report] {} generated", output.display());
    Ok(())
}
