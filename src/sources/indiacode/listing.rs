use crate::error::ExtractError;
use crate::html_tree::HtmlDocument;
use crate::runtime::cache::ArtifactCache;
use crate::runtime::fetcher::Fetcher;
use crate::sources::common::{is_safe_path_segment, normalize_text, rebase_url};
use crate::sources::configs::CrawlConfig;
use crate::types::{ActListEntry, CollectionEntry};
use regex::Regex;
use std::sync::LazyLock;

pub const ACTS_PER_PAGE: usize = 100;

static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"of\s+([\d,]+)").unwrap());

/// Browse URL for one page of a collection, oldest enactments first.
pub fn browse_url(site_origin: &str, href_stub: &str, page: usize) -> String {
    let mut url = rebase_url(
        &format!(
            "{}/browse?type=dateissued&sort_by=1&order=ASC&rpp={ACTS_PER_PAGE}",
            href_stub.trim_end_matches('/')
        ),
        site_origin,
    );
    if page > 1 {
        url.push_str(&format!(
            "&etal=-1&null=&offset={}",
            (page - 1) * ACTS_PER_PAGE
        ));
    }
    url
}

/// Reads "Now showing items 1-100 of 858" from the browse page footer.
pub fn parse_total_acts(html: &str) -> Result<Option<usize>, ExtractError> {
    let document = HtmlDocument::parse(html)?;
    let footers = document.find_all(|el| {
        el.is_with_class("div", "panel-footer") && el.has_class("text-center")
    });
    Ok(footers.iter().find_map(|footer| {
        let text = normalize_text(&footer.text());
        let caps = TOTAL_RE.captures(&text)?;
        caps[1].replace(',', "").parse().ok()
    }))
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(ACTS_PER_PAGE)
}

/// Rows of the first table on a browse page. Rows without four cells or
/// without a View link (the header row) are skipped.
pub fn parse_act_rows(html: &str, site_origin: &str) -> Result<Vec<ActListEntry>, ExtractError> {
    let document = HtmlDocument::parse(html)?;
    let Some(table) = document.find_first(|el| el.is("table")) else {
        return Ok(Vec::new());
    };

    let rows = table
        .descendants_matching(|el| el.is("tr"))
        .into_iter()
        .filter_map(|row| {
            let cells = row.descendants_matching(|el| el.is("td"));
            if cells.len() < 4 {
                return None;
            }
            let href = cells[3]
                .descendants_matching(|el| el.is("a"))
                .into_iter()
                .find_map(|anchor| anchor.attribute("href"))?;
            Some(ActListEntry {
                enactment_date: normalize_text(&cells[0].text()),
                act_number: normalize_text(&cells[1].text()),
                short_title: normalize_text(&cells[2].text()),
                view: rebase_url(&href, site_origin),
            })
        })
        .collect();
    Ok(rows)
}

/// `.../handle/123456789/1362/15?view_type=browse` -> `15`. `None` when the
/// last segment cannot safely name a directory.
pub fn web_number_from_view_url(view: &str) -> Option<String> {
    let stripped = view.replace("?view_type=browse", "");
    let segment = stripped.trim_end_matches('/').rsplit('/').next()?;
    is_safe_path_segment(segment).then(|| segment.to_string())
}

/// Lists every act of a collection, reusing `act_infos.json` when present.
pub async fn list_collection(
    fetcher: &dyn Fetcher,
    cache: &ArtifactCache,
    config: &CrawlConfig,
    collection: &CollectionEntry,
) -> Result<Vec<ActListEntry>, String> {
    let infos_path = cache.act_infos_path(&collection.name);
    if let Some(acts) = cache.load_json::<Vec<ActListEntry>>(&infos_path)? {
        tracing::info!("[Crawl] {}: already exists", collection.name);
        return Ok(acts);
    }

    let first_url = browse_url(&config.site_origin, &collection.href, 1);
    let first_page = cache
        .read_or_fetch_text(
            fetcher,
            &first_url,
            &cache.listing_page_path(&collection.name, 1),
        )
        .await?;

    let total = parse_total_acts(&first_page)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{}: act count not found on {first_url}", collection.name))?;
    let pages = page_count(total);
    tracing::info!(
        "[Crawl] {}: {} acts over {} pages",
        collection.name,
        total,
        pages
    );

    let mut acts = parse_act_rows(&first_page, &config.site_origin).map_err(|e| e.to_string())?;
    for page in 2..=pages {
        let url = browse_url(&config.site_origin, &collection.href, page);
        let html = cache
            .read_or_fetch_text(fetcher, &url, &cache.listing_page_path(&collection.name, page))
            .await?;
        acts.extend(parse_act_rows(&html, &config.site_origin).map_err(|e| e.to_string())?);
    }

    cache.store_json(&infos_path, &acts)?;
    Ok(acts)
}
