use crate::runtime::logging::{log_event, LogLevel};
use crate::runtime::types::{ActFailure, ActStatus, CrawlContext, CrawlSummary};
use crate::sources::common::rebase_url;
use crate::sources::indiacode::act::build_act_details;
use crate::sources::indiacode::listing::web_number_from_view_url;
use crate::sources::indiacode::pdf_date::{extract_date_from_pdf, DateExtraction, DatePolicy};
use crate::types::{ActDetails, ActListEntry, LastUpdatedDate, SectionInfo};
use std::path::PathBuf;

/// Crawls every act of one collection in order. A failing act is recorded in
/// the summary and the loop moves on.
pub async fn crawl_acts(context: &CrawlContext<'_>, acts: &[ActListEntry]) -> CrawlSummary {
    let mut summary = CrawlSummary {
        started_at: chrono::Utc::now().to_rfc3339(),
        total: acts.len(),
        ..CrawlSummary::default()
    };

    tracing::info!(
        "[Crawl] Starting crawl of {} acts in {}",
        acts.len(),
        context.collection
    );

    for (index, entry) in acts.iter().enumerate() {
        let Some(web_number) = web_number_from_view_url(&entry.view) else {
            let error = format!("No usable web number in {}", entry.view);
            log_event(
                LogLevel::Error,
                &error,
                Some(serde_json::json!({ "index": index, "short_title": entry.short_title })),
            );
            summary.failed += 1;
            summary.failures.push(ActFailure {
                web_number: String::new(),
                error,
            });
            continue;
        };
        tracing::info!(
            "[Crawl] [{}/{}]: ({}) {}",
            index,
            acts.len(),
            web_number,
            entry.short_title
        );

        match crawl_act(context, entry, &web_number).await {
            Ok(status) => {
                tracing::info!("[Crawl] {}: {}", web_number, status.as_str());
                summary.completed += 1;
            }
            Err(err) => {
                log_event(
                    LogLevel::Error,
                    &format!("{web_number} failed: {err}"),
                    Some(serde_json::json!({ "index": index, "short_title": entry.short_title })),
                );
                summary.failed += 1;
                summary.failures.push(ActFailure {
                    web_number,
                    error: err,
                });
            }
        }
    }

    log_event(
        LogLevel::Info,
        &format!(
            "Finished: {} completed, {} failed",
            summary.completed, summary.failed
        ),
        Some(serde_json::json!({ "started_at": summary.started_at, "total": summary.total })),
    );
    summary
}

pub async fn crawl_act(
    context: &CrawlContext<'_>,
    entry: &ActListEntry,
    web_number: &str,
) -> Result<ActStatus, String> {
    let (details, status) = load_or_extract_act(context, &entry.view, web_number).await?;

    for section in &details.sections {
        fetch_section(context, &details, section).await;
    }

    if let Some(citation_url) = details.citation_pdf_urls.first() {
        process_citation_pdf(context, &details, citation_url).await?;
    }

    for pdf_url in &details.pdf_urls {
        let pdf_url = repair_pdf_url(pdf_url);
        let path = context
            .cache
            .act_pdf_path(context.collection, web_number, &pdf_url);
        if let Err(err) = context
            .cache
            .download_if_missing(context.fetcher, &pdf_url, &path)
            .await
        {
            tracing::warn!("[Crawl] \tAct PDF {} skipped: {}", pdf_url, err);
        }
    }

    Ok(status)
}

/// A cached record is authoritative unless the context asks for a refresh.
pub async fn load_or_extract_act(
    context: &CrawlContext<'_>,
    act_url: &str,
    web_number: &str,
) -> Result<(ActDetails, ActStatus), String> {
    let json_path = context.cache.act_json_path(context.collection, web_number);
    if !context.refresh {
        if let Some(details) = context.cache.load_json::<ActDetails>(&json_path)? {
            tracing::info!("[Crawl] {}: already exists", web_number);
            return Ok((details, ActStatus::Cached));
        }
    }

    let html_path = context.cache.act_html_path(context.collection, web_number);
    let html = context
        .cache
        .read_or_fetch_text(context.fetcher, act_url, &html_path)
        .await?;

    let details = build_act_details(&html, act_url, web_number, &context.config.site_origin)
        .map_err(|e| e.to_string())?;
    context.cache.store_json(&json_path, &details)?;
    Ok((details, ActStatus::Extracted))
}

pub fn section_url(site_origin: &str, web_act_id: &str, section_web_number: &str) -> String {
    rebase_url(
        &format!(
            "/SectionPageContent?&actid={}&sectionID={}",
            urlencoding::encode(web_act_id),
            urlencoding::encode(section_web_number)
        ),
        site_origin,
    )
}

pub fn notification_url(site_origin: &str, web_act_id: &str, section_web_number: &str) -> String {
    format!(
        "{}&orgactid={}",
        section_url(site_origin, web_act_id, section_web_number),
        urlencoding::encode(web_act_id)
    )
}

/// Section and notification failures are logged; they never fail the act.
async fn fetch_section(context: &CrawlContext<'_>, details: &ActDetails, section: &SectionInfo) {
    let origin = &context.config.site_origin;
    let path = context
        .cache
        .section_path(context.collection, &details.web_number, &section.web_number);
    let url = section_url(origin, &details.web_act_id, &section.web_number);

    if let Err(err) = context
        .cache
        .read_or_fetch_text(context.fetcher, &url, &path)
        .await
    {
        tracing::warn!(
            "[Crawl] \tFailed to fetch section {}: {}",
            section.web_number,
            err
        );
        return;
    }

    if !section.has_notification {
        return;
    }

    let path = context.cache.notification_path(
        context.collection,
        &details.web_number,
        &section.web_number,
    );
    let url = notification_url(origin, &details.web_act_id, &section.web_number);
    if let Err(err) = context
        .cache
        .read_or_fetch_text(context.fetcher, &url, &path)
        .await
    {
        tracing::warn!(
            "[Crawl] \tFailed to fetch notification for section {}: {}",
            section.web_number,
            err
        );
    }
}

async fn process_citation_pdf(
    context: &CrawlContext<'_>,
    details: &ActDetails,
    citation_url: &str,
) -> Result<(), String> {
    let pdf_path =
        context
            .cache
            .citation_pdf_path(context.collection, &details.web_number, citation_url);

    if let Err(err) = context
        .cache
        .download_if_missing(context.fetcher, citation_url, &pdf_path)
        .await
    {
        tracing::warn!("[Crawl] \tCitation PDF {} skipped: {}", citation_url, err);
    }

    if details.sections.is_empty() || !pdf_path.exists() {
        return Ok(());
    }

    let Some(extraction) = read_date(pdf_path, context.config.date_policy).await else {
        return Ok(());
    };

    match extraction.date {
        Some(date) => {
            let date_path = context
                .cache
                .last_updated_date_path(context.collection, &details.web_number);
            context.cache.store_json(
                &date_path,
                &LastUpdatedDate {
                    last_updated_date: date.clone(),
                },
            )?;
            tracing::info!("[Crawl] \tExtracted last updated date: {}", date);
        }
        None => log_event(
            LogLevel::Warn,
            &format!("No last updated date found. {citation_url}"),
            Some(serde_json::json!({ "examined_lines": extraction.examined_lines })),
        ),
    }
    Ok(())
}

async fn read_date(
    pdf_path: PathBuf,
    policy: DatePolicy,
) -> Option<DateExtraction> {
    match tokio::task::spawn_blocking(move || extract_date_from_pdf(&pdf_path, policy)).await {
        Ok(extraction) => extraction,
        Err(err) => {
            tracing::warn!("[Crawl] \tDate extraction task failed: {}", err);
            None
        }
    }
}

/// Some catalogue links carry a stray space after the host.
pub fn repair_pdf_url(url: &str) -> String {
    url.replace("nic.in ", "nic.in")
}
