mod common;

use common::{load_fixture, load_fixture_bytes, test_config, MockFetcher, ORIGIN};
use indiacode_ingest::runtime::cache::ArtifactCache;
use indiacode_ingest::runtime::orchestrator::{
    crawl_acts, load_or_extract_act, notification_url, repair_pdf_url, section_url,
};
use indiacode_ingest::runtime::types::{ActStatus, CrawlContext};
use indiacode_ingest::types::{ActDetails, ActListEntry, LastUpdatedDate};

const ACT_ID: &str = "AC_CEN_3_20_00005_190816_1517807324077";
const ACT_URL: &str = "https://www.indiacode.nic.in/handle/123456789/2309?view_type=browse";
const CITATION_URL: &str = "https://www.indiacode.nic.in/bitstream/123456789/2309/1/A1908-16.pdf";
const OTHER_PDF_URL: &str =
    "https://www.indiacode.nic.in/bitstream/123456789/2309/5/registration_amendment_2012.pdf";

fn entry(view: &str, title: &str) -> ActListEntry {
    ActListEntry {
        enactment_date: "18-Dec-1908".to_string(),
        act_number: "16".to_string(),
        short_title: title.to_string(),
        view: view.to_string(),
    }
}

fn registration_act_fetcher() -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher.add_fixture(ACT_URL, &load_fixture("indiacode/act_grouped.html"));
    fetcher.add_fixture(&section_url(ORIGIN, ACT_ID, "1001"), "<p>Section 1</p>");
    fetcher.add_fixture(&section_url(ORIGIN, ACT_ID, "1002"), "<p>Section 2</p>");
    fetcher.add_fixture(
        &notification_url(ORIGIN, ACT_ID, "1002"),
        "<p>Notification for section 2</p>",
    );
    // Section 1003 is missing on purpose.
    fetcher.add_bytes(CITATION_URL, b"not really a pdf");
    fetcher.add_bytes(OTHER_PDF_URL, b"%PDF-1.4 amendment");
    fetcher
}

#[test]
fn test_section_urls() {
    assert_eq!(
        section_url(ORIGIN, "AC_1", "42"),
        "https://www.indiacode.nic.in/SectionPageContent?&actid=AC_1&sectionID=42"
    );
    assert_eq!(
        notification_url(ORIGIN, "AC_1", "42"),
        "https://www.indiacode.nic.in/SectionPageContent?&actid=AC_1&sectionID=42&orgactid=AC_1"
    );
}

#[test]
fn test_repair_pdf_url() {
    assert_eq!(
        repair_pdf_url("https://www.indiacode.nic.in /bitstream/1/a.pdf"),
        "https://www.indiacode.nic.in/bitstream/1/a.pdf"
    );
}

#[tokio::test]
async fn test_crawl_writes_artifact_tree() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let cache = ArtifactCache::new(dir.path());
    let fetcher = registration_act_fetcher();
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };

    let summary = crawl_acts(&context, &[entry(ACT_URL, "The Registration Act, 1908")]).await;
    assert_eq!(summary.total, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 0);

    let act_dir = dir.path().join("Central_Acts").join("2309");
    assert!(act_dir.join("2309.html").exists());
    assert!(act_dir.join("sections").join("1001.html").exists());
    assert!(act_dir.join("sections").join("1002.html").exists());
    assert!(act_dir
        .join("sections")
        .join("1002_notification.html")
        .exists());
    assert!(!act_dir.join("sections").join("1001_notification.html").exists());
    assert!(!act_dir.join("sections").join("1003.html").exists());
    assert!(act_dir.join("citation_pdf").join("A1908-16.pdf").exists());
    assert!(act_dir
        .join("act_pdfs")
        .join("registration_amendment_2012.pdf")
        .exists());
    // The citation PDF is unreadable, so no date is recorded.
    assert!(!act_dir
        .join("citation_pdf")
        .join("last_updated_date.json")
        .exists());

    let json = std::fs::read_to_string(act_dir.join("2309.json")).unwrap();
    let details: ActDetails = serde_json::from_str(&json).unwrap();
    assert_eq!(details.web_act_id, ACT_ID);
    assert_eq!(details.sections.len(), 3);
}

#[tokio::test]
async fn test_crawl_records_citation_pdf_date() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let cache = ArtifactCache::new(dir.path());
    let mut fetcher = registration_act_fetcher();
    fetcher.add_bytes(
        CITATION_URL,
        &load_fixture_bytes("indiacode/citation_modified_upto.pdf"),
    );
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };

    let summary = crawl_acts(&context, &[entry(ACT_URL, "The Registration Act, 1908")]).await;
    assert_eq!(summary.completed, 1);

    let date_path = cache.last_updated_date_path("Central_Acts", "2309");
    let content = std::fs::read_to_string(&date_path).unwrap();
    let date: LastUpdatedDate = serde_json::from_str(&content).unwrap();
    assert_eq!(date.last_updated_date, "28 January 2019");
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!({ "last_updated_date": "28 January 2019" }));
}

#[tokio::test]
async fn test_failed_act_does_not_stop_the_crawl() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let cache = ArtifactCache::new(dir.path());
    let mut fetcher = registration_act_fetcher();
    let broken_url = "https://www.indiacode.nic.in/handle/123456789/1/?view_type=browse";
    fetcher.add_fixture(
        "https://www.indiacode.nic.in/handle/123456789/2?view_type=browse",
        &load_fixture("indiacode/act_two_citations.html"),
    );
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };

    let acts = vec![
        entry(broken_url, "Unreachable Act"),
        entry(
            "https://www.indiacode.nic.in/handle/123456789/2?view_type=browse",
            "Act With Two Citations",
        ),
        entry(ACT_URL, "The Registration Act, 1908"),
    ];
    let summary = crawl_acts(&context, &acts).await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.failures[0].web_number, "1");
    assert!(summary.failures[0].error.contains("No fixture"));
    assert_eq!(summary.failures[1].web_number, "2");
    assert!(summary.failures[1].error.contains("at most one citation"));
    assert!(dir
        .path()
        .join("Central_Acts")
        .join("2309")
        .join("2309.json")
        .exists());
}

#[tokio::test]
async fn test_traversing_view_url_is_a_failure_without_writes() {
    let dir = tempfile::tempdir().unwrap();
    let website_dir = dir.path().join("site");
    let config = test_config(&website_dir);
    let cache = ArtifactCache::new(&website_dir);
    let fetcher = registration_act_fetcher();
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };

    let acts = vec![
        entry("https://www.indiacode.nic.in/handle/123456789/..", "Escaping Act"),
        entry(ACT_URL, "The Registration Act, 1908"),
    ];
    let summary = crawl_acts(&context, &acts).await;

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].web_number, "");
    assert!(summary.failures[0].error.contains("No usable web number"));
    assert!(!fetcher
        .requested()
        .iter()
        .any(|url| url.ends_with("/..")));
    let top_level = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect::<Vec<_>>();
    assert_eq!(top_level, vec![std::ffi::OsString::from("site")]);
}

#[tokio::test]
async fn test_cached_json_short_circuits_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let cache = ArtifactCache::new(dir.path());

    let cached = ActDetails {
        url: ACT_URL.to_string(),
        web_number: "2309".to_string(),
        web_act_id: "CACHED".to_string(),
        chapters: vec![],
        sections: vec![],
        pdf_urls: vec![],
        citation_pdf_urls: vec![],
    };
    cache
        .store_json(&cache.act_json_path("Central_Acts", "2309"), &cached)
        .unwrap();

    let fetcher = registration_act_fetcher();
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };
    let (details, status) = load_or_extract_act(&context, ACT_URL, "2309").await.unwrap();
    assert_eq!(status, ActStatus::Cached);
    assert_eq!(details, cached);
    assert!(fetcher.requested().is_empty());

    let refreshing = CrawlContext {
        refresh: true,
        ..context
    };
    let (details, status) = load_or_extract_act(&refreshing, ACT_URL, "2309")
        .await
        .unwrap();
    assert_eq!(status, ActStatus::Extracted);
    assert_eq!(details.web_act_id, ACT_ID);
    assert_eq!(fetcher.requested(), vec![ACT_URL.to_string()]);
}

#[tokio::test]
async fn test_cached_html_is_not_refetched() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let cache = ArtifactCache::new(dir.path());
    let html_path = cache.act_html_path("Central_Acts", "2309");
    std::fs::create_dir_all(html_path.parent().unwrap()).unwrap();
    std::fs::write(&html_path, load_fixture("indiacode/act_grouped.html")).unwrap();

    let fetcher = MockFetcher::new();
    let context = CrawlContext {
        fetcher: &fetcher,
        cache: &cache,
        config: &config,
        collection: "Central_Acts",
        refresh: false,
    };
    let (details, status) = load_or_extract_act(&context, ACT_URL, "2309").await.unwrap();
    assert_eq!(status, ActStatus::Extracted);
    assert_eq!(details.sections.len(), 3);
    assert!(fetcher.requested().is_empty());
}
