//! Integration tests for ClipKit using wiremock

use clipkit::{
    format_note, sync_read_result, ContentFormat, ErrorKind, FirecrawlReader, JinaReader,
    Platform, ReadError, Reader, ReaderConfig, ReaderError, SmartReader, Strategy,
};
use clipkit::readers::BrowserReader;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Rendered Title</title>
  <meta property="og:title" content="OG Title">
  <meta name="description" content="A rendered page">
</head>
<body>
  <nav>Home | About</nav>
  <div class="rich_media_content">
    <p>First paragraph of the article.</p>
    <p>Second paragraph.</p>
  </div>
  <footer>Copyright</footer>
</body>
</html>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("clipkit=debug")
        .with_test_writer()
        .try_init();
}

fn long_markdown() -> String {
    format!("# Heading\n\n{}", "Plenty of readable article text. ".repeat(8))
}

fn firecrawl_success(markdown: &str) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "markdown": markdown,
            "metadata": {
                "title": "Scraped Title",
                "description": "Scraped description",
                "statusCode": 200,
                "sourceURL": "https://example.com/post"
            }
        }
    })
}

// ==================== Jina ====================

#[tokio::test]
async fn test_jina_success_with_title_line() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("accept", "text/markdown"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Title: Jina Title\n\n\n\n\nMarkdown Content:\nHello"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let reader = JinaReader::new().with_base_url(format!("{}/", mock_server.uri()));
    let extraction = reader.read("https://example.com/post").await.unwrap();

    assert_eq!(extraction.title, "Jina Title");
    assert_eq!(extraction.format, ContentFormat::Markdown);
    assert_eq!(
        extraction.content,
        "Title: Jina Title\n\nMarkdown Content:\nHello"
    );
}

#[tokio::test]
async fn test_jina_appends_target_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/https://example.com/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Post"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reader = JinaReader::new().with_base_url(format!("{}/", mock_server.uri()));
    let extraction = reader.read("https://example.com/post").await.unwrap();
    assert_eq!(extraction.content, "# Post");
    assert_eq!(extraction.title, "");
}

#[tokio::test]
async fn test_jina_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let reader = JinaReader::new().with_base_url(format!("{}/", mock_server.uri()));
    let err = reader.read("https://example.com").await.unwrap_err();

    assert!(matches!(err, ReaderError::Http { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP error 500: upstream exploded");
}

#[tokio::test]
async fn test_jina_rejects_error_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Failed to fetch page"))
        .mount(&mock_server)
        .await;

    let reader = JinaReader::new().with_base_url(format!("{}/", mock_server.uri()));
    let err = reader.read("https://example.com").await.unwrap_err();
    assert!(matches!(err, ReaderError::Rejected(_)));
}

#[tokio::test]
async fn test_jina_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("# Slow")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = ReaderConfig::default()
        .jina_base_url(format!("{}/", mock_server.uri()))
        .timeout(Duration::from_secs(1));
    let reader = JinaReader::from_config(&config);
    let err = reader.read("https://example.com").await.unwrap_err();

    assert!(matches!(err, ReaderError::Timeout(1)));
}

// ==================== Firecrawl ====================

#[tokio::test]
async fn test_firecrawl_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", "Bearer fc-test"))
        .and(body_partial_json(json!({
            "url": "https://example.com/post",
            "formats": ["markdown"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(firecrawl_success(&long_markdown())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reader = FirecrawlReader::new(Some("fc-test".to_string())).with_base_url(&mock_server.uri());
    let extraction = reader.read("https://example.com/post").await.unwrap();

    assert_eq!(extraction.title, "Scraped Title");
    assert_eq!(extraction.description.as_deref(), Some("Scraped description"));
    assert_eq!(extraction.format, ContentFormat::Markdown);
    assert_eq!(extraction.metadata.get("statusCode"), Some(&json!(200)));
    assert!(extraction.content.starts_with("# Heading"));
}

#[tokio::test]
async fn test_firecrawl_rejects_short_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(firecrawl_success("Verify you are human")))
        .mount(&mock_server)
        .await;

    let reader = FirecrawlReader::new(Some("fc-test".to_string())).with_base_url(&mock_server.uri());
    let err = reader.read("https://example.com").await.unwrap_err();
    assert!(err.to_string().contains("content too short"));
}

#[tokio::test]
async fn test_firecrawl_unsuccessful_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Rate limit exceeded"
        })))
        .mount(&mock_server)
        .await;

    let reader = FirecrawlReader::new(Some("fc-test".to_string())).with_base_url(&mock_server.uri());
    let err = reader.read("https://example.com").await.unwrap_err();
    assert_eq!(err.to_string(), "API error: Rate limit exceeded");
}

#[tokio::test]
async fn test_firecrawl_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let reader = FirecrawlReader::new(Some("bad".to_string())).with_base_url(&mock_server.uri());
    let err = reader.read("https://example.com").await.unwrap_err();
    assert!(matches!(err, ReaderError::Http { status: 401, .. }));
}

// ==================== Browser ====================

#[tokio::test]
async fn test_browser_extracts_rendered_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .and(query_param("token", "secret"))
        .and(body_partial_json(json!({
            "url": "https://mp.weixin.qq.com/s/abc",
            "gotoOptions": {"waitUntil": "networkidle2"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ARTICLE_HTML)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ReaderConfig::default()
        .browserless_url(mock_server.uri())
        .browserless_token("secret");
    let reader = BrowserReader::from_config(&config);
    let extraction = reader.read("https://mp.weixin.qq.com/s/abc").await.unwrap();

    assert_eq!(extraction.title, "Rendered Title");
    assert_eq!(extraction.alt_title.as_deref(), Some("OG Title"));
    assert_eq!(extraction.description.as_deref(), Some("A rendered page"));
    assert_eq!(extraction.format, ContentFormat::Text);
    assert!(extraction.content.contains("First paragraph of the article."));
    assert!(extraction.content.contains("Second paragraph."));
    assert!(!extraction.content.contains("Home | About"));
    assert!(!extraction.content.contains("Copyright"));
}

#[tokio::test]
async fn test_browser_sends_storage_state_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .and(body_partial_json(json!({
            "cookies": [{"name": "cookie2", "value": "abc", "domain": ".taobao.com"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut state = tempfile::NamedTempFile::new().unwrap();
    write!(
        state,
        r#"{{"cookies":[{{"name":"cookie2","value":"abc","domain":".taobao.com","path":"/"}}],"origins":[]}}"#
    )
    .unwrap();

    let reader = BrowserReader::new()
        .with_base_url(&mock_server.uri())
        .with_storage_state(state.path());
    let extraction = reader
        .read("https://item.taobao.com/item.htm?id=1")
        .await
        .unwrap();
    assert!(!extraction.content.is_empty());
}

#[tokio::test]
async fn test_browser_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let reader = BrowserReader::new().with_base_url(&mock_server.uri());
    let err = reader.read("https://example.com").await.unwrap_err();
    assert!(matches!(err, ReaderError::EmptyContent));
}

// ==================== Smart reader ====================

#[tokio::test]
async fn test_smart_reader_falls_back_to_firecrawl() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(firecrawl_success(&long_markdown())))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ReaderConfig::default()
        .jina_base_url(format!("{}/", mock_server.uri()))
        .firecrawl_base_url(mock_server.uri())
        .firecrawl_api_key("fc-test")
        .browserless_url(mock_server.uri());
    let smart = SmartReader::from_config(&config);

    let result = smart.read("https://www.zhihu.com/question/123", None).await.unwrap();
    assert_eq!(result.strategy, Strategy::Firecrawl);
    assert_eq!(result.platform, Some(Platform::Zhihu));
    assert_eq!(result.title, "Scraped Title");

    let note = format_note(&result);
    assert!(note.starts_with("# Scraped Title\n"));
    assert!(note.contains("> **Source**: [Zhihu](https://www.zhihu.com/question/123)"));
    assert!(note.contains("- **sourceURL**: https://example.com/post"));
}

#[tokio::test]
async fn test_smart_reader_all_strategies_fail() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(503).set_body_string("no browsers left"))
        .mount(&mock_server)
        .await;

    // No Firecrawl key: that strategy is skipped as not configured
    let config = ReaderConfig::default()
        .jina_base_url(format!("{}/", mock_server.uri()))
        .browserless_url(mock_server.uri());
    let smart = SmartReader::from_config(&config);

    let err = smart.read("https://example.com/post", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AllStrategiesExhausted);
    assert_eq!(
        err.to_string(),
        "All strategies failed: browser: HTTP error 503: no browsers left"
    );
}

#[tokio::test]
async fn test_smart_reader_login_platform_uses_browser_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Should not be used"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ReaderConfig::default()
        .jina_base_url(format!("{}/", mock_server.uri()))
        .browserless_url(mock_server.uri());
    let smart = SmartReader::from_config(&config);

    let explicit = [Strategy::Jina];
    let result = smart
        .read("https://item.taobao.com/item.htm?id=42", Some(&explicit[..]))
        .await
        .unwrap();
    assert_eq!(result.strategy, Strategy::Browser);
    assert!(result.requires_login);
    assert_eq!(result.platform, Some(Platform::Taobao));
}

#[tokio::test]
async fn test_smart_reader_only_unconfigured_backends() {
    let smart = SmartReader::from_config(&ReaderConfig::default());
    let explicit = [Strategy::Firecrawl];

    let err = smart
        .read("https://example.com", Some(&explicit[..]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    assert!(matches!(
        err,
        ReadError::BackendUnavailable {
            strategy: Strategy::Firecrawl,
            ..
        }
    ));
}

#[tokio::test]
async fn test_read_and_sync_to_vault() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Title: 测试文章\n\n正文内容"))
        .mount(&mock_server)
        .await;

    let config = ReaderConfig::default().jina_base_url(format!("{}/", mock_server.uri()));
    let smart = SmartReader::from_config(&config);
    let result = smart
        .read("https://mp.weixin.qq.com/s/xyz", None)
        .await
        .unwrap();

    let vault = tempfile::tempdir().unwrap();
    let path = sync_read_result(&result, vault.path(), "Clippings").unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with(" 测试文章.md"), "unexpected name {}", name);
    assert_eq!(path.parent().unwrap(), vault.path().join("Clippings"));

    let note = std::fs::read_to_string(&path).unwrap();
    assert!(note.starts_with("# 测试文章\n"));
    assert!(note.contains("> **Source**: [WeChat](https://mp.weixin.qq.com/s/xyz)"));
    assert!(note.contains("正文内容"));
}
