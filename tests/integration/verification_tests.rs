//! Integration tests for link verification
//!
//! These tests use wiremock to stand in for the remote hosts and run the
//! full per-candidate pipeline: robots.txt, politeness, fetch, report.

use folio_bad_urls::config::{
    Config, FolioConfig, LoggingConfig, OutputConfig, ScopeConfig, StrategyKind,
    UrlParserConfig, UserAgentConfig, WebConfig,
};
use folio_bad_urls::discovery::StaticSource;
use folio_bad_urls::output::{CsvReportWriter, MemorySink};
use folio_bad_urls::{CandidateLink, Outcome, Verifier};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config(report_dir: &str) -> Config {
    Config {
        folio: FolioConfig {
            okapi_url: "https://okapi.example.edu".to_string(),
            tenant_id: "diku".to_string(),
            username: "checker".to_string(),
            password: "secret".to_string(),
            strategy: StrategyKind::Srs,
            query_limit: 10,
            batch_limit: 10,
            instance_ids_path: "instance_ids.json".to_string(),
        },
        web: WebConfig {
            default_crawl_delay: 0.0,
            max_crawl_delay: 5.0,
            request_timeout: 2.0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        scope: ScopeConfig::default(),
        url_parser: UrlParserConfig::default(),
        output: OutputConfig {
            report_dir: report_dir.to_string(),
        },
        logging: LoggingConfig::default(),
    }
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn link(id: &str, url: String) -> CandidateLink {
    CandidateLink::new(Some(id.to_string()), url)
}

#[tokio::test]
async fn test_ok_and_not_found() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let results = verifier
        .verify_batch(&[
            link("in1", format!("{}/ok", base)),
            link("in2", format!("{}/gone", base)),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].outcome, Outcome::HttpStatus(200));
    assert!(!results[0].is_bad());
    assert_eq!(results[1].outcome, Outcome::HttpStatus(404));
    assert_eq!(results[1].identifier.as_deref(), Some("in2"));
    assert!(results[1].lexical.insecure_scheme);
    assert_eq!(verifier.robots().host_count(), 1);
}

#[tokio::test]
async fn test_robots_disallow_blocks_without_fetch() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/private/doc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let result = verifier
        .verify(&link("in1", format!("{}/private/doc", base)))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::RobotsBlocked);
    assert_eq!(result.outcome.code(), -10);
    assert_eq!(verifier.scheduler().host_count(), 0);
}

#[tokio::test]
async fn test_robots_server_error_fails_open() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let results = verifier
        .verify_batch(&[
            link("in1", format!("{}/a", base)),
            link("in2", format!("{}/b", base)),
        ])
        .await;

    assert!(results
        .iter()
        .all(|result| result.outcome == Outcome::HttpStatus(200)));

    let host = base.trim_end_matches('/');
    let policy = verifier.robots().cached(host).unwrap();
    assert!(!policy.rules_loaded());
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config(".");
    config.web.request_timeout = 1.0;
    let mut verifier = Verifier::new(&config).unwrap();

    let result = verifier
        .verify(&link("in1", format!("{}/slow", base)))
        .await
        .unwrap();
    assert_eq!(result.outcome, Outcome::TransportFailure);
    assert_eq!(result.outcome.code(), 0);
}

#[tokio::test]
async fn test_permanent_redirect_target_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let result = verifier
        .verify(&link("in1", format!("{}/old", base)))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::HttpStatus(404));
    assert_eq!(
        result.permanent_redirect_target,
        Some(format!("{}/new", base))
    );
}

#[tokio::test]
async fn test_temporary_redirect_not_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/temp"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/dest"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let result = verifier
        .verify(&link("in1", format!("{}/temp", base)))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::HttpStatus(200));
    assert!(result.permanent_redirect_target.is_none());
}

#[tokio::test]
async fn test_redirect_loop_is_transport_failure() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/b"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/a"))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let result = verifier
        .verify(&link("in1", format!("{}/a", base)))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::TransportFailure);
    assert!(result.permanent_redirect_target.is_none());
}

#[tokio::test]
async fn test_default_delay_spaces_requests() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config(".");
    config.web.default_crawl_delay = 1.0;
    let mut verifier = Verifier::new(&config).unwrap();

    let started = Instant::now();
    let results = verifier
        .verify_batch(&[
            link("in1", format!("{}/page", base)),
            link("in2", format!("{}/page", base)),
        ])
        .await;

    assert!(started.elapsed() >= Duration::from_millis(900));
    assert!(results
        .iter()
        .all(|result| result.outcome == Outcome::HttpStatus(200)));
}

#[tokio::test]
async fn test_excessive_crawl_delay_skips_host() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nCrawl-delay: 60\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let started = Instant::now();
    let results = verifier
        .verify_batch(&[
            link("in1", format!("{}/page", base)),
            link("in2", format!("{}/page", base)),
        ])
        .await;

    assert_eq!(results[0].outcome, Outcome::HttpStatus(200));
    assert_eq!(results[1].outcome, Outcome::ExcessiveWait);
    assert_eq!(results[1].outcome.code(), -11);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_huge_crawl_delay_skips_host_without_panic() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(
        &server,
        "User-agent: *\nCrawl-delay: 10000000000000000000\nAllow: /",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let results = verifier
        .verify_batch(&[
            link("in1", format!("{}/page", base)),
            link("in2", format!("{}/page", base)),
            link("in3", format!("{}/page", base)),
        ])
        .await;

    assert_eq!(results[0].outcome, Outcome::HttpStatus(200));
    assert_eq!(results[1].outcome, Outcome::ExcessiveWait);
    assert_eq!(results[2].outcome, Outcome::ExcessiveWait);
}

#[tokio::test]
async fn test_non_finite_crawl_delay_is_ignored() {
    for delay in ["inf", "NaN", "-inf"] {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_robots(
            &server,
            &format!("User-agent: *\nCrawl-delay: {}\nAllow: /", delay),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
        let results = verifier
            .verify_batch(&[
                link("in1", format!("{}/page", base)),
                link("in2", format!("{}/page", base)),
            ])
            .await;

        assert!(
            results
                .iter()
                .all(|result| result.outcome == Outcome::HttpStatus(200)),
            "crawl-delay {}",
            delay
        );
    }
}

#[tokio::test]
async fn test_padded_url_matches_robots_rules() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/private/doc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let result = verifier
        .verify(&link("in1", format!("  {}/private/doc \n", base)))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::RobotsBlocked);
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(".");
    config.scope.allow = vec!["library.example.edu".to_string()];
    let mut verifier = Verifier::new(&config).unwrap();

    let results = verifier
        .verify_batch(&[link("in1", format!("{}/anything", base))])
        .await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_run_writes_csv_per_batch() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nDisallow: /blocked").await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report_dir = dir.path().join("reports");
    let config = create_test_config(report_dir.to_str().unwrap());
    let mut verifier = Verifier::new(&config).unwrap();

    let links = vec![
        link("in1", format!("{}/ok", base)),
        link("in2", format!("{}/gone", base)),
        link("in3", format!("{}/blocked/x", base)),
    ];
    let mut source = StaticSource::new(links, 2);
    let mut sink = CsvReportWriter::new(&config.output.report_dir);

    let stats = verifier.run(&mut source, &mut sink, 0, None).await.unwrap();
    assert_eq!(stats.batches, 2);
    assert_eq!(stats.checked, 3);
    assert_eq!(stats.bad, 2);

    let first = std::fs::read_to_string(report_dir.join("result_0.csv")).unwrap();
    let lines: Vec<&str> = first.lines().collect();
    assert_eq!(
        lines,
        vec![
            "instance_hrid,url,status_code,permanent_redirect,insecure_url".to_string(),
            format!("in2,{}/gone,410,,true", base),
        ]
    );

    let second = std::fs::read_to_string(report_dir.join("result_2.csv")).unwrap();
    assert!(second.contains(&format!("in3,{}/blocked/x,-10,,true", base)));
}

#[tokio::test]
async fn test_run_with_memory_sink_keeps_good_results() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut verifier = Verifier::new(&create_test_config(".")).unwrap();
    let links = (0..3)
        .map(|i| link(&format!("in{}", i), format!("{}/r/{}", base, i)))
        .collect();
    let mut source = StaticSource::new(links, 10);
    let mut sink = MemorySink::new();

    let stats = verifier.run(&mut source, &mut sink, 0, None).await.unwrap();
    assert_eq!(stats.bad, 0);
    assert_eq!(sink.results().count(), 3);
}
