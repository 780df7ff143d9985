//! End-to-end fund monitor behaviour against a mock Eastmoney server.

mod support;

use std::fs;

use lib_monitor::markets::eastmoney::{
    ApiCallEastmoney, CatalogStore, EastmoneyEndpoints, FundCatalog, FundMonitor,
};
use lib_monitor::markets::{FailureKind, MarketError};
use support::{closed_port_url, MockServer, Reply};
use tempfile::tempdir;

const LISTING: &str = concat!(
    "var r = [",
    r#"["000001","HXCZHH","华夏成长混合","混合型-灵活","HUAXIACHENGZHANGHUNHE"],"#,
    r#"["110022","YFDXFHYGP","易方达消费行业股票","股票型","YIFANGDAXIAOFEIHANGYEGUPIAO"]"#,
    "];"
);

const ESTIMATE_000001: &str = r#"jsonpgz({"fundcode":"000001","name":"华夏成长混合","jzrq":"2021-03-01","dwjz":"1.2240","gsz":"1.2304","gszzl":"0.52","gztime":"2021-03-02 15:00"});"#;

const ESTIMATE_110022: &str = r#"jsonpgz({"fundcode":"110022","name":"易方达消费行业股票","jzrq":"2021-03-01","dwjz":"4.3270","gsz":"4.2601","gszzl":"-1.55","gztime":"2021-03-02 15:00"});"#;

fn endpoints(server: &MockServer) -> EastmoneyEndpoints {
    EastmoneyEndpoints {
        listing_base: server.url("/js/"),
        estimate_base: server.url("/gz/"),
    }
}

fn fund_monitor(server: &MockServer, store: CatalogStore, targets: &[&str]) -> FundMonitor {
    let api_call = ApiCallEastmoney::new(&endpoints(server), 0).unwrap();
    FundMonitor::new(
        api_call,
        store,
        targets.iter().map(|s| s.to_string()).collect(),
    )
}

#[tokio::test]
async fn test_fund_line_uses_catalog_on_disk() {
    let server = MockServer::start(vec![("/gz/000001.js", Reply::ok(ESTIMATE_000001))]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("total_fund.json");
    fs::write(&path, r#"{"000001":["华夏成长混合","混合型-灵活"]}"#).unwrap();

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &[]);
    let line = monitor.fund_line("000001").await.unwrap();

    assert_eq!(line, "基金:华夏成长混合 | 混合型-灵活 | 收益率: 0.52 %");
    assert_eq!(server.requests(), vec!["/gz/000001.js"]);
}

#[tokio::test]
async fn test_missing_catalog_is_refreshed_once() {
    let server = MockServer::start(vec![
        ("/js/fundcode_search.js", Reply::ok(LISTING)),
        ("/gz/000001.js", Reply::ok(ESTIMATE_000001)),
        ("/gz/110022.js", Reply::ok(ESTIMATE_110022)),
    ]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("total_fund.json");

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &["000001", "110022"]);
    let lines = monitor.fund_lines(None).await;

    let lines: Vec<String> = lines.into_iter().map(|(_, line)| line.unwrap()).collect();
    assert_eq!(
        lines,
        vec![
            "基金:华夏成长混合 | 混合型-灵活 | 收益率: 0.52 %",
            "基金:易方达消费行业股票 | 股票型 | 收益率: -1.55 %",
        ]
    );

    let listing_requests = server
        .requests()
        .iter()
        .filter(|p| p.as_str() == "/js/fundcode_search.js")
        .count();
    assert_eq!(listing_requests, 1);

    let saved = fs::read_to_string(&path).unwrap();
    assert_eq!(
        saved,
        r#"{"000001":["华夏成长混合","混合型-灵活"],"110022":["易方达消费行业股票","股票型"]}"#
    );
}

#[tokio::test]
async fn test_failed_refresh_leaves_category_empty() {
    let server = MockServer::start(vec![
        ("/js/fundcode_search.js", Reply::status(500)),
        ("/gz/000001.js", Reply::ok(ESTIMATE_000001)),
    ]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("total_fund.json");

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &[]);
    let first = monitor.fund_line("000001").await.unwrap();
    let second = monitor.fund_line("000001").await.unwrap();

    assert_eq!(first, "基金:华夏成长混合 |  | 收益率: 0.52 %");
    assert_eq!(second, first);
    assert!(!path.exists());
    assert_eq!(
        server
            .requests()
            .iter()
            .filter(|p| p.as_str() == "/js/fundcode_search.js")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_catalog() {
    let server = MockServer::start(vec![("/js/fundcode_search.js", Reply::ok("var r = null;"))]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("total_fund.json");
    let previous = r#"{"000001":["华夏成长","混合型"]}"#;
    fs::write(&path, previous).unwrap();

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &[]);
    let err = monitor.refresh_catalog().await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Parse);
    assert_eq!(fs::read_to_string(&path).unwrap(), previous);
    assert_eq!(monitor.category("000001").await.as_deref(), Some("混合型"));
}

#[tokio::test]
async fn test_refresh_replaces_catalog_and_skips_bad_records() {
    let listing = concat!(
        "var r = [",
        r#"["000001","HXCZHH","华夏成长混合","混合型-灵活","HUAXIACHENGZHANGHUNHE"],"#,
        r#"["000002","BAD","四个字段","混合型"],"#,
        r#"["000001","DUP","重复","股票型","DUP"]"#,
        "];"
    );
    let server = MockServer::start(vec![("/js/fundcode_search.js", Reply::ok(listing))]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("total_fund.json");
    fs::write(&path, r#"{"999999":["旧","旧"]}"#).unwrap();

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &[]);
    let summary = monitor.refresh_catalog().await.unwrap();

    assert_eq!(summary.funds, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.duplicates, 1);

    let on_disk = FundCatalog::load(&path).unwrap();
    assert_eq!(on_disk.category("000001"), Some("混合型-灵活"));
    assert_eq!(on_disk.get("999999"), None);
    assert_eq!(monitor.store().category("000001"), Some("混合型-灵活"));
}

#[tokio::test]
async fn test_fund_lines_report_each_failure_kind() {
    let server = MockServer::start(vec![
        ("/gz/000001.js", Reply::ok(ESTIMATE_000001)),
        ("/gz/999999.js", Reply::ok("jsonpgz();")),
        ("/gz/888888.js", Reply::ok("<html>blocked</html>")),
    ]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("total_fund.json");
    fs::write(&path, r#"{"000001":["华夏成长混合","混合型-灵活"]}"#).unwrap();

    let mut monitor = fund_monitor(&server, CatalogStore::new(&path), &[]);
    let targets: Vec<String> = ["000001", "999999", "888888", "777777"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let results = monitor.fund_lines(Some(&targets)).await;

    let codes: Vec<&str> = results.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(codes, vec!["000001", "999999", "888888", "777777"]);

    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(MarketError::Json(_))));
    assert!(matches!(results[2].1, Err(MarketError::Parse(_))));
    match &results[3].1 {
        Err(err @ MarketError::Status { status: 404, .. }) => assert!(err.is_retryable()),
        other => panic!("expected a 404 status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_failure() {
    let base = closed_port_url();
    let api_call = ApiCallEastmoney::new(
        &EastmoneyEndpoints {
            listing_base: base.clone(),
            estimate_base: base,
        },
        0,
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let mut monitor = FundMonitor::new(
        api_call,
        CatalogStore::new(dir.path().join("total_fund.json")),
        Vec::new(),
    );

    let err = monitor.fund_line("000001").await.unwrap_err();
    assert!(matches!(err, MarketError::Transport(_)));
    assert!(err.is_retryable());
}
