//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, with sources built
//! the same way the binary builds them.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lookup_cache::{api::create_router, sources::build_sources, AppState, Config};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn test_config() -> Config {
    let vars = [
        ("STATIC_MAPPINGS", "web01=10.0.0.1,db01=10.0.0.2"),
        ("STATIC_CACHE_ENABLED", "true"),
        ("STATIC_CACHE_SIZE", "2"),
        ("STATIC_CACHE_NEGATIVE_TTL_SECS", "60"),
    ];
    Config::from_vars(|name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    })
    .unwrap()
}

fn create_test_app() -> Router {
    let config = test_config();
    config.validate().unwrap();
    let sources = build_sources(&config).unwrap();
    create_router(AppState::new(sources))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Lookup Endpoint Tests ==

#[tokio::test]
async fn test_static_lookup_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/lookup/static/web01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "static");
    assert_eq!(json["key"], "web01");
    assert_eq!(json["found"], true);
    assert_eq!(json["value"], "10.0.0.1");
}

#[tokio::test]
async fn test_static_lookup_not_found_is_success() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/lookup/static/unknown").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["found"], false);
    assert!(json["value"].is_null());
}

#[tokio::test]
async fn test_dns_lookup_rejects_non_ip_key() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/lookup/dns/example.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not an IP address"));

    // Invalid keys are never cached
    let (_, stats) = send(&app, "GET", "/stats").await;
    assert_eq!(stats["sources"]["dns"]["total_entries"], 0);
}

#[tokio::test]
async fn test_unknown_source_returns_404() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/lookup/ldap/anything").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("ldap"));
}

#[tokio::test]
async fn test_zero_timeout_returns_504() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/lookup/static/web01?timeout_ms=0").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "lookup deadline exceeded");
}

#[tokio::test]
async fn test_timeout_failure_is_not_cached() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/lookup/static/web01?timeout_ms=0").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let (status, json) = send(&app, "GET", "/lookup/static/web01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["found"], true);

    let (_, stats) = send(&app, "GET", "/stats").await;
    assert_eq!(stats["sources"]["static"]["hits"], 0);
    assert_eq!(stats["sources"]["static"]["misses"], 2);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_track_hits_and_negative_hits() {
    let app = create_test_app();

    send(&app, "GET", "/lookup/static/web01").await;
    send(&app, "GET", "/lookup/static/web01").await;
    send(&app, "GET", "/lookup/static/unknown").await;
    send(&app, "GET", "/lookup/static/unknown").await;

    let (status, json) = send(&app, "GET", "/stats").await;
    let stats = &json["sources"]["static"];

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["negative_hits"], 1);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["total_entries"], 2);
}

#[tokio::test]
async fn test_stats_capacity_eviction() {
    let app = create_test_app();

    // Static cache holds two entries
    send(&app, "GET", "/lookup/static/web01").await;
    send(&app, "GET", "/lookup/static/db01").await;
    send(&app, "GET", "/lookup/static/unknown").await;

    let (_, json) = send(&app, "GET", "/stats").await;
    let stats = &json["sources"]["static"];
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["total_entries"], 2);
}

#[tokio::test]
async fn test_stats_lists_every_source() {
    let app = create_test_app();

    let (_, json) = send(&app, "GET", "/stats").await;

    let sources = json["sources"].as_object().unwrap();
    assert!(sources.contains_key("dns"));
    assert!(sources.contains_key("static"));
}

// == Clear Endpoint Tests ==

#[tokio::test]
async fn test_clear_cache() {
    let app = create_test_app();

    send(&app, "GET", "/lookup/static/web01").await;

    let (status, json) = send(&app, "DELETE", "/cache/static").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], true);

    let (_, json) = send(&app, "GET", "/stats").await;
    assert_eq!(json["sources"]["static"]["total_entries"], 0);
}

#[tokio::test]
async fn test_clear_unknown_source() {
    let app = create_test_app();

    let (status, _) = send(&app, "DELETE", "/cache/ldap").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Expiry Tests ==

#[tokio::test]
async fn test_positive_ttl_expiry_through_source() {
    use lookup_cache::sources::static_map::{create_source, parse_mappings, StaticConfig};
    use lookup_cache::{CacheConfig, LookupContext};

    let source = create_source(&StaticConfig {
        mappings: parse_mappings("a=1").unwrap(),
        cache: CacheConfig::enabled(10, Duration::from_millis(50)),
    });
    let ctx = LookupContext::new();

    source.lookup(&ctx, "a").await.unwrap();
    source.lookup(&ctx, "a").await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    source.lookup(&ctx, "a").await.unwrap();

    let stats = source.stats().unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.expirations, 1);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
