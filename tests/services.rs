use std::sync::Arc;
use std::time::Duration;

use heatsafe::cache::TtlCache;
use heatsafe::config::FetchConfig;
use heatsafe::http_client::HttpClient;
use heatsafe::models::{Advisory, Priority, Severity};
use heatsafe::services::advisory::{ADVISORIES_PATH, CURRENT_ADVISORY_PATH};
use heatsafe::services::dashboard::DASHBOARD_PATH;
use heatsafe::services::notification::URGENT_ALERTS_PATH;
use heatsafe::services::tip::TIPS_PATH;
use heatsafe::services::{AdvisoryService, ResourceState, Services};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_retries() -> FetchConfig {
    FetchConfig {
        timeout: Duration::from_secs(2),
        max_retries: 0,
        backoff_base: Duration::from_millis(1),
    }
}

fn advisory(id: &str, severity: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Heat Advisory {}", id),
        "description": "Hot conditions expected",
        "severity": severity,
        "region": "Phoenix",
        "issuedAt": "2026-07-01T08:00:00Z",
        "expiresAt": "2026-07-02T08:00:00Z"
    })
}

async fn serve_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

fn services_for(server: &MockServer, ttl: Duration) -> Services {
    Services::new(HttpClient::new(server.uri(), no_retries()), ttl)
}

fn state_of(services: &Services, name: &str) -> ResourceState {
    services
        .status()
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.state)
        .unwrap()
}

#[tokio::test]
async fn malformed_advisories_are_dropped() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        ADVISORIES_PATH,
        json!([advisory("good", "high"), {"id": "broken", "title": "No dates", "severity": "high"}]),
    )
    .await;
    let services = services_for(&server, Duration::from_secs(60));

    let advisories = services.advisories.fetch_advisories().await;
    assert_eq!(advisories.len(), 1);
    assert_eq!(advisories[0].id, "good");
    assert_eq!(advisories[0].severity, Severity::High);
    assert_eq!(state_of(&services, "advisories"), ResourceState::Ready);
}

#[tokio::test]
async fn elements_failing_validation_are_dropped() {
    let server = MockServer::start().await;
    let mut inverted = advisory("inv", "low");
    inverted["issuedAt"] = json!("2026-07-02T08:00:00Z");
    inverted["expiresAt"] = json!("2026-07-01T08:00:00Z");
    serve_json(
        &server,
        ADVISORIES_PATH,
        json!([advisory("a", "low"), inverted, advisory("b", "extreme")]),
    )
    .await;
    let services = services_for(&server, Duration::from_secs(60));

    let ids: Vec<String> = services
        .advisories
        .fetch_advisories()
        .await
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn cache_hit_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIPS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "t1", "title": "Hydrate", "content": "Drink water", "category": "Hydration", "priority": "high"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let services = services_for(&server, Duration::from_secs(60));

    assert_eq!(services.tips.fetch_tips().await.len(), 1);
    assert_eq!(services.tips.fetch_tips().await.len(), 1);
    assert_eq!(state_of(&services, "tips"), ResourceState::Ready);
}

#[tokio::test]
async fn failed_refresh_serves_stale_value() {
    let server = MockServer::start().await;
    Mock::given(path(ADVISORIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([advisory("cached", "moderate")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(path(ADVISORIES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let services = services_for(&server, Duration::from_millis(50));

    let first = services.advisories.fetch_advisories().await;
    assert_eq!(first.len(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = services.advisories.fetch_advisories().await;
    assert_eq!(second, first);
    assert_eq!(hits(&server, ADVISORIES_PATH).await, 2);
    assert_eq!(state_of(&services, "advisories"), ResourceState::StaleServed);
}

#[tokio::test]
async fn failure_with_nothing_cached_returns_empty_list() {
    let server = MockServer::start().await;
    Mock::given(path(TIPS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let services = services_for(&server, Duration::from_secs(60));

    assert!(services.tips.fetch_tips().await.is_empty());
    assert_eq!(state_of(&services, "tips"), ResourceState::ErrorFallback);

    // The fallback is not cached, so the next call goes back to the network.
    services.tips.fetch_tips().await;
    assert_eq!(hits(&server, TIPS_PATH).await, 2);
}

#[tokio::test]
async fn current_advisory_falls_back_to_placeholder() {
    // Nothing mounted: every path answers 404.
    let server = MockServer::start().await;
    let services = services_for(&server, Duration::from_secs(60));

    let advisory = services.advisories.fetch_current_advisory().await;
    assert_eq!(advisory.id, Advisory::FALLBACK_ID);
    assert_eq!(advisory.expires_at - advisory.issued_at, chrono::Duration::hours(24));
    assert_eq!(state_of(&services, "current_advisory"), ResourceState::ErrorFallback);
}

#[tokio::test]
async fn invalid_dashboard_is_treated_as_a_failure() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        DASHBOARD_PATH,
        json!({
            "currentTemperature": 100,
            "heatIndex": 104,
            "humidity": 250,
            "riskLevel": "high",
            "summary": "s",
            "updatedAt": "2026-07-01T12:00:00Z"
        }),
    )
    .await;
    let services = services_for(&server, Duration::from_secs(60));

    let dashboard = services.dashboard.fetch_dashboard().await;
    assert_eq!(dashboard.risk_level, "unknown");
    assert_eq!(state_of(&services, "dashboard"), ResourceState::ErrorFallback);
}

#[tokio::test]
async fn urgent_alerts_come_back_sorted() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        URGENT_ALERTS_PATH,
        json!([
            {"id": "a", "title": "t", "message": "m", "priority": "medium", "timestamp": "2026-07-01T12:00:00Z"},
            {"id": "b", "title": "t", "message": "m", "priority": "urgent", "timestamp": "2026-07-01T11:00:00Z"},
            {"id": "c", "title": "t", "message": "", "priority": "urgent", "timestamp": "2026-07-01T13:00:00Z"}
        ]),
    )
    .await;
    let services = services_for(&server, Duration::from_secs(60));

    let alerts = services.notifications.fetch_urgent_alerts().await;
    let ids: Vec<&str> = alerts.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(alerts[0].priority, Priority::Urgent);
}

#[tokio::test]
async fn injected_cache_is_consulted_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(path(ADVISORIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let lists = Arc::new(TtlCache::new(Duration::from_secs(60)));
    let seeded: Advisory = serde_json::from_value(advisory("seeded", "low")).unwrap();
    lists.set(ADVISORIES_PATH, vec![seeded.clone()]);

    let service = AdvisoryService::new(
        HttpClient::new(server.uri(), no_retries()),
        lists,
        Arc::new(TtlCache::new(Duration::from_secs(60))),
    );

    assert_eq!(service.fetch_advisories().await, vec![seeded]);
}

#[tokio::test]
async fn current_advisory_is_cached_separately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CURRENT_ADVISORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(advisory("now", "extreme")))
        .expect(1)
        .mount(&server)
        .await;
    serve_json(&server, ADVISORIES_PATH, json!([])).await;
    let services = services_for(&server, Duration::from_secs(60));

    assert_eq!(services.advisories.fetch_current_advisory().await.id, "now");
    assert!(services.advisories.fetch_advisories().await.is_empty());
    assert_eq!(services.advisories.fetch_current_advisory().await.id, "now");
}
