//! End-to-end smoke tests for the full meteobridged stack.
//!
//! Each test wires the real adapters together (in-memory `SQLite` store, the
//! `MySQL` data source, the entry manager and the axum router) and exercises
//! the HTTP layer via `tower::ServiceExt::oneshot`. No TCP port is bound. The
//! station databases point at a closed local port, so every connection
//! attempt is refused quickly.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use meteobridge_adapter_http_axum::router;
use meteobridge_adapter_http_axum::state::AppState;
use meteobridge_adapter_mysql_sqlx::MySqlDataSourceFactory;
use meteobridge_adapter_storage_sqlite_sqlx::{Config, SqliteConfigEntryRepository};
use meteobridge_app::entry_manager::EntryManager;
use meteobridge_app::ports::ConfigEntryRepository;
use meteobridge_domain::config_entry::{ConfigEntry, EntryState};
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::variant::IntegrationVariant;
use tower::ServiceExt;

type Manager = EntryManager<SqliteConfigEntryRepository, MySqlDataSourceFactory>;

fn unreachable_station(mac: &str) -> ConnectionConfig {
    ConnectionConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: "weather".to_string(),
        password: "secret".to_string(),
        database: "meteobridge".to_string(),
        station_mac: mac.to_string(),
    }
}

/// Build a fully-wired manager backed by an in-memory `SQLite` database.
async fn stack() -> (Manager, SqliteConfigEntryRepository) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let factory = MySqlDataSourceFactory::default().with_acquire_timeout(Duration::from_secs(1));
    let manager = EntryManager::new(
        SqliteConfigEntryRepository::new(db.pool().clone()),
        factory,
        IntegrationVariant::Meteobridge,
    );
    (manager, SqliteConfigEntryRepository::new(db.pool().clone()))
}

async fn app() -> axum::Router {
    let (manager, _) = stack().await;
    router::build(AppState::new(manager))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Config flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_list_no_entries_on_fresh_store() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/api/entries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_station_whose_database_is_unreachable() {
    let app = app().await;
    let station = serde_json::to_string(&unreachable_station("AA:BB:CC")).unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/entries")
                .header("content-type", "application/json")
                .body(Body::from(station))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "cannot_connect");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/entries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_json(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_blank_host_before_connecting() {
    let mut station = unreachable_station("AA:BB:CC");
    station.host = String::new();

    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/entries")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&station).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "invalid_input");
}

#[tokio::test]
async fn should_return_404_for_unknown_entry() {
    let uri = format!(
        "/api/entries/{}",
        meteobridge_domain::id::EntryId::new()
    );
    let resp = app()
        .await
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Entry lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_persisted_entry_in_setup_error_when_database_is_unreachable() {
    let (manager, repo) = stack().await;
    let entry = ConfigEntry::builder()
        .domain("meteobridge")
        .title("Meteobridge SQL (Backyard)")
        .data(unreachable_station("AA:BB:CC"))
        .build()
        .unwrap();
    let entry = repo.create(entry).await.unwrap();

    assert_eq!(manager.load_all().await.unwrap(), 1);
    let status = manager.entry(entry.id).await.unwrap();
    assert_eq!(status.state, EntryState::SetupError);
    assert!(manager.context(entry.id).await.is_none());

    let app = router::build(AppState::new(manager.clone()));
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/entries/{}", entry.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["state"], "setup_error");
    assert_eq!(body["error"]["kind"], "connectivity");
    assert!(body.get("password").is_none());

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/entries/{}/sensors", entry.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    manager.shutdown().await;
}

#[tokio::test]
async fn should_remove_persisted_entry() {
    let (manager, repo) = stack().await;
    let entry = ConfigEntry::builder()
        .domain("meteobridge")
        .title("Meteobridge SQL (Backyard)")
        .data(unreachable_station("AA:BB:CC"))
        .build()
        .unwrap();
    let entry = repo.create(entry).await.unwrap();
    let app = router::build(AppState::new(manager));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/entries/{}", entry.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(repo.get_by_id(entry.id).await.unwrap().is_none());
}
