//! API router

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::modules::{accounts, gate, health, metrics, sessions, tariffs};
use crate::application::GateService;
use crate::domain::RepositoryProvider;

/// State shared by the gate, session, account and tariff routes
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<GateService>,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Create the API router with all routes
pub fn create_api_router(
    state: AppState,
    health_state: health::HealthState,
    metrics_state: Option<metrics::MetricsState>,
) -> Router {
    let gate_routes = Router::new()
        .route("/entries", post(gate::record_entry))
        .route("/exits", post(gate::record_exit));

    let session_routes = Router::new()
        .route("/", get(sessions::list_vehicle_sessions))
        .route("/open", get(sessions::list_open_sessions))
        .route("/{id}", get(sessions::get_session));

    let account_routes = Router::new()
        .route("/{id}", get(accounts::get_account))
        .route("/{id}/top-up", post(accounts::top_up_account));

    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_tariffs))
        .route("/resolve", get(tariffs::resolve_tariff));

    let api = Router::new()
        .nest("/api/v1/gate", gate_routes)
        .nest("/api/v1/sessions", session_routes)
        .nest("/api/v1/accounts", account_routes)
        .nest("/api/v1/tariffs", tariff_routes)
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let mut router = Router::new().merge(api).merge(health_routes);
    if let Some(metrics_state) = metrics_state {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics_state),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sea_orm::DatabaseConnection;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::billing::TariffResolver;
    use crate::application::events::create_event_bus;
    use crate::application::{SessionEngine, VehicleLocks};
    use crate::domain::BalancePolicy;
    use crate::infrastructure::database::repositories::{
        SeaOrmRepositoryProvider, SeaOrmUnitOfWorkFactory,
    };
    use crate::infrastructure::database::testing::{seed_account, seed_vehicle, test_db};
    use crate::shared::retry::RetryConfig;

    fn app(db: &DatabaseConnection) -> Router {
        let engine = SessionEngine::new(
            Arc::new(SeaOrmUnitOfWorkFactory::new(db.clone())),
            TariffResolver::default(),
            BalancePolicy::AllowNegative,
            VehicleLocks::new(Duration::from_secs(1)),
            create_event_bus(),
        );
        let state = AppState {
            gate: Arc::new(GateService::new(Arc::new(engine), RetryConfig::default())),
            repos: Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
        };
        create_api_router(state, health::HealthState::new(db.clone()), None)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn entry_and_exit_round_trip() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 10_000).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let app = app(&db);

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/gate/entries",
            Some(json!({"vehicle_number": "aa 1234 bb"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["vehicle_number"], "AA1234BB");
        assert_eq!(body["data"]["in_parking"], true);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = call(&app, "GET", "/api/v1/sessions/open", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 1);

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/gate/exits",
            Some(json!({"vehicle_number": "AA1234BB"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["in_parking"], false);
        assert_eq!(body["data"]["settlement"], "balance");

        let (status, body) = call(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["account_id"], "acc-1");
    }

    #[tokio::test]
    async fn domain_errors_map_to_statuses() {
        let db = test_db().await;
        let app = app(&db);
        let entry = json!({"vehicle_number": "KA0001AA"});

        let (status, _) = call(&app, "POST", "/api/v1/gate/exits", Some(entry.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        call(&app, "POST", "/api/v1/gate/entries", Some(entry.clone())).await;
        let (status, body) = call(&app, "POST", "/api/v1/gate/entries", Some(entry)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("KA0001AA"));

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/gate/exits",
            Some(json!({"vehicle_number": "KA0001AA", "discount": "-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/gate/entries",
            Some(json!({"vehicle_number": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "GET", "/api/v1/sessions/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn vehicle_history_validates_the_range() {
        let db = test_db().await;
        let app = app(&db);

        let (status, body) = call(&app, "GET", "/api/v1/sessions?vehicle_number=AA1234BB", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let (status, _) = call(
            &app,
            "GET",
            "/api/v1/sessions?vehicle_number=AA1234BB&from=2024-03-05T00:00:00Z&to=2024-03-04T00:00:00Z",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn accounts_can_be_read_and_topped_up() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 250).await;
        let app = app(&db);

        let (status, body) = call(&app, "GET", "/api/v1/accounts/acc-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["balance"], "2.50");

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/accounts/acc-1/top-up",
            Some(json!({"amount": "7.50"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["balance"], "10.00");

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/accounts/acc-1/top-up",
            Some(json!({"amount": "0"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "GET", "/api/v1/accounts/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tariffs_are_listed_and_resolved() {
        let db = test_db().await;
        let app = app(&db);

        let (status, body) = call(&app, "GET", "/api/v1/tariffs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Standard");
        assert_eq!(body["data"][0]["windows"][0]["days"].as_array().unwrap().len(), 7);

        let (status, body) = call(
            &app,
            "GET",
            "/api/v1/tariffs/resolve?at=2024-03-04T10:00:00Z",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Standard");
        assert_eq!(body["data"]["pricetime"], 60);
    }

    #[tokio::test]
    async fn health_reports_database_ok() {
        let db = test_db().await;
        let app = app(&db);

        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
    }
}
