//! Axum application setup.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local front-ends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session and navigation
        .route("/session", get(handlers::get_session))
        .route("/confirm", post(handlers::confirm))
        .route("/skip", post(handlers::skip))
        .route("/back", post(handlers::back))
        // Variation types
        .route(
            "/variation-types",
            get(handlers::list_types).post(handlers::add_type),
        )
        .route(
            "/variation-types/:index",
            put(handlers::rename_type).delete(handlers::delete_type),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    info!(%addr, "review server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("Shutting down...");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use collatio::{
        CollationNormalizer, DecisionRecorder, DecisionStore, MemoryStore, PersistedDecision,
        ReviewDecision, ReviewSession, VariationTypeCatalog, VariationTypeStore,
    };

    use super::*;

    const REPORT: &str = r#"{
        "1": [
            {"differences": {"w1": "et", "w2": "nunc"}, "position": 3},
            {"differences": {"w1": "deus", "w2": "dominus"}, "position": 7}
        ],
        "2": [{"differences": {"w1": "lux", "w2": "lvx"}, "position": 0}],
        "witness_maps": {"1": {"w2": "02.docx"}, "2": {"w2": "02.docx"}}
    }"#;

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_types(&["Omission", "Word Choice"]));
        let items = CollationNormalizer::new().normalize_json(REPORT).unwrap();
        let catalog = VariationTypeCatalog::load(store.clone()).unwrap();
        let session = ReviewSession::new(items, catalog, DecisionRecorder::new(store.clone()));
        (create_router(AppState::new(session, "memory")), store)
    }

    /// Delegates to a `MemoryStore`, sleeping before every write.
    struct SlowStore {
        inner: Arc<MemoryStore>,
        delay: Duration,
    }

    impl DecisionStore for SlowStore {
        fn save_decision(&self, decision: &ReviewDecision) -> collatio::Result<PersistedDecision> {
            std::thread::sleep(self.delay);
            self.inner.save_decision(decision)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    impl VariationTypeStore for SlowStore {
        fn fetch_types(&self) -> collatio::Result<Option<Vec<String>>> {
            self.inner.fetch_types()
        }

        fn replace_types(&self, labels: &[String]) -> collatio::Result<()> {
            std::thread::sleep(self.delay);
            self.inner.replace_types(labels)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn slow_app(delay: Duration) -> (Router, Arc<MemoryStore>) {
        let memory = Arc::new(MemoryStore::with_types(&["Omission", "Word Choice"]));
        let slow = Arc::new(SlowStore {
            inner: memory.clone(),
            delay,
        });
        let items = CollationNormalizer::new().normalize_json(REPORT).unwrap();
        let catalog = VariationTypeCatalog::load(slow.clone()).unwrap();
        let session = ReviewSession::new(items, catalog, DecisionRecorder::new(slow));
        (create_router(AppState::new(session, "slow")), memory)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let request = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(request(method, uri, body))
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_get_session() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/api/session", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "memory");
        assert_eq!(body["progress"]["total"], 3);
        assert_eq!(body["current"]["word2"], "nunc");
        assert_eq!(body["current"]["manuscriptSigla"], "02");
    }

    #[tokio::test]
    async fn test_confirm_advances_and_persists() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/confirm",
            Some(json!({"isSignificant": true, "variationType": "Word Choice"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"]["comparisonId"], "cmp_0001");
        assert_eq!(body["session"]["progress"]["completed"], 1);
        assert_eq!(body["session"]["current"]["word2"], "dominus");
        assert_eq!(store.saved_decisions().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_failure_keeps_position() {
        let (app, store) = app();
        store.fail_next_saves(1);

        let (status, body) = send(
            &app,
            "POST",
            "/api/confirm",
            Some(json!({"isSignificant": false, "variationType": "Omission"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "persistence");

        let (_, session) = send(&app, "GET", "/api/session", None).await;
        assert_eq!(session["current"]["word2"], "nunc");
        assert_eq!(session["progress"]["completed"], 0);
        assert_eq!(session["confirming"], false);
    }

    #[tokio::test]
    async fn test_confirm_unknown_type_is_bad_request() {
        let (app, store) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/confirm",
            Some(json!({"isSignificant": true, "variationType": "Nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test]
    async fn test_skip_and_back() {
        let (app, _) = app();

        let (_, body) = send(&app, "POST", "/api/skip", None).await;
        assert_eq!(body["moved"], true);
        let (_, body) = send(&app, "POST", "/api/skip", None).await;
        assert_eq!(body["session"]["skip_stack"], json!([0, 1]));

        let (_, body) = send(&app, "POST", "/api/back", None).await;
        assert_eq!(body["moved"], true);
        assert_eq!(body["session"]["current"]["word2"], "dominus");
        assert_eq!(body["session"]["skip_stack"], json!([0]));
    }

    #[tokio::test]
    async fn test_back_with_empty_stack_does_not_move() {
        let (app, _) = app();
        let (status, body) = send(&app, "POST", "/api/back", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["moved"], false);
    }

    #[tokio::test]
    async fn test_variation_type_crud() {
        let (app, store) = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/variation-types",
            Some(json!({"label": "Transposition"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Omission", "Word Choice", "Transposition"]));

        let (_, body) = send(
            &app,
            "PUT",
            "/api/variation-types/1",
            Some(json!({"label": "Lexical"})),
        )
        .await;
        assert_eq!(body, json!(["Omission", "Lexical", "Transposition"]));

        let (_, body) = send(&app, "DELETE", "/api/variation-types/0", None).await;
        assert_eq!(body, json!(["Lexical", "Transposition"]));
        assert_eq!(
            store.stored_types(),
            Some(vec!["Lexical".to_string(), "Transposition".to_string()])
        );

        let (status, _) = send(
            &app,
            "POST",
            "/api/variation-types",
            Some(json!({"label": "Lexical"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_last_type_is_rejected() {
        let (app, _) = app();
        send(&app, "DELETE", "/api/variation-types/0", None).await;
        let (status, body) = send(&app, "DELETE", "/api/variation-types/0", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (_, types) = send(&app, "GET", "/api/variation-types", None).await;
        assert_eq!(types, json!(["Word Choice"]));
    }

    #[tokio::test]
    async fn test_dropped_confirm_still_settles_session() {
        let (app, store) = slow_app(Duration::from_millis(300));
        let confirm = json!({"isSignificant": true, "variationType": "Omission"});

        // Client goes away while the save is still running.
        let dropped = tokio::time::timeout(
            Duration::from_millis(50),
            app.clone()
                .oneshot(request("POST", "/api/confirm", Some(confirm.clone()))),
        )
        .await;
        assert!(dropped.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.saved_decisions().len(), 1);

        let (_, session) = send(&app, "GET", "/api/session", None).await;
        assert_eq!(session["confirming"], false);
        assert_eq!(session["progress"]["completed"], 1);
        assert_eq!(session["current"]["word2"], "dominus");

        let (status, body) = send(&app, "POST", "/api/confirm", Some(confirm)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"]["wordComparison"]["word2"], "dominus");
        assert_eq!(store.saved_decisions().len(), 2);
    }

    #[tokio::test]
    async fn test_skip_is_not_blocked_by_catalog_write() {
        let (app, store) = slow_app(Duration::from_millis(500));

        let write = tokio::spawn({
            let app = app.clone();
            async move {
                send(
                    &app,
                    "POST",
                    "/api/variation-types",
                    Some(json!({"label": "Transposition"})),
                )
                .await
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = Instant::now();
        let (status, body) = send(&app, "POST", "/api/skip", None).await;
        let elapsed = started.elapsed();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["moved"], true);
        assert!(elapsed < Duration::from_millis(250), "skip took {:?}", elapsed);

        let (status, labels) = write.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(labels, json!(["Omission", "Word Choice", "Transposition"]));
        assert_eq!(store.type_writes(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_catalog_writes_both_land() {
        let (app, store) = slow_app(Duration::from_millis(100));

        let add = |label: &'static str| {
            let app = app.clone();
            tokio::spawn(async move {
                send(&app, "POST", "/api/variation-types", Some(json!({"label": label}))).await
            })
        };
        let first = add("Transposition");
        let second = add("Lacuna");

        assert_eq!(first.await.unwrap().0, StatusCode::OK);
        assert_eq!(second.await.unwrap().0, StatusCode::OK);

        let (_, types) = send(&app, "GET", "/api/variation-types", None).await;
        assert_eq!(types.as_array().map(Vec::len), Some(4));
        assert_eq!(store.stored_types().map(|t| t.len()), Some(4));
        assert_eq!(store.type_writes(), 2);
    }
}
