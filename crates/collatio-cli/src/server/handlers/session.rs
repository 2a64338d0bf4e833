//! Review session handlers: state, confirm, skip and back.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::warn;

use collatio::CollatioError;
use collatio::PersistedDecision;
use collatio::review::SessionSnapshot;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for confirming the current comparison.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub is_significant: bool,
    pub variation_type: String,
}

/// Full session state.
#[derive(Serialize)]
pub struct SessionResponse {
    pub source: String,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

/// Response after a successful confirmation.
#[derive(Serialize)]
pub struct ConfirmResponse {
    pub decision: PersistedDecision,
    pub session: SessionSnapshot,
}

/// Response after skip or back. `moved` is false when the action did not apply.
#[derive(Serialize)]
pub struct NavigationResponse {
    pub moved: bool,
    pub session: SessionSnapshot,
}

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(SessionResponse {
        source: state.source_name.clone(),
        session: session.snapshot(),
    })
}

/// POST /api/confirm
///
/// The decision is saved on a blocking thread with the session unlocked, so
/// skip and back keep working while the store is slow. The save and its
/// bookkeeping run on a spawned task: if the client disconnects mid-save the
/// session still records the outcome and accepts the next confirmation.
pub async fn confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let (pending, recorder) = {
        let mut session = state.session.lock().await;

        if session.is_confirming() {
            return Err(ApiError::Conflict(
                "A confirmation is already in progress".to_string(),
            ));
        }
        if session.queue().is_confirmed(session.queue().cursor()) {
            return Err(ApiError::Conflict(
                "The current comparison has already been confirmed".to_string(),
            ));
        }

        let pending = session.begin_confirm(req.is_significant, &req.variation_type)?;
        (pending, session.recorder().clone())
    };

    let session = state.session.clone();
    let settle = tokio::spawn(async move {
        let joined = tokio::task::spawn_blocking({
            let pending = pending.clone();
            move || recorder.persist(pending.decision())
        })
        .await;

        let result = joined.unwrap_or_else(|e| {
            warn!(error = %e, "decision save task failed");
            Err(CollatioError::Persistence(format!("save task failed: {}", e)))
        });

        let mut session = session.lock().await;
        let decision = session.finish_confirm(pending, result)?;
        Ok::<_, CollatioError>(ConfirmResponse {
            decision,
            session: session.snapshot(),
        })
    });

    Ok(Json(settle.await??))
}

/// POST /api/skip
pub async fn skip(State(state): State<AppState>) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    let moved = session.skip();
    Json(NavigationResponse {
        moved,
        session: session.snapshot(),
    })
}

/// POST /api/back
pub async fn back(State(state): State<AppState>) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    let moved = session.go_back();
    Json(NavigationResponse {
        moved,
        session: session.snapshot(),
    })
}
