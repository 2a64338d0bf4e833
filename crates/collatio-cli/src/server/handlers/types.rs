//! Variation-type handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use collatio::{CatalogChange, VariationTypeCatalog};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for adding or renaming a variation type.
#[derive(Deserialize)]
pub struct LabelRequest {
    pub label: String,
}

/// GET /api/variation-types
pub async fn list_types(State(state): State<AppState>) -> Json<Vec<String>> {
    let session = state.session.lock().await;
    Json(session.catalog().list().to_vec())
}

/// POST /api/variation-types
pub async fn add_type(
    State(state): State<AppState>,
    Json(req): Json<LabelRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    mutate_catalog(&state, move |catalog| catalog.prepare_add(&req.label)).await
}

/// PUT /api/variation-types/:index
pub async fn rename_type(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<LabelRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    mutate_catalog(&state, move |catalog| {
        catalog.prepare_rename(index, &req.label)
    })
    .await
}

/// DELETE /api/variation-types/:index
pub async fn delete_type(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Vec<String>>, ApiError> {
    mutate_catalog(&state, move |catalog| catalog.prepare_delete(index)).await
}

/// Prepare a catalog change under the session lock, write it to the settings
/// store with the lock released, then commit it and return the resulting list.
///
/// Runs on a spawned task so a dropped request cannot leave a written list
/// uncommitted.
async fn mutate_catalog<F>(state: &AppState, prepare: F) -> Result<Json<Vec<String>>, ApiError>
where
    F: FnOnce(&VariationTypeCatalog) -> collatio::Result<CatalogChange> + Send + 'static,
{
    let state = state.clone();
    let task = tokio::spawn(async move {
        let _writer = state.catalog_writes.lock().await;

        let (change, store) = {
            let session = state.session.lock().await;
            let catalog = session.catalog();
            (prepare(catalog)?, catalog.store())
        };

        let labels = change.labels().to_vec();
        tokio::task::spawn_blocking(move || store.replace_types(&labels)).await??;

        let mut session = state.session.lock().await;
        session.catalog_mut().commit(change);
        Ok::<_, ApiError>(session.catalog().list().to_vec())
    });

    Ok(Json(task.await??))
}
