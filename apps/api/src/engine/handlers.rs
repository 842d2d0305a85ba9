//! Axum route handlers for inspecting and reloading the fitted model.

use axum::{extract::State, Json};
use tracing::info;

use crate::engine::fitted::{fit_from_path, ModelSummary};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/model
pub async fn handle_model_info(State(state): State<AppState>) -> Json<ModelSummary> {
    Json(state.model.current().summary())
}

/// POST /api/v1/model/reload
///
/// Re-reads the corpus and refits every component, then swaps the new
/// generation in atomically. On failure the current generation keeps serving.
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ModelSummary>, AppError> {
    let _reload = state
        .model
        .try_begin_reload()
        .ok_or_else(|| AppError::Conflict("a model reload is already in progress".to_string()))?;

    let path = state.config.corpus_path.clone();
    let options = state.config.fit_options();
    info!("Reloading model from {}", path.display());

    let model = tokio::task::spawn_blocking(move || fit_from_path(&path, &options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("model fit task failed: {e}")))??;

    let summary = model.summary();
    let previous = state.model.swap(model);
    info!(
        "Model generation {} replaced by {}",
        previous.generation(),
        summary.generation
    );

    Ok(Json(summary))
}
