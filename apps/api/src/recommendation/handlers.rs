//! Axum route handlers for badge recommendation.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::badge::BadgeResponse;
use crate::models::skill::skill_set;
use crate::state::AppState;

pub const DEFAULT_BADGE_COUNT: i64 = 5;

fn default_badge_count() -> i64 {
    DEFAULT_BADGE_COUNT
}

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub additional_skills: Option<Vec<String>>,
    #[serde(default = "default_badge_count")]
    pub n: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /predict
///
/// Recommends up to `n` job-title badges for the given skills. When
/// `additionalSkills` is non-empty, only titles that would teach all of them
/// are returned. Blank `additionalSkills` entries are rejected rather than
/// dropped, so a filter is never silently disabled.
pub async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Vec<BadgeResponse>>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?;

    let skills = request
        .skills
        .ok_or_else(|| AppError::Validation("skills is required".to_string()))?;
    let n = usize::try_from(request.n)
        .map_err(|_| AppError::Validation(format!("n must not be negative, got {}", request.n)))?;

    let user_skills = skill_set(&skills);
    if let Some(extra) = &request.additional_skills {
        if extra.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::Validation(
                "additionalSkills entries must not be blank".to_string(),
            ));
        }
    }
    let additional = request.additional_skills.map(|s| skill_set(&s));

    let model = state.model.current();
    let badges = model.recommend(&user_skills, additional.as_ref(), n)?;
    debug!(
        "Recommended {} badges for {} skills (generation {})",
        badges.len(),
        user_skills.len(),
        model.generation()
    );

    Ok(Json(badges.into_iter().map(BadgeResponse::from).collect()))
}
