use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{models::StatsSummary, session::is_valid_profile, AppState};

/// Word-guess statistics for a profile, with derived display figures
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(profile): Path<String>,
) -> Result<Json<StatsSummary>, StatusCode> {
    if !is_valid_profile(&profile) {
        tracing::warn!("Stats requested for invalid profile {:?}", profile);
        return Err(StatusCode::BAD_REQUEST);
    }

    let stats = state.stats.load(&profile).await;
    Ok(Json(stats.summary()))
}
