use axum::{extract::State, Json};

use crate::metrics::{self, LibraryMetrics};
use crate::AppState;

/// GET /metrics
pub async fn get_metrics(State(state): State<AppState>) -> Json<LibraryMetrics> {
    let songs = state.catalog.snapshot().await;
    Json(metrics::compute(&songs))
}
