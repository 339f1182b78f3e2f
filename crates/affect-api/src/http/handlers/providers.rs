//! GET /api/providers - Provider chain status.

use axum::Json;
use axum::extract::State;

use affect_types::provider::ProviderStatus;

use crate::state::AppState;

/// GET /api/providers - Enabled/available state of each chain entry, in order.
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    Json(state.analyzer.provider_statuses().await)
}
