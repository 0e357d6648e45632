use axum::{extract::State, Json};
use serde_json::Value;

use crate::state::ServerState;

/// Salon configuration document exactly as loaded at startup.
#[utoipa::path(get, path = "/api/config", tag = "salon", responses((status = 200, description = "Configuration document")))]
pub async fn get_config(State(state): State<ServerState>) -> Json<Value> {
    Json(state.salon.raw().clone())
}

/// Configured stylists in order; the first one is the default.
#[utoipa::path(get, path = "/api/stylists", tag = "salon", responses((status = 200, description = "Stylist names")))]
pub async fn get_stylists(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.salon.stylists().to_vec())
}
