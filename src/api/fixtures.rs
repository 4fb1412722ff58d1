//! End-to-end test fixtures, mounted only when `fixtures.enabled` is set

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Serialize, ToSchema)]
pub struct SeedResponse {
    pub ok: bool,
    /// IDs of the inserted fixture books
    pub ids: Vec<i64>,
}

/// Wipe all data and load the fixture catalog
#[utoipa::path(
    post,
    path = "/test/seed",
    tag = "fixtures",
    responses(
        (status = 200, description = "Fixture catalog loaded", body = SeedResponse)
    )
)]
pub async fn seed(State(state): State<AppState>) -> AppResult<Json<SeedResponse>> {
    let ids = state.services.seed_fixtures().await?;
    Ok(Json(SeedResponse { ok: true, ids }))
}
