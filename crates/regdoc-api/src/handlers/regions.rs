use crate::auth::CurrentUser;
use crate::state::DocumentState;
use axum::{extract::State, Json};
use regdoc_core::ALL_REGIONS;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegionsResponse {
    /// Every configured region, in enumeration order
    pub regions: Vec<String>,
    /// Regions the caller's listing covers
    pub accessible: Vec<String>,
    /// Sentinel meaning "no region filter"
    pub all: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/regions",
    tag = "regions",
    responses(
        (status = 200, description = "Configured regions", body = RegionsResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_regions(
    State(docs): State<DocumentState>,
    CurrentUser(user): CurrentUser,
) -> Json<RegionsResponse> {
    Json(RegionsResponse {
        regions: docs.regions.as_slice().to_vec(),
        accessible: docs.lister.regions_for(&user),
        all: ALL_REGIONS.to_string(),
    })
}
