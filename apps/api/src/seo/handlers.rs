//! Axum route handlers for the SEO API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::seo::{resolve_network, resolve_seo, NetworkSeo, SeoResolution};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveSeoRequest {
    pub content_item_id: Uuid,
    pub tenant_id: Uuid,
}

/// POST /api/v1/seo/resolve
///
/// Title, description, intro, slug and canonical URL for one item as served
/// by one tenant.
pub async fn handle_resolve_seo(
    State(state): State<AppState>,
    Json(request): Json<ResolveSeoRequest>,
) -> Result<Json<SeoResolution>, AppError> {
    let item = state.source.content_item(request.content_item_id).await?;
    let registry = state.source.tenants().await?;
    let tenant = registry
        .get(request.tenant_id)
        .ok_or_else(|| AppError::NotFound(format!("tenant {}", request.tenant_id)))?;

    let resolution = resolve_seo(&item, tenant, &registry, &state.config.canonical_settings());
    Ok(Json(resolution))
}

/// GET /api/v1/seo/:content_item_id/network
pub async fn handle_network_seo(
    State(state): State<AppState>,
    Path(content_item_id): Path<Uuid>,
) -> Result<Json<NetworkSeo>, AppError> {
    let item = state.source.content_item(content_item_id).await?;
    let registry = state.source.tenants().await?;
    Ok(Json(resolve_network(
        &item,
        &registry,
        &state.config.canonical_settings(),
    )))
}
