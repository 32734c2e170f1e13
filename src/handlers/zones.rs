// src/handlers/zones.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermZonesCreate, PermZonesDelete, PermZonesEdit, PermZonesView, RequirePermission},
    },
    models::{
        zone::{Zone, ZonePayload},
        Notice,
    },
};

// GET /api/zones
#[utoipa::path(
    get,
    path = "/api/zones",
    tag = "Zones",
    responses(
        (status = 200, description = "Zonas ordenadas por nome", body = [Zone])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_zones(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermZonesView>,
) -> Result<impl IntoResponse, ApiError> {
    let zones = app_state
        .zone_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(zones))
}

// GET /api/zones/{id}
#[utoipa::path(
    get,
    path = "/api/zones/{id}",
    tag = "Zones",
    params(("id" = i64, Path, description = "ID da zona")),
    responses(
        (status = 200, description = "Zona encontrada", body = Zone),
        (status = 404, description = "Zona inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermZonesView>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .zone_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(zone))
}

// POST /api/zones
#[utoipa::path(
    post,
    path = "/api/zones",
    tag = "Zones",
    request_body = ZonePayload,
    responses(
        (status = 201, description = "Zona criada", body = Notice<Zone>),
        (status = 422, description = "Nome vazio, longo demais ou repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermZonesCreate>,
    Json(payload): Json<ZonePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .zone_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "zone_created", &[]);
    Ok((StatusCode::CREATED, Json(Notice::new(message, zone))))
}

// PUT /api/zones/{id}
#[utoipa::path(
    put,
    path = "/api/zones/{id}",
    tag = "Zones",
    params(("id" = i64, Path, description = "ID da zona")),
    request_body = ZonePayload,
    responses(
        (status = 200, description = "Zona atualizada", body = Notice<Zone>),
        (status = 404, description = "Zona inexistente"),
        (status = 422, description = "Nome vazio, longo demais ou repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermZonesEdit>,
    Path(id): Path<i64>,
    Json(payload): Json<ZonePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .zone_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "zone_updated", &[]);
    Ok(Json(Notice::new(message, zone)))
}

// DELETE /api/zones/{id}
#[utoipa::path(
    delete,
    path = "/api/zones/{id}",
    tag = "Zones",
    params(("id" = i64, Path, description = "ID da zona")),
    responses(
        (status = 200, description = "Zona excluída", body = Notice<Zone>),
        (status = 404, description = "Zona inexistente"),
        (status = 409, description = "Zona ainda usada por lojas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermZonesDelete>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .zone_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "zone_deleted", &[("name", zone.name.clone())]);
    Ok(Json(Notice::new(message, zone)))
}
