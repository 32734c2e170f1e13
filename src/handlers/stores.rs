// src/handlers/stores.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, pagination::Page},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermStoresCreate, PermStoresDelete, PermStoresEdit, PermStoresView, RequirePermission},
    },
    models::{
        store::{Store, StorePayload, StoreQuery, StoreView},
        Notice,
    },
};

// GET /api/stores?search=&country=&zoneId=&sort=&direction=&page=
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    params(StoreQuery),
    responses(
        (status = 200, description = "Página de lojas (10 por página)", body = Page<StoreView>),
        (status = 422, description = "Coluna de ordenação inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStoresView>,
    Query(query): Query<StoreQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .store_service
        .search(query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    tag = "Stores",
    params(("id" = i64, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Loja encontrada", body = StoreView),
        (status = 404, description = "Loja inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_store(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStoresView>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(store))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    request_body = StorePayload,
    responses(
        (status = 201, description = "Loja criada", body = Notice<StoreView>),
        (status = 404, description = "Zona inexistente"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStoresCreate>,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "store_created", &[]);
    Ok((StatusCode::CREATED, Json(Notice::new(message, store))))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    tag = "Stores",
    params(("id" = i64, Path, description = "ID da loja")),
    request_body = StorePayload,
    responses(
        (status = 200, description = "Loja atualizada", body = Notice<StoreView>),
        (status = 404, description = "Loja ou zona inexistente"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStoresEdit>,
    Path(id): Path<i64>,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "store_updated", &[]);
    Ok(Json(Notice::new(message, store)))
}

// DELETE /api/stores/{id} (usuários da loja ficam sem loja)
#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    tag = "Stores",
    params(("id" = i64, Path, description = "ID da loja")),
    responses(
        (status = 200, description = "Loja excluída", body = Notice<Store>),
        (status = 404, description = "Loja inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStoresDelete>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "store_deleted", &[("name", store.name.clone())]);
    Ok(Json(Notice::new(message, store)))
}
