// src/handlers/rbac.rs

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
        rbac::{
            PermPermissionsView, PermRolesCreate, PermRolesDelete, PermRolesEdit, PermRolesView,
            RequirePermission,
        },
    },
    models::{
        rbac::{Permission, PermissionGroup, Role, RolePayload, RoleQuery, RoleSummary},
        user::User,
        Notice,
    },
};

// GET /api/roles?search=&page=
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "RBAC",
    params(RoleQuery),
    responses(
        (status = 200, description = "Cargos com permissões e contagens", body = Page<RoleSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesView>,
    Query(query): Query<RoleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let roles = app_state
        .rbac_service
        .search_roles(query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = i64, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Cargo encontrado", body = RoleSummary),
        (status = 404, description = "Cargo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesView>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .rbac_service
        .get_role(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(role))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = RolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = Notice<RoleSummary>),
        (status = 422, description = "Nome inválido ou permissão desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesCreate>,
    Json(payload): Json<RolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .rbac_service
        .create_role(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "role_created", &[]);
    Ok((StatusCode::CREATED, Json(Notice::new(message, role))))
}

// PUT /api/roles/{id} (a lista de permissões substitui a atual)
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = i64, Path, description = "ID do cargo")),
    request_body = RolePayload,
    responses(
        (status = 200, description = "Cargo atualizado", body = Notice<RoleSummary>),
        (status = 404, description = "Cargo inexistente"),
        (status = 422, description = "Nome inválido ou permissão desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesEdit>,
    Path(id): Path<i64>,
    Json(payload): Json<RolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .rbac_service
        .update_role(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "role_updated", &[]);
    Ok(Json(Notice::new(message, role)))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = i64, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Cargo excluído", body = Notice<Role>),
        (status = 404, description = "Cargo inexistente"),
        (status = 409, description = "Cargo atribuído a usuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesDelete>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .rbac_service
        .delete_role(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "role_deleted", &[("name", role.name.clone())]);
    Ok(Json(Notice::new(message, role)))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/users",
    tag = "RBAC",
    params(("id" = i64, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Usuários com o cargo", body = [User]),
        (status = 404, description = "Cargo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn role_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermRolesView>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .rbac_service
        .users_of(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Todas as permissões", body = [Permission])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPermissionsView>,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .rbac_service
        .list_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(permissions))
}

// GET /api/permissions/grouped (para o frontend montar a tela de atribuição)
#[utoipa::path(
    get,
    path = "/api/permissions/grouped",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permissões agrupadas por módulo", body = [PermissionGroup])
    ),
    security(("api_jwt" = []))
)]
pub async fn grouped_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermPermissionsView>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = app_state
        .rbac_service
        .grouped_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(groups))
}
