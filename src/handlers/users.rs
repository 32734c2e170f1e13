// src/handlers/users.rs

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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{
            PermUsersCreate, PermUsersDelete, PermUsersEdit, PermUsersResetPassword, PermUsersView,
            RequirePermission,
        },
    },
    models::{
        user::{CreateUserPayload, ResetPasswordPayload, UpdateUserPayload, User, UserQuery, UserView},
        Notice,
    },
};

// GET /api/users?search=&status=&role=&storeId=&page=
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(UserQuery),
    responses(
        (status = 200, description = "Página de usuários, mais recentes primeiro", body = Page<UserView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersView>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .user_service
        .search(query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário encontrado", body = UserView),
        (status = 404, description = "Usuário inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersView>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = Notice<UserView>),
        (status = 422, description = "Dados inválidos ou e-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersCreate>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "user_created", &[]);
    Ok((StatusCode::CREATED, Json(Notice::new(message, user))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = Notice<UserView>),
        (status = 404, description = "Usuário inexistente"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersEdit>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "user_updated", &[]);
    Ok(Json(Notice::new(message, user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário excluído", body = Notice<User>),
        (status = 404, description = "Usuário inexistente"),
        (status = 409, description = "Tentativa de excluir a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: AuthenticatedUser,
    _guard: RequirePermission<PermUsersDelete>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .delete(&actor, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "user_deleted", &[("name", user.name.clone())]);
    Ok(Json(Notice::new(message, user)))
}

// PATCH /api/users/{id}/toggle-active
// A permissão depende do sentido da troca, por isso é checada no serviço.
#[utoipa::path(
    patch,
    path = "/api/users/{id}/toggle-active",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Status invertido", body = Notice<UserView>),
        (status = 403, description = "Falta users.activate ou users.deactivate"),
        (status = 409, description = "Tentativa de desativar a própria conta ou status alterado por outra requisição")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_active(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .toggle_active(&actor, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let key = if user.detail.user.is_active { "user_activated" } else { "user_deactivated" };
    let message = app_state.i18n_store.translate(&locale.0, key, &[]);
    Ok(Json(Notice::new(message, user)))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/reset-password",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = Notice<UserView>),
        (status = 404, description = "Usuário inexistente"),
        (status = 422, description = "Senha curta ou confirmação diferente")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersResetPassword>,
    Path(id): Path<i64>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .reset_password(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "password_updated", &[]);
    Ok(Json(Notice::new(message, user)))
}
