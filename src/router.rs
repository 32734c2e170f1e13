// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn app_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/login", post(handlers::auth::login));

    // Rotas protegidas: cada handler exige sua própria permissão
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/auth/me/password", put(handlers::auth::change_password))
        .route("/countries", get(handlers::countries::list_countries))
        .route(
            "/zones",
            get(handlers::zones::list_zones).post(handlers::zones::create_zone),
        )
        .route(
            "/zones/{id}",
            get(handlers::zones::get_zone)
                .put(handlers::zones::update_zone)
                .delete(handlers::zones::delete_zone),
        )
        .route(
            "/stores",
            get(handlers::stores::list_stores).post(handlers::stores::create_store),
        )
        .route(
            "/stores/{id}",
            get(handlers::stores::get_store)
                .put(handlers::stores::update_store)
                .delete(handlers::stores::delete_store),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/users/{id}/toggle-active", patch(handlers::users::toggle_active))
        .route("/users/{id}/reset-password", post(handlers::users::reset_password))
        .route(
            "/roles",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route(
            "/roles/{id}",
            get(handlers::rbac::get_role)
                .put(handlers::rbac::update_role)
                .delete(handlers::rbac::delete_role),
        )
        .route("/roles/{id}/users", get(handlers::rbac::role_users))
        .route("/permissions", get(handlers::rbac::list_permissions))
        .route("/permissions/grouped", get(handlers::rbac::grouped_permissions))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
