// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::common::countries;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Countries ---
        handlers::countries::list_countries,

        // --- Zones ---
        handlers::zones::list_zones,
        handlers::zones::get_zone,
        handlers::zones::create_zone,
        handlers::zones::update_zone,
        handlers::zones::delete_zone,

        // --- Stores ---
        handlers::stores::list_stores,
        handlers::stores::get_store,
        handlers::stores::create_store,
        handlers::stores::update_store,
        handlers::stores::delete_store,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::toggle_active,
        handlers::users::reset_password,

        // --- RBAC ---
        handlers::rbac::list_roles,
        handlers::rbac::get_role,
        handlers::rbac::create_role,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,
        handlers::rbac::role_users,
        handlers::rbac::list_permissions,
        handlers::rbac::grouped_permissions,
    ),
    components(
        schemas(
            countries::Country,

            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,
            models::auth::ChangePasswordPayload,

            // --- Zones & Stores ---
            models::zone::Zone,
            models::zone::ZonePayload,
            models::store::Store,
            models::store::StoreDetail,
            models::store::StoreView,
            models::store::StorePayload,

            // --- Users ---
            models::user::User,
            models::user::UserDetail,
            models::user::UserView,
            models::user::UserProfile,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::ResetPasswordPayload,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::Permission,
            models::rbac::RoleSummary,
            models::rbac::RolePayload,
            models::rbac::PermissionEntry,
            models::rbac::PermissionGroup,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e conta do usuário logado"),
        (name = "Countries", description = "Tabela fixa de países"),
        (name = "Zones", description = "Zonas geográficas"),
        (name = "Stores", description = "Diretório de lojas"),
        (name = "Users", description = "Diretório de usuários"),
        (name = "RBAC", description = "Controle de Acesso (Cargos e Permissões)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
