// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        // As permissões já foram carregadas pelo auth_guard
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        let required_perm = T::slug();
        if !user.can(required_perm) {
            tracing::warn!(user_id = user.user.id, permission = required_perm, "Acesso negado");
            return Err(AppError::Forbidden(required_perm.to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permissions {
    ($($ty:ident => $slug:literal),* $(,)?) => {
        $(
            pub struct $ty;
            impl PermissionDef for $ty {
                fn slug() -> &'static str { $slug }
            }
        )*
    };
}

permissions! {
    PermZonesView => "zones.view",
    PermZonesCreate => "zones.create",
    PermZonesEdit => "zones.edit",
    PermZonesDelete => "zones.delete",
    PermStoresView => "stores.view",
    PermStoresCreate => "stores.create",
    PermStoresEdit => "stores.edit",
    PermStoresDelete => "stores.delete",
    PermUsersView => "users.view",
    PermUsersCreate => "users.create",
    PermUsersEdit => "users.edit",
    PermUsersDelete => "users.delete",
    PermUsersResetPassword => "users.reset-password",
    PermRolesView => "roles.view",
    PermRolesCreate => "roles.create",
    PermRolesEdit => "roles.edit",
    PermRolesDelete => "roles.delete",
    PermPermissionsView => "permissions.view",
}
