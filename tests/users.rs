mod common;

use std::sync::Arc;

use async_trait::async_trait;

use backoffice::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
        permissions::SUPER_ADMIN_ROLE,
    },
    config::AdminBootstrap,
    db::UserRepository,
    models::{
        store::StorePayload,
        user::{
            CreateUserPayload, NewUser, ResetPasswordPayload, UpdateUserPayload, User, UserChanges,
            UserDetail, UserFilter, UserProfile, UserQuery, UserView,
        },
        zone::ZonePayload,
    },
    services::{password::verify_password, user_service::UserService},
    AppState,
};
use common::{actor, app_state, MemoryBackend, TEST_BCRYPT_COST};

fn new_user(name: &str, email: &str, role: Option<&str>) -> CreateUserPayload {
    CreateUserPayload {
        name: name.to_string(),
        email: email.to_string(),
        password: "abcdefgh".to_string(),
        password_confirmation: Some("abcdefgh".to_string()),
        profile: UserProfile::default(),
        role: role.map(str::to_string),
        is_active: true,
    }
}

fn update_from(view: &UserView) -> UpdateUserPayload {
    let user = &view.detail.user;
    UpdateUserPayload {
        name: user.name.clone(),
        email: user.email.clone(),
        password: None,
        password_confirmation: None,
        profile: UserProfile {
            store_id: user.store_id,
            city: user.city.clone(),
            country: user.country.clone(),
            ..Default::default()
        },
        role: view.detail.role_name.clone(),
        is_active: None,
    }
}

async fn seeded() -> (MemoryBackend, AppState) {
    let backend = MemoryBackend::new();
    let state = app_state(&backend);
    state.rbac_service.seed_defaults().await.unwrap();
    (backend, state)
}

#[tokio::test]
async fn create_assigns_role_and_derived_fields() {
    let (_, state) = seeded().await;
    let mut payload = new_user("Ana maría Lopez", "ana@example.com", Some("Supervisor"));
    payload.profile.city = Some("Lima".into());
    payload.profile.country = Some("PER".into());

    let user = state.user_service.create(payload).await.unwrap();
    assert!(user.detail.user.is_active);
    assert_eq!(user.detail.role_name.as_deref(), Some("Supervisor"));
    assert_eq!(user.formatted_id.len(), 6);
    // Iniciais respeitam a caixa do nome
    assert_eq!(user.initials, "Am");
    assert_eq!(user.country_name.as_deref(), Some("Perú"));
    assert_eq!(user.full_address, "Lima, Perú");
    assert_ne!(user.detail.user.password_hash, "abcdefgh");
}

#[tokio::test]
async fn email_is_unique_ignoring_case() {
    let (_, state) = seeded().await;
    state.user_service.create(new_user("Ana", "ana@example.com", None)).await.unwrap();

    let err = state
        .user_service
        .create(new_user("Otra Ana", "ANA@Example.com", None))
        .await
        .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["email"]);
}

#[tokio::test]
async fn unknown_role_and_store_are_field_errors() {
    let (backend, state) = seeded().await;

    let err = state.user_service.create(new_user("Ana", "ana@example.com", Some("Astronauta"))).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["role"]);

    let mut payload = new_user("Ana", "ana@example.com", None);
    payload.profile.store_id = Some(404);
    let err = state.user_service.create(payload).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["store_id"]);

    assert_eq!(backend.user_count(), 0);
}

#[tokio::test]
async fn password_rules_are_enforced_on_create() {
    let (_, state) = seeded().await;

    let mut payload = new_user("Ana", "ana@example.com", None);
    payload.password_confirmation = Some("abcdefgX".into());
    let err = state.user_service.create(payload).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["password"]);

    let mut payload = new_user("Ana", "ana@example.com", None);
    payload.password = "abc".into();
    payload.password_confirmation = Some("abc".into());
    assert!(state.user_service.create(payload).await.is_err());
}

#[tokio::test]
async fn update_keeps_password_when_blank() {
    let (backend, state) = seeded().await;
    let user = state.user_service.create(new_user("Ana", "ana@example.com", Some("Empleado"))).await.unwrap();
    let id = user.detail.user.id;
    let original_hash = backend.password_hash(id);

    let mut changes = update_from(&user);
    changes.name = "Ana Lopez".into();
    let updated = state.user_service.update(id, changes).await.unwrap();
    assert_eq!(updated.detail.user.name, "Ana Lopez");
    assert_eq!(backend.password_hash(id), original_hash);

    let mut changes = update_from(&updated);
    changes.password = Some("nova-senha-123".into());
    changes.password_confirmation = Some("nova-senha-123".into());
    state.user_service.update(id, changes).await.unwrap();
    assert!(verify_password("nova-senha-123", &backend.password_hash(id)).await.unwrap());
}

#[tokio::test]
async fn active_flag_is_honored_on_create_and_update() {
    let (_, state) = seeded().await;
    let mut payload = new_user("Ana", "ana@example.com", None);
    payload.is_active = false;
    let ana = state.user_service.create(payload).await.unwrap();
    let id = ana.detail.user.id;
    assert!(!ana.detail.user.is_active);
    assert!(!state.user_service.get(id).await.unwrap().detail.user.is_active);

    // Sem o campo, o status fica como está
    let mut changes = update_from(&ana);
    changes.name = "Ana Lopez".into();
    let updated = state.user_service.update(id, changes).await.unwrap();
    assert!(!updated.detail.user.is_active);

    let mut changes = update_from(&updated);
    changes.is_active = Some(true);
    let updated = state.user_service.update(id, changes).await.unwrap();
    assert!(updated.detail.user.is_active);

    let mut changes = update_from(&updated);
    changes.is_active = Some(false);
    assert!(!state.user_service.update(id, changes).await.unwrap().detail.user.is_active);
}

#[tokio::test]
async fn update_replaces_the_single_role() {
    let (backend, state) = seeded().await;
    let user = state.user_service.create(new_user("Ana", "ana@example.com", Some("Empleado"))).await.unwrap();
    let id = user.detail.user.id;

    let mut changes = update_from(&user);
    changes.role = Some("Supervisor".into());
    let updated = state.user_service.update(id, changes).await.unwrap();
    assert_eq!(updated.detail.role_name.as_deref(), Some("Supervisor"));
    assert_eq!(backend.role_of(id).as_deref(), Some("Supervisor"));

    let mut changes = update_from(&updated);
    changes.role = None;
    let updated = state.user_service.update(id, changes).await.unwrap();
    assert_eq!(updated.detail.role_name, None);
}

#[tokio::test]
async fn update_rejects_email_of_another_user() {
    let (_, state) = seeded().await;
    state.user_service.create(new_user("Ana", "ana@example.com", None)).await.unwrap();
    let beto = state.user_service.create(new_user("Beto", "beto@example.com", None)).await.unwrap();

    let mut changes = update_from(&beto);
    changes.email = "Ana@example.com".into();
    let err = state.user_service.update(beto.detail.user.id, changes).await.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["email"]);

    // Mudar só a caixa do próprio e-mail é permitido
    let mut changes = update_from(&beto);
    changes.email = "BETO@example.com".into();
    assert!(state.user_service.update(beto.detail.user.id, changes).await.is_ok());
}

#[tokio::test]
async fn search_filters_and_orders_newest_first() {
    let (backend, state) = seeded().await;
    let zone = state.zone_service.create(ZonePayload::new("Norte")).await.unwrap();
    let store = state
        .store_service
        .create(StorePayload {
            name: "Tienda A".into(),
            country: "MEX".into(),
            zone_id: Some(zone.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let ana = state.user_service.create(new_user("Ana", "ana@example.com", Some("Supervisor"))).await.unwrap();
    let beto = state.user_service.create(new_user("Beto", "beto@example.com", Some("Empleado"))).await.unwrap();
    let mut carla = new_user("Carla", "carla@tiendas.mx", Some("Supervisor"));
    carla.profile.store_id = Some(store.detail.store.id);
    let carla = state.user_service.create(carla).await.unwrap();

    backend.backdate_user(ana.detail.user.id, 30);
    backend.backdate_user(beto.detail.user.id, 20);
    backend.backdate_user(carla.detail.user.id, 10);

    let actor = actor(backend.user_by_id(ana.detail.user.id).unwrap(), &["users.deactivate"]);
    state.user_service.toggle_active(&actor, beto.detail.user.id).await.unwrap();

    let names = |page: Page<UserView>| -> Vec<String> {
        page.items.into_iter().map(|u| u.detail.user.name).collect()
    };

    let all = state.user_service.search(UserQuery::default()).await.unwrap();
    assert_eq!(names(all), vec!["Carla", "Beto", "Ana"]);

    let query = UserQuery { role: Some("Supervisor".into()), ..Default::default() };
    assert_eq!(names(state.user_service.search(query).await.unwrap()), vec!["Carla", "Ana"]);

    let query = UserQuery { status: Some("inactive".into()), ..Default::default() };
    assert_eq!(names(state.user_service.search(query).await.unwrap()), vec!["Beto"]);

    let query = UserQuery { status: Some("active".into()), search: Some("TIENDAS".into()), ..Default::default() };
    assert_eq!(names(state.user_service.search(query).await.unwrap()), vec!["Carla"]);

    let query = UserQuery { store_id: Some(store.detail.store.id), ..Default::default() };
    assert_eq!(names(state.user_service.search(query).await.unwrap()), vec!["Carla"]);

    let query = UserQuery { status: Some("blocked".into()), ..Default::default() };
    assert_eq!(state.user_service.search(query).await.unwrap_err().invalid_fields(), vec!["status"]);
}

#[tokio::test]
async fn toggle_needs_the_matching_permission() {
    let (backend, state) = seeded().await;
    let admin = state.user_service.create(new_user("Admin", "admin@example.com", None)).await.unwrap();
    let ana = state.user_service.create(new_user("Ana", "ana@example.com", None)).await.unwrap();
    let admin = backend.user_by_id(admin.detail.user.id).unwrap();
    let ana_id = ana.detail.user.id;

    let only_activate = actor(admin.clone(), &["users.activate"]);
    match state.user_service.toggle_active(&only_activate, ana_id).await {
        Err(AppError::Forbidden(permission)) => assert_eq!(permission, "users.deactivate"),
        other => panic!("esperava Forbidden, veio {other:?}"),
    }

    let only_deactivate = actor(admin.clone(), &["users.deactivate"]);
    let off = state.user_service.toggle_active(&only_deactivate, ana_id).await.unwrap();
    assert!(!off.detail.user.is_active);

    match state.user_service.toggle_active(&only_deactivate, ana_id).await {
        Err(AppError::Forbidden(permission)) => assert_eq!(permission, "users.activate"),
        other => panic!("esperava Forbidden, veio {other:?}"),
    }

    let on = state.user_service.toggle_active(&only_activate, ana_id).await.unwrap();
    assert!(on.detail.user.is_active);
}

// Repositório que muda o status logo depois da leitura, como se outra
// requisição tivesse gravado entre a leitura e a escrita do toggle.
struct ConcurrentWriter {
    inner: MemoryBackend,
}

#[async_trait]
impl UserRepository for ConcurrentWriter {
    async fn search(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<UserDetail>, AppError> {
        self.inner.search(filter, page).await
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<UserDetail>, AppError> {
        let found = UserRepository::find_by_id(&self.inner, id).await?;
        if let Some(detail) = &found {
            self.inner.set_active(id, !detail.user.is_active).await?;
        }
        Ok(found)
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.inner.find_by_email(email).await
    }
    async fn create(&self, input: &NewUser) -> Result<UserDetail, AppError> {
        UserRepository::create(&self.inner, input).await
    }
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserDetail, AppError> {
        UserRepository::update(&self.inner, id, changes).await
    }
    async fn set_active(&self, id: i64, active: bool) -> Result<UserDetail, AppError> {
        self.inner.set_active(id, active).await
    }
    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        self.inner.set_password(id, password_hash).await
    }
    async fn record_login(&self, id: i64) -> Result<(), AppError> {
        self.inner.record_login(id).await
    }
    async fn delete(&self, id: i64) -> Result<User, AppError> {
        UserRepository::delete(&self.inner, id).await
    }
}

#[tokio::test]
async fn toggle_does_not_overwrite_a_concurrent_change() {
    let (backend, state) = seeded().await;
    let admin = state.user_service.create(new_user("Admin", "admin@example.com", None)).await.unwrap();
    let ana = state.user_service.create(new_user("Ana", "ana@example.com", None)).await.unwrap();
    let ana_id = ana.detail.user.id;
    let me = actor(backend.user_by_id(admin.detail.user.id).unwrap(), &["users.activate", "users.deactivate"]);

    let racing = UserService::new(Arc::new(ConcurrentWriter { inner: backend.clone() }), TEST_BCRYPT_COST);
    // Leu ativo, mas a outra escrita já desativou: nada é sobrescrito
    let err = racing.toggle_active(&me, ana_id).await.unwrap_err();
    assert!(matches!(err, AppError::StatusChanged));
    assert!(!backend.user_by_id(ana_id).unwrap().is_active);

    // Escrita direta para o status que já está gravado também é rejeitada
    let err = backend.set_active(ana_id, false).await.unwrap_err();
    assert!(matches!(err, AppError::StatusChanged));
    assert!(matches!(backend.set_active(999, true).await, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn users_cannot_delete_or_deactivate_themselves() {
    let (backend, state) = seeded().await;
    let admin = state.user_service.create(new_user("Admin", "admin@example.com", None)).await.unwrap();
    let admin_id = admin.detail.user.id;
    let me = actor(backend.user_by_id(admin_id).unwrap(), &["users.delete", "users.deactivate"]);

    assert!(matches!(state.user_service.delete(&me, admin_id).await, Err(AppError::SelfModification)));
    assert!(matches!(state.user_service.toggle_active(&me, admin_id).await, Err(AppError::SelfModification)));
    assert!(state.user_service.get(admin_id).await.unwrap().detail.user.is_active);
}

#[tokio::test]
async fn delete_removes_user_and_role_assignment() {
    let (backend, state) = seeded().await;
    let admin = state.user_service.create(new_user("Admin", "admin@example.com", None)).await.unwrap();
    let ana = state.user_service.create(new_user("Ana", "ana@example.com", Some("Supervisor"))).await.unwrap();
    let me = actor(backend.user_by_id(admin.detail.user.id).unwrap(), &["users.delete"]);

    let deleted = state.user_service.delete(&me, ana.detail.user.id).await.unwrap();
    assert_eq!(deleted.name, "Ana");
    assert_eq!(backend.role_of(ana.detail.user.id), None);
    assert!(matches!(state.user_service.get(ana.detail.user.id).await, Err(AppError::UserNotFound)));
    assert!(matches!(state.user_service.delete(&me, 999).await, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn reset_password_replaces_the_hash() {
    let (backend, state) = seeded().await;
    let ana = state.user_service.create(new_user("Ana", "ana@example.com", None)).await.unwrap();
    let id = ana.detail.user.id;

    let err = state
        .user_service
        .reset_password(id, ResetPasswordPayload { password: "short".into(), password_confirmation: Some("short".into()) })
        .await
        .unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["password"]);

    let payload = ResetPasswordPayload {
        password: "outra-senha-1".into(),
        password_confirmation: Some("outra-senha-1".into()),
    };
    state.user_service.reset_password(id, payload.clone()).await.unwrap();
    assert!(verify_password("outra-senha-1", &backend.password_hash(id)).await.unwrap());
    assert!(!verify_password("abcdefgh", &backend.password_hash(id)).await.unwrap());

    assert!(matches!(state.user_service.reset_password(999, payload).await, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn bootstrap_admin_runs_once() {
    let (backend, state) = seeded().await;
    let admin = AdminBootstrap {
        name: "Administrador".into(),
        email: "root@example.com".into(),
        password: "trocar-esta-senha".into(),
    };

    assert!(state.user_service.bootstrap_admin(&admin).await.unwrap());
    assert!(!state.user_service.bootstrap_admin(&admin).await.unwrap());
    assert_eq!(backend.user_count(), 1);

    let created = state.user_service.search(UserQuery::default()).await.unwrap();
    assert_eq!(created.items[0].detail.role_name.as_deref(), Some(SUPER_ADMIN_ROLE));
}
