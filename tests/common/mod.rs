// Backend em memória para os testes de integração. Aplica as mesmas regras
// que o schema SQL: nomes e e-mails únicos, FK restrict/set null, cargo único
// por usuário e bloqueio de exclusão de cargos e zonas em uso.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use backoffice::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    config::{AppState, SecuritySettings},
    db::{RbacRepository, Repositories, StoreRepository, UserRepository, ZoneRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        rbac::{Permission, Role, RoleSummary},
        store::{SortDirection, Store, StoreDetail, StoreFilter, StoreInput, StoreSortColumn},
        user::{NewUser, User, UserChanges, UserDetail, UserFilter},
        zone::Zone,
    },
};

pub const JWT_SECRET: &str = "segredo-de-teste";

// Custo mínimo aceito pelo bcrypt, para os testes não ficarem lentos.
pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
struct Tables {
    zones: Vec<Zone>,
    stores: Vec<Store>,
    users: Vec<User>,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    role_permissions: BTreeSet<(i64, i64)>,
    // user_id -> role_id (UNIQUE(user_id))
    user_roles: BTreeMap<i64, i64>,
    seq: BTreeMap<&'static str, i64>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let id = self.seq.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn zone(&self, id: i64) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    fn store_detail(&self, store: &Store) -> StoreDetail {
        StoreDetail {
            zone_name: self.zone(store.zone_id).map(|z| z.name.clone()).unwrap_or_default(),
            store: store.clone(),
        }
    }

    fn role_of(&self, user_id: i64) -> Option<&Role> {
        let role_id = self.user_roles.get(&user_id)?;
        self.roles.iter().find(|r| r.id == *role_id)
    }

    fn user_detail(&self, user: &User) -> UserDetail {
        UserDetail {
            role_name: self.role_of(user.id).map(|r| r.name.clone()),
            store_name: user
                .store_id
                .and_then(|id| self.stores.iter().find(|s| s.id == id))
                .map(|s| s.name.clone()),
            user: user.clone(),
        }
    }

    fn role_summary(&self, role: &Role) -> RoleSummary {
        let mut permissions: Vec<String> = self
            .role_permissions
            .iter()
            .filter(|(role_id, _)| *role_id == role.id)
            .filter_map(|(_, pid)| self.permissions.iter().find(|p| p.id == *pid))
            .map(|p| p.name.clone())
            .collect();
        permissions.sort();
        RoleSummary {
            id: role.id,
            name: role.name.clone(),
            permissions_count: permissions.len() as i64,
            permissions,
            users_count: self.user_roles.values().filter(|r| **r == role.id).count() as i64,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }

    fn resolve_permissions(&self, names: &[String]) -> Result<Vec<i64>, AppError> {
        names
            .iter()
            .map(|name| {
                self.permissions
                    .iter()
                    .find(|p| &p.name == name)
                    .map(|p| p.id)
                    .ok_or_else(|| AppError::field("permissions", "invalid_permission"))
            })
            .collect()
    }

    fn resolve_role(&self, name: Option<&str>) -> Result<Option<i64>, AppError> {
        match name {
            None => Ok(None),
            Some(name) => self
                .roles
                .iter()
                .find(|r| r.name == name)
                .map(|r| Some(r.id))
                .ok_or_else(|| AppError::field("role", "invalid_role")),
        }
    }

    fn check_store(&self, store_id: Option<i64>) -> Result<(), AppError> {
        match store_id {
            Some(id) if !self.stores.iter().any(|s| s.id == id) => {
                Err(AppError::field("store_id", "invalid_store"))
            }
            _ => Ok(()),
        }
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        let email = email.to_lowercase();
        self.users
            .iter()
            .any(|u| u.email.to_lowercase() == email && Some(u.id) != except)
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let slice = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(slice, total, page)
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

// Postgres: NULLs por último em ASC, primeiro em DESC
fn cmp_nullable(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            zones: Arc::new(self.clone()),
            stores: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            rbac: Arc::new(self.clone()),
        }
    }

    // --- Inspeção para asserções ---

    pub fn permission_count(&self) -> usize {
        self.lock().permissions.len()
    }

    pub fn role_count(&self) -> usize {
        self.lock().roles.len()
    }

    pub fn grant_count(&self) -> usize {
        self.lock().role_permissions.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn password_hash(&self, user_id: i64) -> String {
        let tables = self.lock();
        tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.password_hash.clone())
            .unwrap_or_default()
    }

    pub fn role_of(&self, user_id: i64) -> Option<String> {
        self.lock().role_of(user_id).map(|r| r.name.clone())
    }

    pub fn user_by_id(&self, user_id: i64) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == user_id).cloned()
    }

    /// Envelhece o registro para testes de ordenação.
    pub fn backdate_user(&self, user_id: i64, minutes: i64) {
        let mut tables = self.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.created_at -= Duration::minutes(minutes);
        }
    }
}

pub fn security() -> SecuritySettings {
    SecuritySettings {
        jwt_secret: JWT_SECRET.to_string(),
        jwt_ttl: Duration::hours(1),
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

/// Estado completo da aplicação sobre o backend em memória.
pub fn app_state(backend: &MemoryBackend) -> AppState {
    AppState::new(backend.repositories(), security())
}

/// Ator autenticado com as permissões informadas.
pub fn actor(user: User, permissions: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        user,
        role: None,
        permissions: permissions.iter().map(|p| p.to_string()).collect::<HashSet<_>>(),
    }
}

#[async_trait]
impl ZoneRepository for MemoryBackend {
    async fn list(&self) -> Result<Vec<Zone>, AppError> {
        let mut zones = self.lock().zones.clone();
        zones.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(zones)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>, AppError> {
        Ok(self.lock().zone(id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Zone, AppError> {
        let mut tables = self.lock();
        if tables.zones.iter().any(|z| z.name == name) {
            return Err(AppError::field("name", "unique_name"));
        }
        let now = Utc::now();
        let zone = Zone {
            id: tables.next_id("zones"),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.zones.push(zone.clone());
        Ok(zone)
    }

    async fn update(&self, id: i64, name: &str) -> Result<Zone, AppError> {
        let mut tables = self.lock();
        if tables.zone(id).is_none() {
            return Err(AppError::ZoneNotFound);
        }
        if tables.zones.iter().any(|z| z.name == name && z.id != id) {
            return Err(AppError::field("name", "unique_name"));
        }
        let zone = tables
            .zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or(AppError::ZoneNotFound)?;
        zone.name = name.to_string();
        zone.updated_at = Utc::now();
        Ok(zone.clone())
    }

    async fn delete(&self, id: i64) -> Result<Zone, AppError> {
        let mut tables = self.lock();
        let zone = tables.zone(id).cloned().ok_or(AppError::ZoneNotFound)?;
        let stores = tables.stores.iter().filter(|s| s.zone_id == id).count() as i64;
        if stores > 0 {
            return Err(AppError::ZoneInUse { name: zone.name, stores });
        }
        tables.zones.retain(|z| z.id != id);
        Ok(zone)
    }
}

#[async_trait]
impl StoreRepository for MemoryBackend {
    async fn search(&self, filter: &StoreFilter, page: PageRequest) -> Result<Page<StoreDetail>, AppError> {
        let tables = self.lock();
        let mut stores: Vec<Store> = tables
            .stores
            .iter()
            .filter(|s| match &filter.search {
                Some(term) => {
                    contains(Some(s.name.as_str()), term)
                        || contains(s.supervisor.as_deref(), term)
                        || contains(s.email.as_deref(), term)
                        || contains(s.city.as_deref(), term)
                        || contains(s.address.as_deref(), term)
                        || contains(s.office_number.as_deref(), term)
                }
                None => true,
            })
            .filter(|s| filter.country.as_ref().is_none_or(|c| &s.country == c))
            .filter(|s| filter.zone_id.is_none_or(|z| s.zone_id == z))
            .cloned()
            .collect();

        stores.sort_by(|a, b| {
            let ord = match filter.sort {
                StoreSortColumn::Name => a.name.cmp(&b.name),
                StoreSortColumn::OfficeNumber => cmp_nullable(a.office_number.as_deref(), b.office_number.as_deref()),
                StoreSortColumn::City => cmp_nullable(a.city.as_deref(), b.city.as_deref()),
                StoreSortColumn::Country => a.country.cmp(&b.country),
                StoreSortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let ord = match filter.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        });

        let details = stores.iter().map(|s| tables.store_detail(s)).collect();
        Ok(paginate(details, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoreDetail>, AppError> {
        let tables = self.lock();
        Ok(tables.stores.iter().find(|s| s.id == id).map(|s| tables.store_detail(s)))
    }

    async fn create(&self, input: &StoreInput) -> Result<StoreDetail, AppError> {
        let mut tables = self.lock();
        if tables.zone(input.zone_id).is_none() {
            return Err(AppError::ZoneNotFound);
        }
        let now = Utc::now();
        let store = Store {
            id: tables.next_id("stores"),
            office_number: input.office_number.clone(),
            name: input.name.clone(),
            supervisor: input.supervisor.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            mobile: input.mobile.clone(),
            address: input.address.clone(),
            address_2: input.address_2.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            postal_code: input.postal_code.clone(),
            country: input.country.clone(),
            zone_id: input.zone_id,
            created_at: now,
            updated_at: now,
        };
        tables.stores.push(store.clone());
        Ok(tables.store_detail(&store))
    }

    async fn update(&self, id: i64, input: &StoreInput) -> Result<StoreDetail, AppError> {
        let mut tables = self.lock();
        if tables.zone(input.zone_id).is_none() {
            return Err(AppError::ZoneNotFound);
        }
        let store = tables
            .stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::StoreNotFound)?;
        store.office_number = input.office_number.clone();
        store.name = input.name.clone();
        store.supervisor = input.supervisor.clone();
        store.email = input.email.clone();
        store.phone = input.phone.clone();
        store.mobile = input.mobile.clone();
        store.address = input.address.clone();
        store.address_2 = input.address_2.clone();
        store.city = input.city.clone();
        store.state = input.state.clone();
        store.postal_code = input.postal_code.clone();
        store.country = input.country.clone();
        store.zone_id = input.zone_id;
        store.updated_at = Utc::now();
        let store = store.clone();
        Ok(tables.store_detail(&store))
    }

    async fn delete(&self, id: i64) -> Result<Store, AppError> {
        let mut tables = self.lock();
        let store = tables
            .stores
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(AppError::StoreNotFound)?;
        tables.stores.retain(|s| s.id != id);
        // ON DELETE SET NULL
        for user in tables.users.iter_mut().filter(|u| u.store_id == Some(id)) {
            user.store_id = None;
        }
        Ok(store)
    }
}

#[async_trait]
impl UserRepository for MemoryBackend {
    async fn search(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<UserDetail>, AppError> {
        let tables = self.lock();
        let mut users: Vec<UserDetail> = tables
            .users
            .iter()
            .map(|u| tables.user_detail(u))
            .filter(|d| match &filter.search {
                Some(term) => contains(Some(d.user.name.as_str()), term) || contains(Some(d.user.email.as_str()), term),
                None => true,
            })
            .filter(|d| filter.status.is_active().is_none_or(|active| d.user.is_active == active))
            .filter(|d| filter.role.as_ref().is_none_or(|role| d.role_name.as_ref() == Some(role)))
            .filter(|d| filter.store_id.is_none_or(|store| d.user.store_id == Some(store)))
            .collect();

        users.sort_by(|a, b| {
            b.user
                .created_at
                .cmp(&a.user.created_at)
                .then(b.user.id.cmp(&a.user.id))
        });
        Ok(paginate(users, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserDetail>, AppError> {
        let tables = self.lock();
        Ok(tables.users.iter().find(|u| u.id == id).map(|u| tables.user_detail(u)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn create(&self, input: &NewUser) -> Result<UserDetail, AppError> {
        let mut tables = self.lock();
        let role_id = tables.resolve_role(input.role.as_deref())?;
        tables.check_store(input.profile.store_id)?;
        if tables.email_taken(&input.email, None) {
            return Err(AppError::field("email", "unique_email"));
        }

        let now = Utc::now();
        let p = &input.profile;
        let user = User {
            id: tables.next_id("users"),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            phone: p.phone.clone(),
            mobile: p.mobile.clone(),
            store_id: p.store_id,
            address: p.address.clone(),
            address_2: p.address_2.clone(),
            city: p.city.clone(),
            state: p.state.clone(),
            postal_code: p.postal_code.clone(),
            country: p.country.clone(),
            is_active: input.is_active,
            last_login_at: None,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        if let Some(role_id) = role_id {
            tables.user_roles.insert(user.id, role_id);
        }
        Ok(tables.user_detail(&user))
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserDetail, AppError> {
        let mut tables = self.lock();
        let role_id = tables.resolve_role(changes.role.as_deref())?;
        tables.check_store(changes.profile.store_id)?;
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(AppError::UserNotFound);
        }
        if tables.email_taken(&changes.email, Some(id)) {
            return Err(AppError::field("email", "unique_email"));
        }

        let p = &changes.profile;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        user.phone = p.phone.clone();
        user.mobile = p.mobile.clone();
        user.store_id = p.store_id;
        user.address = p.address.clone();
        user.address_2 = p.address_2.clone();
        user.city = p.city.clone();
        user.state = p.state.clone();
        user.postal_code = p.postal_code.clone();
        user.country = p.country.clone();
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        user.updated_at = Utc::now();
        let user = user.clone();

        match role_id {
            Some(role_id) => tables.user_roles.insert(id, role_id),
            None => tables.user_roles.remove(&id),
        };
        Ok(tables.user_detail(&user))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<UserDetail, AppError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        // Mesma condição do UPDATE ... WHERE is_active <> $2
        if user.is_active == active {
            return Err(AppError::StatusChanged);
        }
        user.is_active = active;
        user.updated_at = Utc::now();
        let user = user.clone();
        Ok(tables.user_detail(&user))
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn record_login(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<User, AppError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::UserNotFound)?;
        tables.users.retain(|u| u.id != id);
        tables.user_roles.remove(&id);
        Ok(user)
    }
}

#[async_trait]
impl RbacRepository for MemoryBackend {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let mut permissions = self.lock().permissions.clone();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn search_roles(&self, search: Option<&str>, page: PageRequest) -> Result<Page<RoleSummary>, AppError> {
        let tables = self.lock();
        let mut roles: Vec<&Role> = tables
            .roles
            .iter()
            .filter(|r| search.is_none_or(|term| contains(Some(r.name.as_str()), term)))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        let summaries = roles.into_iter().map(|r| tables.role_summary(r)).collect();
        Ok(paginate(summaries, page))
    }

    async fn find_role(&self, id: i64) -> Result<Option<RoleSummary>, AppError> {
        let tables = self.lock();
        Ok(tables.roles.iter().find(|r| r.id == id).map(|r| tables.role_summary(r)))
    }

    async fn create_role(&self, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError> {
        let mut tables = self.lock();
        let permission_ids = tables.resolve_permissions(permissions)?;
        if tables.roles.iter().any(|r| r.name == name) {
            return Err(AppError::field("name", "unique_name"));
        }
        let now = Utc::now();
        let role = Role {
            id: tables.next_id("roles"),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.roles.push(role.clone());
        for pid in permission_ids {
            tables.role_permissions.insert((role.id, pid));
        }
        Ok(tables.role_summary(&role))
    }

    async fn update_role(&self, id: i64, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError> {
        let mut tables = self.lock();
        let permission_ids = tables.resolve_permissions(permissions)?;
        if !tables.roles.iter().any(|r| r.id == id) {
            return Err(AppError::RoleNotFound);
        }
        if tables.roles.iter().any(|r| r.name == name && r.id != id) {
            return Err(AppError::field("name", "unique_name"));
        }
        let role = tables
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::RoleNotFound)?;
        role.name = name.to_string();
        role.updated_at = Utc::now();
        let role = role.clone();

        tables.role_permissions.retain(|(role_id, _)| *role_id != id);
        for pid in permission_ids {
            tables.role_permissions.insert((id, pid));
        }
        Ok(tables.role_summary(&role))
    }

    async fn delete_role(&self, id: i64) -> Result<Role, AppError> {
        let mut tables = self.lock();
        let role = tables
            .roles
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(AppError::RoleNotFound)?;
        let users = tables.user_roles.values().filter(|r| **r == id).count() as i64;
        if users > 0 {
            return Err(AppError::RoleInUse { name: role.name, users });
        }
        tables.roles.retain(|r| r.id != id);
        tables.role_permissions.retain(|(role_id, _)| *role_id != id);
        Ok(role)
    }

    async fn users_of_role(&self, role_id: i64) -> Result<Vec<User>, AppError> {
        let tables = self.lock();
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| tables.user_roles.get(&u.id) == Some(&role_id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn user_role(&self, user_id: i64) -> Result<Option<Role>, AppError> {
        Ok(self.lock().role_of(user_id).cloned())
    }

    async fn user_permissions(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let tables = self.lock();
        let Some(role) = tables.role_of(user_id) else {
            return Ok(Vec::new());
        };
        Ok(tables.role_summary(role).permissions)
    }

    async fn ensure_permission(&self, name: &str) -> Result<(), AppError> {
        let mut tables = self.lock();
        if !tables.permissions.iter().any(|p| p.name == name) {
            let id = tables.next_id("permissions");
            tables.permissions.push(Permission { id, name: name.to_string() });
        }
        Ok(())
    }

    async fn ensure_role(&self, name: &str, permissions: &[&str]) -> Result<Role, AppError> {
        let mut tables = self.lock();
        let role = match tables.roles.iter().find(|r| r.name == name) {
            Some(role) => role.clone(),
            None => {
                let now = Utc::now();
                let role = Role {
                    id: tables.next_id("roles"),
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                tables.roles.push(role.clone());
                role
            }
        };
        let ids: Vec<i64> = tables
            .permissions
            .iter()
            .filter(|p| permissions.contains(&p.name.as_str()))
            .map(|p| p.id)
            .collect();
        for pid in ids {
            tables.role_permissions.insert((role.id, pid));
        }
        Ok(role)
    }
}
