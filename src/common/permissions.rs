// src/common/permissions.rs

// Catálogo estático de permissões e dos cargos padrão.
// O banco guarda as linhas, mas os nomes e rótulos nascem aqui.

/// Todas as permissões do sistema, na ordem em que são semeadas.
pub const PERMISSIONS: &[&str] = &[
    // Usuários
    "users.view",
    "users.create",
    "users.edit",
    "users.delete",
    "users.activate",
    "users.deactivate",
    "users.reset-password",
    // Lojas
    "stores.view",
    "stores.create",
    "stores.edit",
    "stores.delete",
    // Zonas
    "zones.view",
    "zones.create",
    "zones.edit",
    "zones.delete",
    // Cargos e permissões
    "roles.view",
    "roles.create",
    "roles.edit",
    "roles.delete",
    "permissions.view",
    "permissions.assign",
    // Relatórios
    "reports.view",
    "reports.export",
    "analytics.view",
    // Sistema
    "settings.view",
    "settings.edit",
    "system.maintenance",
    // Auditoria
    "logs.view",
    "logs.export",
];

pub const SUPER_ADMIN_ROLE: &str = "Super Administrador";

/// Um cargo padrão e o conjunto de permissões que ele recebe na semeadura.
#[derive(Debug, Clone, Copy)]
pub struct SeedRole {
    pub name: &'static str,
    pub permissions: SeedGrant,
}

#[derive(Debug, Clone, Copy)]
pub enum SeedGrant {
    All,
    Only(&'static [&'static str]),
}

impl SeedRole {
    pub fn permission_names(&self) -> Vec<&'static str> {
        match self.permissions {
            SeedGrant::All => PERMISSIONS.to_vec(),
            SeedGrant::Only(names) => names.to_vec(),
        }
    }
}

pub const SEED_ROLES: &[SeedRole] = &[
    SeedRole {
        name: SUPER_ADMIN_ROLE,
        permissions: SeedGrant::All,
    },
    SeedRole {
        name: "Administrador",
        permissions: SeedGrant::Only(&[
            "users.view", "users.create", "users.edit", "users.activate", "users.deactivate",
            "stores.view", "stores.create", "stores.edit",
            "zones.view", "zones.create", "zones.edit",
            "roles.view", "permissions.view",
            "reports.view", "reports.export",
            "analytics.view",
            "settings.view", "settings.edit",
            "logs.view",
        ]),
    },
    SeedRole {
        name: "Gerente de Tienda",
        permissions: SeedGrant::Only(&[
            "users.view", "users.create", "users.edit",
            "stores.view", "stores.edit",
            "reports.view",
            "analytics.view",
        ]),
    },
    SeedRole {
        name: "Supervisor",
        permissions: SeedGrant::Only(&[
            "users.view",
            "stores.view",
            "reports.view",
            "analytics.view",
        ]),
    },
    SeedRole {
        name: "Empleado",
        permissions: SeedGrant::Only(&["users.view", "stores.view"]),
    },
    SeedRole {
        name: "Administrador del Sistema",
        permissions: SeedGrant::Only(&[
            "users.view", "users.create", "users.edit", "users.delete",
            "users.activate", "users.deactivate", "users.reset-password",
            "stores.view", "stores.create", "stores.edit", "stores.delete",
            "zones.view", "zones.create", "zones.edit", "zones.delete",
            "roles.view", "roles.create", "roles.edit", "roles.delete",
            "permissions.view", "permissions.assign",
            "settings.view", "settings.edit",
            "system.maintenance",
            "logs.view", "logs.export",
        ]),
    },
];

pub const GENERAL_MODULE: &str = "general";

/// Módulo de uma permissão: o trecho antes do primeiro ".".
pub fn module_of(permission: &str) -> &str {
    match permission.split_once('.') {
        Some((module, _)) => module,
        None => GENERAL_MODULE,
    }
}

/// Ação de uma permissão: o trecho após o primeiro "." (ou o nome inteiro).
pub fn action_of(permission: &str) -> &str {
    match permission.split_once('.') {
        Some((_, action)) => action,
        None => permission,
    }
}

pub fn permission_display(permission: &str) -> String {
    let label = match permission {
        "users.view" => "Ver Usuarios",
        "users.create" => "Crear Usuarios",
        "users.edit" => "Editar Usuarios",
        "users.delete" => "Eliminar Usuarios",
        "users.activate" => "Activar Usuarios",
        "users.deactivate" => "Desactivar Usuarios",
        "users.reset-password" => "Resetear Contraseñas",
        "stores.view" => "Ver Tiendas",
        "stores.create" => "Crear Tiendas",
        "stores.edit" => "Editar Tiendas",
        "stores.delete" => "Eliminar Tiendas",
        "zones.view" => "Ver Zonas",
        "zones.create" => "Crear Zonas",
        "zones.edit" => "Editar Zonas",
        "zones.delete" => "Eliminar Zonas",
        "roles.view" => "Ver Roles",
        "roles.create" => "Crear Roles",
        "roles.edit" => "Editar Roles",
        "roles.delete" => "Eliminar Roles",
        "permissions.view" => "Ver Permisos",
        "permissions.assign" => "Asignar Permisos",
        "reports.view" => "Ver Reportes",
        "reports.export" => "Exportar Reportes",
        "analytics.view" => "Ver Analíticas",
        "settings.view" => "Ver Configuraciones",
        "settings.edit" => "Editar Configuraciones",
        "system.maintenance" => "Mantenimiento del Sistema",
        "logs.view" => "Ver Logs",
        "logs.export" => "Exportar Logs",
        other => return title_case(other),
    };
    label.to_string()
}

pub fn module_display(module: &str) -> String {
    let label = match module {
        "users" => "Gestión de Usuarios",
        "stores" => "Gestión de Tiendas",
        "zones" => "Gestión de Zonas",
        "roles" => "Gestión de Roles",
        "permissions" => "Gestión de Permisos",
        "reports" => "Reportes",
        "analytics" => "Analíticas",
        "settings" => "Configuraciones",
        "system" => "Sistema",
        "logs" => "Logs de Auditoría",
        other => return title_case(other),
    };
    label.to_string()
}

/// "reports.export_all" -> "Reports Export All"
fn title_case(raw: &str) -> String {
    raw.split(['.', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
