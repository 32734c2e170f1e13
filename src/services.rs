pub mod auth;
pub mod password;
pub mod rbac_service;
pub mod store_service;
pub mod user_service;
pub mod zone_service;
