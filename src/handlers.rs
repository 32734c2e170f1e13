pub mod auth;
pub mod countries;
pub mod rbac;
pub mod stores;
pub mod users;
pub mod zones;
