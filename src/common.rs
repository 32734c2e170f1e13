pub mod countries;
pub mod db_utils;
pub mod error;
pub mod formatting;
pub mod i18n;
pub mod pagination;
pub mod permissions;
pub mod validation;
