pub mod auth;
pub mod rbac;
pub mod store;
pub mod user;
pub mod zone;

use serde::Serialize;
use utoipa::ToSchema;

/// Resposta das mutações: mensagem traduzida mais o registro afetado.
#[derive(Debug, Serialize, ToSchema)]
pub struct Notice<T> {
    #[schema(example = "¡Zona creada exitosamente!")]
    pub message: String,
    pub data: T,
}

impl<T> Notice<T> {
    pub fn new(message: String, data: T) -> Self {
        Self { message, data }
    }
}
