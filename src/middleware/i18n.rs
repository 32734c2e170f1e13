// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

/// Idiomas com catálogo próprio. O primeiro é o padrão.
pub const SUPPORTED_LANGUAGES: &[&str] = &["es", "pt", "en"];

// Extrator de idioma a partir do Accept-Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(SUPPORTED_LANGUAGES[0].to_string())
    }
}

impl Locale {
    /// Primeiro idioma suportado da lista do cliente, na ordem de preferência.
    /// "pt-BR" vira "pt"; idiomas sem catálogo são ignorados.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str).into_iter().find_map(|tag| {
                    let primary = tag.split('-').next().unwrap_or(&tag).to_lowercase();
                    SUPPORTED_LANGUAGES
                        .iter()
                        .find(|lang| **lang == primary)
                        .map(|lang| lang.to_string())
                })
            })
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}
