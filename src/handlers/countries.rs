// src/handlers/countries.rs

use axum::{extract::Query, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::countries::{self, Country}, middleware::auth::AuthenticatedUser};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountryQuery {
    /// north_america, central_america, south_america, europe, asia, oceania,
    /// africa ou middle_east. Região desconhecida devolve a lista completa.
    pub region: Option<String>,
}

// GET /api/countries?region=
#[utoipa::path(
    get,
    path = "/api/countries",
    tag = "Countries",
    params(CountryQuery),
    responses(
        (status = 200, description = "Países na ordem de exibição", body = [Country])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_countries(
    _actor: AuthenticatedUser,
    Query(query): Query<CountryQuery>,
) -> Json<Vec<Country>> {
    let list = match query.region.as_deref() {
        Some(region) => countries::by_region(region),
        None => countries::all().to_vec(),
    };
    Json(list)
}
