// src/common/countries.rs

use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

// Tabela fixa de países aceitos pelo sistema. A ordem aqui é a ordem de exibição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Country {
    #[schema(value_type = String, example = "MEX")]
    pub code: &'static str,

    #[schema(value_type = String, example = "México")]
    pub name: &'static str,
}

static COUNTRIES: &[Country] = &[
    Country { code: "MEX", name: "México" },
    Country { code: "USA", name: "Estados Unidos" },
    Country { code: "CAN", name: "Canadá" },
    Country { code: "GTM", name: "Guatemala" },
    Country { code: "BLZ", name: "Belice" },
    Country { code: "SLV", name: "El Salvador" },
    Country { code: "HND", name: "Honduras" },
    Country { code: "NIC", name: "Nicaragua" },
    Country { code: "CRI", name: "Costa Rica" },
    Country { code: "PAN", name: "Panamá" },
    Country { code: "COL", name: "Colombia" },
    Country { code: "VEN", name: "Venezuela" },
    Country { code: "GUY", name: "Guyana" },
    Country { code: "SUR", name: "Suriname" },
    Country { code: "GUF", name: "Guayana Francesa" },
    Country { code: "BRA", name: "Brasil" },
    Country { code: "ECU", name: "Ecuador" },
    Country { code: "PER", name: "Perú" },
    Country { code: "BOL", name: "Bolivia" },
    Country { code: "PRY", name: "Paraguay" },
    Country { code: "URY", name: "Uruguay" },
    Country { code: "ARG", name: "Argentina" },
    Country { code: "CHL", name: "Chile" },
    Country { code: "ESP", name: "España" },
    Country { code: "FRA", name: "Francia" },
    Country { code: "DEU", name: "Alemania" },
    Country { code: "ITA", name: "Italia" },
    Country { code: "GBR", name: "Reino Unido" },
    Country { code: "PRT", name: "Portugal" },
    Country { code: "NLD", name: "Países Bajos" },
    Country { code: "BEL", name: "Bélgica" },
    Country { code: "CHE", name: "Suiza" },
    Country { code: "AUT", name: "Austria" },
    Country { code: "SWE", name: "Suecia" },
    Country { code: "NOR", name: "Noruega" },
    Country { code: "DNK", name: "Dinamarca" },
    Country { code: "FIN", name: "Finlandia" },
    Country { code: "POL", name: "Polonia" },
    Country { code: "CZE", name: "República Checa" },
    Country { code: "HUN", name: "Hungría" },
    Country { code: "SVK", name: "Eslovaquia" },
    Country { code: "SVN", name: "Eslovenia" },
    Country { code: "HRV", name: "Croacia" },
    Country { code: "ROU", name: "Rumania" },
    Country { code: "BGR", name: "Bulgaria" },
    Country { code: "GRC", name: "Grecia" },
    Country { code: "TUR", name: "Turquía" },
    Country { code: "RUS", name: "Rusia" },
    Country { code: "UKR", name: "Ucrania" },
    Country { code: "CHN", name: "China" },
    Country { code: "JPN", name: "Japón" },
    Country { code: "KOR", name: "Corea del Sur" },
    Country { code: "IND", name: "India" },
    Country { code: "THA", name: "Tailandia" },
    Country { code: "VNM", name: "Vietnam" },
    Country { code: "IDN", name: "Indonesia" },
    Country { code: "MYS", name: "Malasia" },
    Country { code: "SGP", name: "Singapur" },
    Country { code: "PHL", name: "Filipinas" },
    Country { code: "AUS", name: "Australia" },
    Country { code: "NZL", name: "Nueva Zelanda" },
    Country { code: "ZAF", name: "Sudáfrica" },
    Country { code: "EGY", name: "Egipto" },
    Country { code: "MAR", name: "Marruecos" },
    Country { code: "NGA", name: "Nigeria" },
    Country { code: "KEN", name: "Kenia" },
    Country { code: "ETH", name: "Etiopía" },
    Country { code: "ISR", name: "Israel" },
    Country { code: "SAU", name: "Arabia Saudí" },
    Country { code: "ARE", name: "Emiratos Árabes Unidos" },
    Country { code: "QAT", name: "Catar" },
    Country { code: "KWT", name: "Kuwait" },
    Country { code: "JOR", name: "Jordania" },
    Country { code: "LBN", name: "Líbano" },
    Country { code: "IRQ", name: "Irak" },
    Country { code: "IRN", name: "Irán" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    CentralAmerica,
    SouthAmerica,
    Europe,
    Asia,
    Oceania,
    Africa,
    MiddleEast,
}

impl Region {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "north_america" => Some(Region::NorthAmerica),
            "central_america" => Some(Region::CentralAmerica),
            "south_america" => Some(Region::SouthAmerica),
            "europe" => Some(Region::Europe),
            "asia" => Some(Region::Asia),
            "oceania" => Some(Region::Oceania),
            "africa" => Some(Region::Africa),
            "middle_east" => Some(Region::MiddleEast),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Region::NorthAmerica => "north_america",
            Region::CentralAmerica => "central_america",
            Region::SouthAmerica => "south_america",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Oceania => "oceania",
            Region::Africa => "africa",
            Region::MiddleEast => "middle_east",
        }
    }
}

// Cada região lista seus códigos na ordem em que aparecem no seletor
static REGIONS: &[(Region, &[&str])] = &[
    (
        Region::NorthAmerica,
        &[
            "USA", "CAN", "MEX",
        ],
    ),
    (
        Region::CentralAmerica,
        &[
            "GTM", "BLZ", "SLV", "HND", "NIC", "CRI", "PAN",
        ],
    ),
    (
        Region::SouthAmerica,
        &[
            "COL", "VEN", "GUY", "SUR", "GUF", "BRA", "ECU", "PER", "BOL", "PRY",
            "URY", "ARG", "CHL",
        ],
    ),
    (
        Region::Europe,
        &[
            "ESP", "FRA", "DEU", "ITA", "GBR", "PRT", "NLD", "BEL", "CHE", "AUT",
            "SWE", "NOR", "DNK", "FIN", "POL", "CZE", "HUN", "SVK", "SVN", "HRV",
            "ROU", "BGR", "GRC", "TUR", "RUS", "UKR",
        ],
    ),
    (
        Region::Asia,
        &[
            "CHN", "JPN", "KOR", "IND", "THA", "VNM", "IDN", "MYS", "SGP", "PHL",
        ],
    ),
    (
        Region::Oceania,
        &[
            "AUS", "NZL",
        ],
    ),
    (
        Region::Africa,
        &[
            "ZAF", "EGY", "MAR", "NGA", "KEN", "ETH",
        ],
    ),
    (
        Region::MiddleEast,
        &[
            "ISR", "SAU", "ARE", "QAT", "KWT", "JOR", "LBN", "IRQ", "IRN",
        ],
    ),
];

/// Chaves de região aceitas por [`by_region`].
pub fn region_keys() -> Vec<&'static str> {
    REGIONS.iter().map(|(r, _)| r.key()).collect()
}

/// Todos os países, na ordem canônica de exibição.
pub fn all() -> &'static [Country] {
    COUNTRIES
}

/// Nome de exibição de um código, ou `None` para códigos fora da tabela.
pub fn name(code: &str) -> Option<&'static str> {
    COUNTRIES.iter().find(|c| c.code == code).map(|c| c.name)
}

pub fn codes() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|c| c.code)
}

pub fn exists(code: &str) -> bool {
    name(code).is_some()
}

/// Países de uma região. Chaves desconhecidas devolvem a tabela inteira.
pub fn by_region(key: &str) -> Vec<Country> {
    let Some(region) = Region::from_key(key) else {
        return COUNTRIES.to_vec();
    };

    REGIONS
        .iter()
        .filter(|(r, _)| *r == region)
        .flat_map(|(_, codes)| codes.iter())
        .filter_map(|code| COUNTRIES.iter().find(|c| c.code == *code).copied())
        .collect()
}

/// Regra textual de lista permitida ("in:MEX,USA,...").
pub fn validation_rule() -> String {
    format!("in:{}", codes().collect::<Vec<_>>().join(","))
}

/// Validador usado nos payloads (`#[validate(custom(function = ...))]`).
pub fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    if exists(code) {
        return Ok(());
    }
    let mut err = ValidationError::new("country");
    err.add_param("allowed".into(), &validation_rule());
    err.message = Some("invalid_country".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_display_order() {
        let first: Vec<_> = all().iter().take(3).map(|c| c.code).collect();
        assert_eq!(first, vec!["MEX", "USA", "CAN"]);
        assert_eq!(all().len(), 76);
    }

    #[test]
    fn looks_up_names() {
        assert_eq!(name("USA"), Some("Estados Unidos"));
        assert_eq!(name("ARE"), Some("Emiratos Árabes Unidos"));
        assert_eq!(name("XXX"), None);
        assert!(exists("MEX"));
        assert!(!exists("mex"));
    }

    #[test]
    fn region_subsets_and_fallback() {
        let north: Vec<_> = by_region("north_america").iter().map(|c| c.code).collect();
        assert_eq!(north, vec!["USA", "CAN", "MEX"]);
        assert_eq!(by_region("oceania").len(), 2);
        assert_eq!(by_region("atlantis").len(), all().len());
    }

    #[test]
    fn every_region_code_is_registered() {
        for (_, codes) in REGIONS {
            for code in codes.iter() {
                assert!(exists(code), "{code} não está na tabela");
            }
        }
    }

    #[test]
    fn validation_rule_lists_codes() {
        let rule = validation_rule();
        assert!(rule.starts_with("in:MEX,USA,CAN,"));
        assert!(rule.ends_with(",IRN"));
        assert!(validate_country_code("BRA").is_ok());
        assert!(validate_country_code("BR").is_err());
    }
}
