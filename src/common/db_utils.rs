// src/common/db_utils.rs

// Helpers para traduzir erros do Postgres e montar buscas.

/// Violação de UNIQUE na constraint (ou índice) informada.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Violação de chave estrangeira na constraint informada.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_foreign_key_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Padrão para `ILIKE` com o termo escapado: `%` e `_` digitados pelo usuário
/// são procurados literalmente.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(like_pattern("norte"), "%norte%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err, "zones_name_unique"));
        assert!(!is_foreign_key_violation(&err, "stores_zone_id_fkey"));
    }
}
