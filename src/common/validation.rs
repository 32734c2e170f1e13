// src/common/validation.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use validator::{ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

pub const MAX_TEXT_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 8;

// ---
// Normalização de formulários
// ---

/// Campos opcionais de formulário chegam como "" quando vazios. Tratamos
/// string vazia (ou só espaços) como ausência de valor.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }))
}

/// Campos obrigatórios de texto, já sem espaços nas pontas.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

// ---
// Validadores customizados
// ---

/// Nome obrigatório com no máximo 255 caracteres.
pub fn validate_required_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("required".into());
        return Err(err);
    }
    validate_max_length(value)
}

/// Texto opcional com no máximo 255 caracteres.
pub fn validate_max_length(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LENGTH {
        let mut err = ValidationError::new("length");
        err.add_param("max".into(), &MAX_TEXT_LENGTH);
        err.message = Some("length".into());
        return Err(err);
    }
    Ok(())
}

/// E-mail obrigatório, bem formado e com no máximo 255 caracteres.
pub fn validate_required_email(value: &str) -> Result<(), ValidationError> {
    validate_required_name(value)?;
    if !value.validate_email() {
        let mut err = ValidationError::new("email");
        err.message = Some("invalid_email".into());
        return Err(err);
    }
    Ok(())
}

/// Valida senha + confirmação e acumula os erros em `errors`. Usado no
/// cadastro, na edição (quando a senha foi informada) e no reset administrativo.
pub fn check_password_pair(
    errors: &mut ValidationErrors,
    field: &'static str,
    password: &str,
    confirmation: Option<&str>,
) {
    if password.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("required".into());
        errors.add(field, err);
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &MIN_PASSWORD_LENGTH);
        err.message = Some("password_min".into());
        errors.add(field, err);
    } else if confirmation != Some(password) {
        let mut err = ValidationError::new("confirmed");
        err.message = Some("password_mismatch".into());
        errors.add(field, err);
    }
}

/// Resultado de `Validate::validate` como acumulador para checagens manuais.
pub fn collect(result: Result<(), ValidationErrors>) -> ValidationErrors {
    result.err().unwrap_or_else(ValidationErrors::new)
}

/// Fecha o acumulador: vazio vira `Ok`.
pub fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Erros por campo, descendo em structs aninhadas (`#[validate(nested)]`).
/// Structs aninhadas são achatadas no JSON, então o campo interno mantém o
/// próprio nome; itens de lista viram `campo[i]`.
pub fn flatten_field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<&ValidationError>> {
    let mut out = BTreeMap::new();
    walk(errors, None, &mut out);
    out
}

fn walk<'a>(
    errors: &'a ValidationErrors,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, Vec<&'a ValidationError>>,
) {
    for (field, kind) in errors.errors() {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => out.entry(name).or_default().extend(list.iter()),
            ValidationErrorsKind::Struct(inner) => walk(inner, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item = format!("{name}[{index}]");
                    walk(inner, Some(item.as_str()), out);
                }
            }
        }
    }
}
