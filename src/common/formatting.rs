// src/common/formatting.rs

// Campos derivados exibidos nas listagens.

/// Junta as partes não vazias do endereço com ", ".
pub fn full_address<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Primeira letra das duas primeiras palavras do nome, na caixa em que foi
/// cadastrado.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Id com seis dígitos, preenchido com zeros à esquerda.
pub fn formatted_id(id: i64) -> String {
    format!("{id:06}")
}
