// src/common/i18n.rs

// Catálogo de mensagens exibidas ao usuário. As chaves são as mesmas usadas
// como `message` nos validadores e nas variantes de AppError.

type Catalog = &'static [(&'static str, &'static str)];

const ES: Catalog = &[
    // Validação
    ("validation_failed", "Uno o más campos son inválidos."),
    ("required", "Este campo es requerido."),
    ("length", "Debe tener como máximo {max} caracteres."),
    ("invalid_email", "El correo electrónico debe ser válido."),
    ("invalid_country", "El país seleccionado no es válido."),
    ("unique_name", "Ya existe un registro con este nombre."),
    ("unique_email", "Ya existe un usuario con este correo electrónico."),
    ("password_min", "La contraseña debe tener al menos 8 caracteres."),
    ("password_mismatch", "Las contraseñas no coinciden."),
    ("password_incorrect", "La contraseña actual no es correcta."),
    ("invalid_role", "El rol seleccionado no existe."),
    ("invalid_store", "La tienda seleccionada no existe."),
    ("invalid_permission", "Uno o más permisos no existen."),
    ("invalid_sort", "La columna de ordenación no es válida."),
    ("invalid_status", "El filtro de estado no es válido."),
    // Não encontrado / conflito
    ("zone_not_found", "La zona no existe."),
    ("store_not_found", "La tienda no existe."),
    ("user_not_found", "El usuario no existe."),
    ("role_not_found", "El rol no existe."),
    ("zone_in_use", "No se puede eliminar la zona '{name}' porque está asignada a {count} tienda(s)."),
    ("role_in_use", "No se puede eliminar el rol '{name}' porque está asignado a {count} usuario(s)."),
    ("self_modification", "No puede eliminar ni desactivar su propia cuenta."),
    ("status_changed", "El estado del usuario cambió mientras se procesaba la solicitud. Inténtelo de nuevo."),
    // Autenticação
    ("invalid_credentials", "Correo electrónico o contraseña inválidos."),
    ("invalid_token", "Token de autenticación inválido o ausente."),
    ("inactive_account", "La cuenta está desactivada."),
    ("forbidden", "Necesita el permiso '{permission}' para realizar esta acción."),
    ("internal_error", "Ocurrió un error inesperado."),
    // Notificações de sucesso
    ("zone_created", "¡Zona creada exitosamente!"),
    ("zone_updated", "¡Zona actualizada exitosamente!"),
    ("zone_deleted", "¡Zona '{name}' eliminada exitosamente!"),
    ("store_created", "¡Tienda creada exitosamente!"),
    ("store_updated", "¡Tienda actualizada exitosamente!"),
    ("store_deleted", "¡Tienda '{name}' eliminada exitosamente!"),
    ("user_created", "Usuario creado exitosamente."),
    ("user_updated", "Usuario actualizado exitosamente."),
    ("user_deleted", "Usuario '{name}' eliminado exitosamente."),
    ("user_activated", "Usuario activado exitosamente."),
    ("user_deactivated", "Usuario desactivado exitosamente."),
    ("password_updated", "Contraseña actualizada exitosamente."),
    ("role_created", "Rol creado exitosamente."),
    ("role_updated", "Rol actualizado exitosamente."),
    ("role_deleted", "Rol '{name}' eliminado exitosamente."),
];

const PT: Catalog = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("required", "Este campo é obrigatório."),
    ("length", "Deve ter no máximo {max} caracteres."),
    ("invalid_email", "O e-mail fornecido é inválido."),
    ("invalid_country", "O país selecionado não é válido."),
    ("unique_name", "Já existe um registro com esse nome."),
    ("unique_email", "Este e-mail já está em uso."),
    ("password_min", "A senha deve ter no mínimo 8 caracteres."),
    ("password_mismatch", "As senhas não coincidem."),
    ("password_incorrect", "A senha atual está incorreta."),
    ("invalid_role", "O cargo selecionado não existe."),
    ("invalid_store", "A loja selecionada não existe."),
    ("invalid_permission", "Uma ou mais permissões não existem."),
    ("invalid_sort", "A coluna de ordenação é inválida."),
    ("invalid_status", "O filtro de status é inválido."),
    ("zone_not_found", "Zona não encontrada."),
    ("store_not_found", "Loja não encontrada."),
    ("user_not_found", "Usuário não encontrado."),
    ("role_not_found", "Cargo não encontrado."),
    ("zone_in_use", "Não é possível excluir a zona '{name}' porque ela está vinculada a {count} loja(s)."),
    ("role_in_use", "Não é possível excluir o cargo '{name}' porque ele está atribuído a {count} usuário(s)."),
    ("self_modification", "Você não pode excluir nem desativar a sua própria conta."),
    ("status_changed", "O status do usuário mudou enquanto a requisição era processada. Tente novamente."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("inactive_account", "A conta está desativada."),
    ("forbidden", "Você precisa da permissão '{permission}' para realizar esta ação."),
    ("internal_error", "Ocorreu um erro inesperado."),
    ("zone_created", "Zona criada com sucesso!"),
    ("zone_updated", "Zona atualizada com sucesso!"),
    ("zone_deleted", "Zona '{name}' excluída com sucesso!"),
    ("store_created", "Loja criada com sucesso!"),
    ("store_updated", "Loja atualizada com sucesso!"),
    ("store_deleted", "Loja '{name}' excluída com sucesso!"),
    ("user_created", "Usuário criado com sucesso."),
    ("user_updated", "Usuário atualizado com sucesso."),
    ("user_deleted", "Usuário '{name}' excluído com sucesso."),
    ("user_activated", "Usuário ativado com sucesso."),
    ("user_deactivated", "Usuário desativado com sucesso."),
    ("password_updated", "Senha atualizada com sucesso."),
    ("role_created", "Cargo criado com sucesso."),
    ("role_updated", "Cargo atualizado com sucesso."),
    ("role_deleted", "Cargo '{name}' excluído com sucesso."),
];

const EN: Catalog = &[
    ("validation_failed", "One or more fields are invalid."),
    ("required", "This field is required."),
    ("length", "Must be at most {max} characters."),
    ("invalid_email", "The email address must be valid."),
    ("invalid_country", "The selected country is not valid."),
    ("unique_name", "A record with this name already exists."),
    ("unique_email", "A user with this email already exists."),
    ("password_min", "The password must be at least 8 characters."),
    ("password_mismatch", "The passwords do not match."),
    ("password_incorrect", "The current password is incorrect."),
    ("invalid_role", "The selected role does not exist."),
    ("invalid_store", "The selected store does not exist."),
    ("invalid_permission", "One or more permissions do not exist."),
    ("invalid_sort", "The sort column is not valid."),
    ("invalid_status", "The status filter is not valid."),
    ("zone_not_found", "Zone not found."),
    ("store_not_found", "Store not found."),
    ("user_not_found", "User not found."),
    ("role_not_found", "Role not found."),
    ("zone_in_use", "Zone '{name}' cannot be deleted because it is assigned to {count} store(s)."),
    ("role_in_use", "Role '{name}' cannot be deleted because it is assigned to {count} user(s)."),
    ("self_modification", "You cannot delete or deactivate your own account."),
    ("status_changed", "The user's status changed while the request was being processed. Please try again."),
    ("invalid_credentials", "Invalid email or password."),
    ("invalid_token", "Invalid or missing authentication token."),
    ("inactive_account", "The account is deactivated."),
    ("forbidden", "You need the '{permission}' permission to perform this action."),
    ("internal_error", "An unexpected error occurred."),
    ("zone_created", "Zone created successfully!"),
    ("zone_updated", "Zone updated successfully!"),
    ("zone_deleted", "Zone '{name}' deleted successfully!"),
    ("store_created", "Store created successfully!"),
    ("store_updated", "Store updated successfully!"),
    ("store_deleted", "Store '{name}' deleted successfully!"),
    ("user_created", "User created successfully."),
    ("user_updated", "User updated successfully."),
    ("user_deleted", "User '{name}' deleted successfully."),
    ("user_activated", "User activated successfully."),
    ("user_deactivated", "User deactivated successfully."),
    ("password_updated", "Password updated successfully."),
    ("role_created", "Role created successfully."),
    ("role_updated", "Role updated successfully."),
    ("role_deleted", "Role '{name}' deleted successfully."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    default_lang: String,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new("es")
    }
}

impl I18nStore {
    pub fn new(default_lang: &str) -> Self {
        let default_lang = if catalog(default_lang).is_some() { default_lang } else { "es" };
        Self { default_lang: default_lang.to_string() }
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    /// Traduz `key` no idioma pedido, caindo para o idioma padrão e, por fim,
    /// para a própria chave. `{nome}` é substituído pelos argumentos.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = catalog(lang)
            .and_then(|c| lookup(c, key))
            .or_else(|| catalog(&self.default_lang).and_then(|c| lookup(c, key)))
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

fn catalog(lang: &str) -> Option<Catalog> {
    match lang {
        "es" => Some(ES),
        "pt" => Some(PT),
        "en" => Some(EN),
        _ => None,
    }
}

fn lookup(catalog: Catalog, key: &str) -> Option<&'static str> {
    catalog.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
