pub mod auth_service;
pub mod cliente_service;
pub mod cotizacion_service;
pub mod empleado_service;
pub mod material_service;
pub mod peticion_material_service;
pub mod report_service;
pub mod trabajo_service;

use crate::{
    error::{AppError, AppResult},
    repositories::Page,
    response::Meta,
};

pub(crate) fn page_meta<T>(page: &Page<T>) -> Meta {
    Meta::new(page.page, page.limit, page.total)
}

/// A required text field: present and not blank after trimming.
pub(crate) fn required(value: Option<String>, field: &str) -> AppResult<String> {
    crate::dto::fields::trimmed(value)
        .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

/// An optional patch of a required text field: may be omitted, never blanked.
pub(crate) fn non_blank(value: Option<String>, field: &str) -> AppResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => required(Some(v), field).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_reject_blank() {
        assert!(matches!(
            required(None, "username"),
            Err(AppError::BadRequest(ref m)) if m == "username is required"
        ));
        assert!(required(Some("  ".into()), "username").is_err());
        assert_eq!(required(Some(" ana1 ".into()), "username").unwrap(), "ana1");
    }

    #[test]
    fn patches_may_omit_but_not_blank() {
        assert_eq!(non_blank(None, "nombre").unwrap(), None);
        assert!(non_blank(Some(String::new()), "nombre").is_err());
        assert_eq!(
            non_blank(Some("Ana".into()), "nombre").unwrap(),
            Some("Ana".into())
        );
    }
}
