//! Data access per entity. Every function is generic over the connection so it
//! runs the same against the shared pool or inside a transaction.

use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, RuntimeErr, Select,
};

use crate::error::{AppError, AppResult};

pub mod cliente_repo;
pub mod cotizacion_repo;
pub mod empleado_repo;
pub mod material_repo;
pub mod peticion_material_repo;
pub mod trabajo_repo;

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Row offset of a page, or `None` when it lies beyond what Postgres accepts.
pub fn page_offset(page: u64, limit: u64) -> Option<u64> {
    page.saturating_sub(1)
        .checked_mul(limit)
        .filter(|offset| *offset <= i64::MAX as u64)
}

/// ILIKE pattern matching `search` anywhere, with its wildcards taken literally.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn paginate<'db, C, E>(
    db: &'db C,
    select: Select<E>,
    page: u64,
    limit: u64,
) -> AppResult<Page<E::Model>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    let page = page.max(1);
    let limit = limit.max(1);
    let total = select.clone().count(db).await?;
    let items = match page_offset(page, limit) {
        Some(offset) if offset < total => select.limit(limit).offset(offset).all(db).await?,
        _ => Vec::new(),
    };
    Ok(Page {
        items,
        total,
        page,
        limit,
    })
}

/// Unique constraints and the request field each one protects.
const UNIQUE_FIELDS: &[(&str, &str)] = &[
    ("uq_clientes_contacto", "contacto"),
    ("uq_clientes_username", "username"),
    ("uq_empleados_contacto", "contacto"),
    ("uq_empleados_username", "username"),
    ("uq_materiales_codigo", "codigo"),
    ("uq_materiales_nombre", "nombre"),
    ("uq_trabajos_cotizacion", "cotizacion_id"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
}

pub fn constraint_error(kind: ConstraintKind, constraint: Option<&str>) -> AppError {
    let constraint = constraint.unwrap_or("unknown");
    match kind {
        ConstraintKind::Unique => {
            if constraint == "uq_trabajos_cotizacion" {
                return AppError::Conflict("A job already exists for this quote".into());
            }
            let field = UNIQUE_FIELDS
                .iter()
                .find(|(name, _)| *name == constraint)
                .map(|(_, field)| *field)
                .unwrap_or(constraint);
            AppError::Conflict(format!("{field} is already in use"))
        }
        ConstraintKind::ForeignKey => AppError::Conflict(format!(
            "Operation violates reference constraint {constraint}"
        )),
        ConstraintKind::Check => {
            AppError::BadRequest(format!("Value rejected by constraint {constraint}"))
        }
    }
}

/// Translates constraint violations reported by Postgres into domain errors.
pub fn map_db_err(err: DbErr) -> AppError {
    let db_err = match &err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => Some(db),
        _ => None,
    };
    let Some(db_err) = db_err else {
        return AppError::OrmError(err);
    };

    let kind = if db_err.is_unique_violation() {
        ConstraintKind::Unique
    } else if db_err.is_foreign_key_violation() {
        ConstraintKind::ForeignKey
    } else if db_err.is_check_violation() {
        ConstraintKind::Check
    } else {
        return AppError::OrmError(err);
    };
    constraint_error(kind, db_err.constraint())
}
