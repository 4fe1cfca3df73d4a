use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        cotizaciones::{CotizacionList, CreateCotizacionRequest, UpdateCotizacionRequest},
        fields::{parse_timestamp, patch_timestamp, trimmed},
    },
    entity::cotizaciones::{ActiveModel, Model},
    enums::{EstadoCotizacion, Role},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management, ensure_staff},
    models::Cotizacion,
    repositories::{
        cliente_repo,
        cotizacion_repo::{self, CotizacionFilter},
        material_repo,
    },
    response::{ApiResponse, Meta},
    routes::params::CotizacionListQuery,
    services::{non_blank, page_meta, required},
    state::AppState,
};

/// Share of the estimated total required up front when none is given.
const DEFAULT_DEPOSIT_RATIO: f64 = 0.5;

fn validate_total(total: f64) -> AppResult<f64> {
    if total.is_finite() && total > 0.0 {
        Ok(total)
    } else {
        Err(AppError::BadRequest(
            "total_estimado must be a number greater than 0".into(),
        ))
    }
}

fn validate_required_deposit(requerido: f64, total: f64) -> AppResult<f64> {
    if requerido.is_finite() && (0.0..=total).contains(&requerido) {
        Ok(requerido)
    } else {
        Err(AppError::BadRequest(
            "anticipo_requerido must be between 0 and total_estimado".into(),
        ))
    }
}

/// Checks a paid deposit against the required one and reports whether the
/// quote leaves `Pendiente de Anticipo` because of it.
fn settle_deposit(
    previous: EstadoCotizacion,
    next: EstadoCotizacion,
    pagado: f64,
    requerido: f64,
) -> AppResult<bool> {
    if !pagado.is_finite() || pagado < 0.0 {
        return Err(AppError::BadRequest(
            "monto_anticipo_pagado must be a non-negative number".into(),
        ));
    }
    if pagado > requerido {
        return Err(AppError::BadRequest(
            "monto_anticipo_pagado cannot exceed anticipo_requerido".into(),
        ));
    }
    Ok(previous == EstadoCotizacion::PendienteAnticipo
        && next == EstadoCotizacion::PendienteAnticipo
        && pagado >= requerido)
}

fn ensure_transition(from: EstadoCotizacion, to: EstadoCotizacion) -> AppResult<()> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(AppError::BadRequest(format!(
        "Quote cannot move from '{}' to '{}'",
        from.label(),
        to.label()
    )))
}

fn ensure_can_read(user: &AuthUser, cotizacion: &Model) -> AppResult<()> {
    if user.is_staff() || (user.role == Role::Cliente && user.user_id == cotizacion.cliente_id) {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

pub async fn list_cotizaciones(
    state: &AppState,
    user: &AuthUser,
    query: CotizacionListQuery,
) -> AppResult<ApiResponse<CotizacionList>> {
    let mut filter = CotizacionFilter {
        q: query.q.clone(),
        cliente_id: query.cliente_id,
        estado: query.estado,
    };
    if !user.is_staff() {
        if user.role != Role::Cliente {
            return Err(AppError::Forbidden);
        }
        filter.cliente_id = Some(user.user_id);
    }

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page = cotizacion_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(Cotizacion::from).items, meta)
        }
        None => {
            let items: Vec<Cotizacion> = cotizacion_repo::find_all(&state.orm, &filter)
                .await?
                .into_iter()
                .map(Cotizacion::from)
                .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success("Quotes", CotizacionList { items }, Some(meta)))
}

pub async fn get_cotizacion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Cotizacion>> {
    let cotizacion = cotizacion_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Quote"))?;
    ensure_can_read(user, &cotizacion)?;
    Ok(ApiResponse::success("Quote", Cotizacion::from(cotizacion), None))
}

pub async fn create_cotizacion(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCotizacionRequest,
) -> AppResult<ApiResponse<Cotizacion>> {
    ensure_staff(user)?;
    let cliente_id = payload
        .cliente_id
        .ok_or_else(|| AppError::BadRequest("cliente_id is required".into()))?;
    let tipo_producto = required(payload.tipo_producto, "tipo_producto")?;
    let total = payload
        .total_estimado
        .ok_or_else(|| AppError::BadRequest("total_estimado is required".into()))
        .and_then(validate_total)?;
    let requerido = validate_required_deposit(
        payload
            .anticipo_requerido
            .unwrap_or(total * DEFAULT_DEPOSIT_RATIO),
        total,
    )?;
    let mut estado = payload.estado.unwrap_or(EstadoCotizacion::PendienteAnticipo);
    let pagado = payload.monto_anticipo_pagado.unwrap_or(0.0);
    let mut fecha_anticipo_pagado: Option<DateTimeWithTimeZone> = None;
    if payload.monto_anticipo_pagado.is_some()
        && settle_deposit(EstadoCotizacion::PendienteAnticipo, estado, pagado, requerido)?
    {
        estado = EstadoCotizacion::AnticipoPagadoAgendado;
        fecha_anticipo_pagado = Some(Utc::now().into());
    }

    if cliente_repo::find_by_id(&state.orm, cliente_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Client"));
    }
    if let Some(material_id) = payload.material_base_id {
        if material_repo::find_by_id(&state.orm, material_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Material"));
        }
    }

    let cotizacion = cotizacion_repo::create(
        &state.orm,
        ActiveModel {
            cliente_id: Set(cliente_id),
            tipo_producto: Set(tipo_producto),
            material_base_id: Set(payload.material_base_id),
            descripcion: Set(trimmed(payload.descripcion)),
            total_estimado: Set(total),
            anticipo_requerido: Set(requerido),
            monto_anticipo_pagado: Set(pagado),
            estado: Set(estado),
            fecha_agendada: Set(payload
                .fecha_agendada
                .as_deref()
                .and_then(parse_timestamp)
                .map(Into::into)),
            fecha_anticipo_pagado: Set(fecha_anticipo_pagado),
            notas: Set(trimmed(payload.notas)),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user),
        "cotizacion_create",
        "cotizaciones",
        serde_json::json!({ "cotizacion_id": cotizacion.id, "cliente_id": cliente_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote created",
        Cotizacion::from(cotizacion),
        Some(Meta::empty()),
    ))
}

pub async fn update_cotizacion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCotizacionRequest,
) -> AppResult<ApiResponse<Cotizacion>> {
    ensure_staff(user)?;
    let existing = cotizacion_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Quote"))?;

    let mut changes: ActiveModel = Default::default();

    if let Some(cliente_id) = payload.cliente_id {
        if cliente_id != existing.cliente_id {
            if cliente_repo::find_by_id(&state.orm, cliente_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound("Client"));
            }
            changes.cliente_id = Set(cliente_id);
        }
    }
    if let Some(tipo) = non_blank(payload.tipo_producto, "tipo_producto")? {
        changes.tipo_producto = Set(tipo);
    }
    if let Some(material_base_id) = payload.material_base_id {
        if let Some(material_id) = material_base_id {
            if material_repo::find_by_id(&state.orm, material_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound("Material"));
            }
        }
        changes.material_base_id = Set(material_base_id);
    }
    if let Some(descripcion) = payload.descripcion {
        changes.descripcion = Set(trimmed(descripcion));
    }
    if let Some(notas) = payload.notas {
        changes.notas = Set(trimmed(notas));
    }
    if let Some(fecha) = patch_timestamp(&payload.fecha_agendada) {
        changes.fecha_agendada = Set(fecha.map(Into::into));
    }
    if let Some(fecha) = patch_timestamp(&payload.fecha_anticipo_pagado) {
        changes.fecha_anticipo_pagado = Set(fecha.map(Into::into));
    }

    let total = match payload.total_estimado {
        Some(total) => validate_total(total)?,
        None => existing.total_estimado,
    };
    let requerido = payload
        .anticipo_requerido
        .unwrap_or(existing.anticipo_requerido);
    if payload.total_estimado.is_some() || payload.anticipo_requerido.is_some() {
        validate_required_deposit(requerido, total)?;
    }
    if let Some(total) = payload.total_estimado {
        changes.total_estimado = Set(total);
    }
    if let Some(requerido) = payload.anticipo_requerido {
        changes.anticipo_requerido = Set(requerido);
    }

    let mut estado = existing.estado;
    if let Some(next) = payload.estado {
        ensure_transition(existing.estado, next)?;
        estado = next;
        changes.estado = Set(next);
    }

    let pagado = payload
        .monto_anticipo_pagado
        .unwrap_or(existing.monto_anticipo_pagado);
    if payload.monto_anticipo_pagado.is_some() || payload.anticipo_requerido.is_some() {
        let reached = settle_deposit(existing.estado, estado, pagado, requerido)?;
        if let Some(pagado) = payload.monto_anticipo_pagado {
            changes.monto_anticipo_pagado = Set(pagado);
            if reached {
                tracing::info!(cotizacion_id = %id, "deposit covered, scheduling quote");
                changes.estado = Set(EstadoCotizacion::AnticipoPagadoAgendado);
                changes.fecha_anticipo_pagado = Set(Some(Utc::now().into()));
            }
        }
    }

    if !cotizacion_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            Cotizacion::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = cotizacion_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Quote"))?;

    audit::record(
        &state.pool,
        Some(user),
        "cotizacion_update",
        "cotizaciones",
        serde_json::json!({ "cotizacion_id": id, "estado": updated.estado.label() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote updated",
        Cotizacion::from(updated),
        Some(Meta::empty()),
    ))
}

/// Marks the quote behind a delivered job as completed.
pub(crate) async fn complete_for_job(state: &AppState, cotizacion_id: Uuid) -> AppResult<bool> {
    let Some(cotizacion) = cotizacion_repo::find_by_id(&state.orm, cotizacion_id).await? else {
        return Err(AppError::NotFound("Quote"));
    };
    if cotizacion.estado.is_terminal() {
        tracing::info!(
            %cotizacion_id,
            estado = cotizacion.estado.label(),
            "quote already closed, leaving it as is"
        );
        return Ok(false);
    }

    let mut changes: ActiveModel = Default::default();
    changes.estado = Set(EstadoCotizacion::Completada);
    cotizacion_repo::update(&state.orm, cotizacion_id, changes).await
}

pub async fn delete_cotizacion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_management(user)?;
    if !cotizacion_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Quote"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "cotizacion_delete",
        "cotizaciones",
        serde_json::json!({ "cotizacion_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use EstadoCotizacion::*;

    #[test]
    fn default_deposit_is_half_the_total() {
        assert_eq!(1000.0 * DEFAULT_DEPOSIT_RATIO, 500.0);
        assert_eq!(
            validate_required_deposit(333.5 * DEFAULT_DEPOSIT_RATIO, 333.5).unwrap(),
            166.75
        );
    }

    #[test]
    fn totals_must_be_positive() {
        assert!(validate_total(0.0).is_err());
        assert!(validate_total(-10.0).is_err());
        assert!(validate_total(f64::INFINITY).is_err());
        assert_eq!(validate_total(1000.0).unwrap(), 1000.0);
    }

    #[test]
    fn required_deposit_stays_within_total() {
        assert!(validate_required_deposit(0.0, 100.0).is_ok());
        assert!(validate_required_deposit(100.0, 100.0).is_ok());
        assert!(validate_required_deposit(100.5, 100.0).is_err());
        assert!(validate_required_deposit(-1.0, 100.0).is_err());
    }

    #[test]
    fn overpaying_the_deposit_is_rejected() {
        let err = settle_deposit(PendienteAnticipo, PendienteAnticipo, 600.0, 500.0).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("cannot exceed")));
    }

    #[test]
    fn full_deposit_schedules_a_pending_quote() {
        assert!(settle_deposit(PendienteAnticipo, PendienteAnticipo, 500.0, 500.0).unwrap());
        assert!(!settle_deposit(PendienteAnticipo, PendienteAnticipo, 499.0, 500.0).unwrap());
    }

    #[test]
    fn explicit_status_wins_over_the_deposit_rule() {
        assert!(!settle_deposit(PendienteAnticipo, AnticipoPagadoEnCola, 500.0, 500.0).unwrap());
        assert!(!settle_deposit(AnticipoPagadoEnCola, AnticipoPagadoEnCola, 500.0, 500.0).unwrap());
    }

    #[test]
    fn closed_quotes_do_not_reopen() {
        assert!(ensure_transition(Completada, PendienteAnticipo).is_err());
        assert!(ensure_transition(Completada, Completada).is_ok());
        assert!(ensure_transition(PendienteAnticipo, Rechazada).is_ok());
    }
}
