use std::time::Duration;

use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        fields::{parse_timestamp, patch_timestamp, trimmed},
        trabajos::{CreateTrabajoRequest, TrabajoList, UpdateTrabajoRequest},
    },
    entity::trabajos::ActiveModel,
    enums::EstadoTrabajo,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management, ensure_staff},
    models::Trabajo,
    repositories::{
        cotizacion_repo, empleado_repo,
        trabajo_repo::{self, TrabajoFilter},
    },
    response::{ApiResponse, Meta},
    routes::params::TrabajoListQuery,
    services::{cotizacion_service, page_meta},
    state::AppState,
};

const CASCADE_ATTEMPTS: u32 = 3;
const CASCADE_BACKOFF: Duration = Duration::from_millis(100);

/// Which real dates a status change should stamp, given what is already set.
fn real_dates_to_stamp(
    from: Option<EstadoTrabajo>,
    to: EstadoTrabajo,
    inicio_set: bool,
    fin_set: bool,
) -> (bool, bool) {
    if from == Some(to) {
        return (false, false);
    }
    (
        to == EstadoTrabajo::EnProgreso && !inicio_set,
        to == EstadoTrabajo::Entregado && !fin_set,
    )
}

fn ensure_transition(from: EstadoTrabajo, to: EstadoTrabajo) -> AppResult<()> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(AppError::BadRequest(format!(
        "Job cannot move from '{}' to '{}'",
        from.label(),
        to.label()
    )))
}

async fn ensure_employee_exists(state: &AppState, empleado_id: Uuid) -> AppResult<()> {
    if empleado_repo::find_by_id(&state.orm, empleado_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Employee"));
    }
    Ok(())
}

/// Closes the quote behind a delivered job. Failures are logged and dropped so
/// the job change that triggered it still stands.
async fn cascade_quote_completion(state: &AppState, trabajo_id: Uuid, cotizacion_id: Uuid) {
    for attempt in 1..=CASCADE_ATTEMPTS {
        match cotizacion_service::complete_for_job(state, cotizacion_id).await {
            Ok(changed) => {
                if changed {
                    tracing::info!(%trabajo_id, %cotizacion_id, "quote completed by delivered job");
                }
                return;
            }
            Err(AppError::NotFound(_)) => {
                tracing::warn!(%trabajo_id, %cotizacion_id, "quote vanished before completion");
                return;
            }
            Err(err) if attempt < CASCADE_ATTEMPTS => {
                tracing::warn!(
                    %trabajo_id,
                    %cotizacion_id,
                    attempt,
                    error = %err,
                    "quote completion failed, retrying"
                );
                tokio::time::sleep(CASCADE_BACKOFF * attempt).await;
            }
            Err(err) => {
                tracing::error!(
                    %trabajo_id,
                    %cotizacion_id,
                    error = %err,
                    "quote completion gave up, quote left in its previous state"
                );
            }
        }
    }
}

pub async fn list_trabajos(
    state: &AppState,
    user: &AuthUser,
    query: TrabajoListQuery,
) -> AppResult<ApiResponse<TrabajoList>> {
    ensure_staff(user)?;
    let filter = TrabajoFilter {
        cotizacion_id: query.cotizacion_id,
        empleado_id: query.empleado_id,
        estado: query.estado,
    };

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page = trabajo_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(Trabajo::from).items, meta)
        }
        None => {
            let items: Vec<Trabajo> = trabajo_repo::find_all(&state.orm, &filter)
                .await?
                .into_iter()
                .map(Trabajo::from)
                .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success("Jobs", TrabajoList { items }, Some(meta)))
}

pub async fn get_trabajo(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Trabajo>> {
    ensure_staff(user)?;
    let trabajo = trabajo_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;
    Ok(ApiResponse::success("Job", Trabajo::from(trabajo), None))
}

pub async fn get_trabajo_by_quote(
    state: &AppState,
    user: &AuthUser,
    cotizacion_id: Uuid,
) -> AppResult<ApiResponse<Trabajo>> {
    ensure_staff(user)?;
    let trabajo = trabajo_repo::find_by_quote(&state.orm, cotizacion_id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;
    Ok(ApiResponse::success("Job", Trabajo::from(trabajo), None))
}

pub async fn create_trabajo(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTrabajoRequest,
) -> AppResult<ApiResponse<Trabajo>> {
    ensure_staff(user)?;
    let cotizacion_id = payload
        .cotizacion_id
        .ok_or_else(|| AppError::BadRequest("cotizacion_id is required".into()))?;
    let estado = payload.estado.unwrap_or(EstadoTrabajo::Pendiente);
    let materiales = payload.materiales_usados.unwrap_or_default();
    materiales.validate()?;

    if cotizacion_repo::find_by_id(&state.orm, cotizacion_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Quote"));
    }
    if let Some(empleado_id) = payload.empleado_id {
        ensure_employee_exists(state, empleado_id).await?;
    }
    if trabajo_repo::find_by_quote(&state.orm, cotizacion_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("A job already exists for this quote".into()));
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let (stamp_inicio, stamp_fin) = real_dates_to_stamp(None, estado, false, false);

    let trabajo = trabajo_repo::create(
        &state.orm,
        ActiveModel {
            cotizacion_id: Set(cotizacion_id),
            empleado_id: Set(payload.empleado_id),
            estado: Set(estado),
            materiales_usados: Set(materiales.to_json()),
            fecha_inicio_estimada: Set(payload
                .fecha_inicio_estimada
                .as_deref()
                .and_then(parse_timestamp)
                .map(Into::into)),
            fecha_fin_estimada: Set(payload
                .fecha_fin_estimada
                .as_deref()
                .and_then(parse_timestamp)
                .map(Into::into)),
            fecha_inicio_real: Set(stamp_inicio.then_some(now)),
            fecha_fin_real: Set(stamp_fin.then_some(now)),
            notas: Set(trimmed(payload.notas)),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user),
        "trabajo_create",
        "trabajos",
        serde_json::json!({ "trabajo_id": trabajo.id, "cotizacion_id": cotizacion_id }),
    )
    .await;

    if estado.completes_quote() {
        cascade_quote_completion(state, trabajo.id, cotizacion_id).await;
    }

    Ok(ApiResponse::success(
        "Job created",
        Trabajo::from(trabajo),
        Some(Meta::empty()),
    ))
}

pub async fn update_trabajo(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTrabajoRequest,
) -> AppResult<ApiResponse<Trabajo>> {
    ensure_staff(user)?;
    let existing = trabajo_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;

    let mut changes: ActiveModel = Default::default();

    if let Some(empleado_id) = payload.empleado_id {
        if empleado_id != existing.empleado_id {
            if let Some(empleado_id) = empleado_id {
                ensure_employee_exists(state, empleado_id).await?;
            }
            changes.empleado_id = Set(empleado_id);
        }
    }
    if let Some(materiales) = payload.materiales_usados {
        materiales.validate()?;
        changes.materiales_usados = Set(materiales.to_json());
    }
    if let Some(fecha) = patch_timestamp(&payload.fecha_inicio_estimada) {
        changes.fecha_inicio_estimada = Set(fecha.map(Into::into));
    }
    if let Some(fecha) = patch_timestamp(&payload.fecha_fin_estimada) {
        changes.fecha_fin_estimada = Set(fecha.map(Into::into));
    }
    let inicio_real = patch_timestamp(&payload.fecha_inicio_real);
    let fin_real = patch_timestamp(&payload.fecha_fin_real);
    if let Some(fecha) = inicio_real {
        changes.fecha_inicio_real = Set(fecha.map(Into::into));
    }
    if let Some(fecha) = fin_real {
        changes.fecha_fin_real = Set(fecha.map(Into::into));
    }
    if let Some(notas) = payload.notas {
        changes.notas = Set(trimmed(notas));
    }

    let mut delivered = false;
    if let Some(next) = payload.estado {
        ensure_transition(existing.estado, next)?;
        if next != existing.estado {
            let inicio_set = inicio_real.map_or(existing.fecha_inicio_real.is_some(), |f| f.is_some());
            let fin_set = fin_real.map_or(existing.fecha_fin_real.is_some(), |f| f.is_some());
            let (stamp_inicio, stamp_fin) =
                real_dates_to_stamp(Some(existing.estado), next, inicio_set, fin_set);
            let now: DateTimeWithTimeZone = Utc::now().into();
            if stamp_inicio {
                changes.fecha_inicio_real = Set(Some(now));
            }
            if stamp_fin {
                changes.fecha_fin_real = Set(Some(now));
            }
            delivered = next.completes_quote();
            changes.estado = Set(next);
        }
    }

    if !trabajo_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            Trabajo::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = trabajo_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Job"))?;

    audit::record(
        &state.pool,
        Some(user),
        "trabajo_update",
        "trabajos",
        serde_json::json!({ "trabajo_id": id, "estado": updated.estado.label() }),
    )
    .await;

    if delivered {
        cascade_quote_completion(state, id, updated.cotizacion_id).await;
    }

    Ok(ApiResponse::success(
        "Job updated",
        Trabajo::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_trabajo(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_management(user)?;
    if !trabajo_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Job"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "trabajo_delete",
        "trabajos",
        serde_json::json!({ "trabajo_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Job deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
