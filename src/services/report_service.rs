use chrono::{Datelike, Utc};

use crate::{
    dto::reports::{
        CotizacionesPorEstado, Dashboard, IngresoMensual, IngresosMensuales, IngresosQuery,
        PeticionPendiente, TrabajosPorEstado,
    },
    enums::{EstadoCotizacion, EstadoPeticion},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management},
    response::{ApiResponse, Meta},
    state::AppState,
};

async fn quotes_by_status(state: &AppState) -> AppResult<Vec<CotizacionesPorEstado>> {
    let rows = sqlx::query_as::<_, CotizacionesPorEstado>(
        r#"
        SELECT estado,
               COUNT(*)::BIGINT AS cantidad,
               COALESCE(SUM(total_estimado), 0)::DOUBLE PRECISION AS total_estimado
        FROM cotizaciones
        GROUP BY estado
        ORDER BY estado
        "#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

async fn jobs_by_status(state: &AppState) -> AppResult<Vec<TrabajosPorEstado>> {
    let rows = sqlx::query_as::<_, TrabajosPorEstado>(
        r#"
        SELECT estado, COUNT(*)::BIGINT AS cantidad
        FROM trabajos
        GROUP BY estado
        ORDER BY estado
        "#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

async fn pending_requests(state: &AppState) -> AppResult<Vec<PeticionPendiente>> {
    let rows = sqlx::query_as::<_, PeticionPendiente>(
        r#"
        SELECT p.id, p.cotizacion_id, p.trabajo_id, p.material_codigo,
               p.cantidad_requerida, p.notificado_gerente, p.created_at,
               m.nombre AS material_nombre, m.unidad_medida, m.costo_unitario
        FROM peticiones_material p
        JOIN materiales m ON m.codigo = p.material_codigo
        WHERE p.estado = $1
        ORDER BY p.created_at ASC
        "#,
    )
    .bind(EstadoPeticion::PendienteCompra.label())
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

/// Parses `A,B` into known quote statuses. Blank input means every status.
fn parse_estados(raw: Option<&str>) -> AppResult<Vec<EstadoCotizacion>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|label| {
            EstadoCotizacion::from_label(label)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown quote status '{label}'")))
        })
        .collect()
}

/// One entry per month, January first, with gaps filled by zeros.
fn fill_months(rows: Vec<IngresoMensual>) -> Vec<IngresoMensual> {
    (1..=12)
        .map(|mes| {
            rows.iter()
                .find(|row| row.mes == mes)
                .cloned()
                .unwrap_or(IngresoMensual {
                    mes,
                    cantidad: 0,
                    total_estimado: 0.0,
                    anticipos_pagados: 0.0,
                })
        })
        .collect()
}

pub async fn cotizaciones_por_estado(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<CotizacionesPorEstado>>> {
    ensure_management(user)?;
    let rows = quotes_by_status(state).await?;
    let meta = Meta::total(rows.len() as u64);
    Ok(ApiResponse::success("Quotes by status", rows, Some(meta)))
}

pub async fn trabajos_por_estado(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<TrabajosPorEstado>>> {
    ensure_management(user)?;
    let rows = jobs_by_status(state).await?;
    let meta = Meta::total(rows.len() as u64);
    Ok(ApiResponse::success("Jobs by status", rows, Some(meta)))
}

pub async fn peticiones_pendientes(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<PeticionPendiente>>> {
    ensure_management(user)?;
    let rows = pending_requests(state).await?;
    let meta = Meta::total(rows.len() as u64);
    Ok(ApiResponse::success(
        "Pending material requests",
        rows,
        Some(meta),
    ))
}

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Dashboard>> {
    ensure_management(user)?;
    let (cotizaciones_por_estado, trabajos_por_estado, peticiones_pendientes) = tokio::try_join!(
        quotes_by_status(state),
        jobs_by_status(state),
        pending_requests(state),
    )?;

    Ok(ApiResponse::success(
        "Dashboard",
        Dashboard {
            cotizaciones_por_estado,
            trabajos_por_estado,
            peticiones_pendientes,
        },
        None,
    ))
}

pub async fn ingresos_mensuales(
    state: &AppState,
    user: &AuthUser,
    query: IngresosQuery,
) -> AppResult<ApiResponse<IngresosMensuales>> {
    ensure_management(user)?;
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let estados: Vec<String> = parse_estados(query.estados.as_deref())?
        .into_iter()
        .map(|estado| estado.label().to_string())
        .collect();
    let filter = (!estados.is_empty()).then(|| estados.clone());

    let rows = sqlx::query_as::<_, IngresoMensual>(
        r#"
        SELECT EXTRACT(MONTH FROM created_at)::INT AS mes,
               COUNT(*)::BIGINT AS cantidad,
               COALESCE(SUM(total_estimado), 0)::DOUBLE PRECISION AS total_estimado,
               COALESCE(SUM(monto_anticipo_pagado), 0)::DOUBLE PRECISION AS anticipos_pagados
        FROM cotizaciones
        WHERE EXTRACT(YEAR FROM created_at)::INT = $1
          AND ($2::TEXT[] IS NULL OR estado = ANY($2))
        GROUP BY mes
        ORDER BY mes
        "#,
    )
    .bind(year)
    .bind(filter)
    .fetch_all(&state.pool)
    .await?;

    tracing::debug!(year, months_with_data = rows.len(), "monthly revenue computed");

    Ok(ApiResponse::success(
        "Monthly revenue",
        IngresosMensuales {
            year,
            estados,
            meses: fill_months(rows),
        },
        Some(Meta::total(12)),
    ))
}
