use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::reports::{
        CotizacionesPorEstado, Dashboard, IngresosMensuales, IngresosQuery, PeticionPendiente,
        TrabajosPorEstado,
    },
    error::AppResult,
    extract::AppQuery,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cotizaciones-por-estado", get(cotizaciones_por_estado))
        .route("/trabajos-por-estado", get(trabajos_por_estado))
        .route("/peticiones-pendientes", get(peticiones_pendientes))
        .route("/dashboard", get(dashboard))
        .route("/ingresos-mensuales", get(ingresos_mensuales))
}

#[utoipa::path(
    get,
    path = "/api/reports/cotizaciones-por-estado",
    responses(
        (status = 200, description = "Quote count and estimated total per status", body = ApiResponse<Vec<CotizacionesPorEstado>>),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn cotizaciones_por_estado(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<CotizacionesPorEstado>>>> {
    let resp = report_service::cotizaciones_por_estado(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/trabajos-por-estado",
    responses(
        (status = 200, description = "Job count per status", body = ApiResponse<Vec<TrabajosPorEstado>>),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn trabajos_por_estado(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<TrabajosPorEstado>>>> {
    let resp = report_service::trabajos_por_estado(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/peticiones-pendientes",
    responses(
        (status = 200, description = "Material requests waiting for purchase, oldest first", body = ApiResponse<Vec<PeticionPendiente>>),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn peticiones_pendientes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<PeticionPendiente>>>> {
    let resp = report_service::peticiones_pendientes(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    responses(
        (status = 200, description = "All three reports in one response", body = ApiResponse<Dashboard>),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let resp = report_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/ingresos-mensuales",
    params(IngresosQuery),
    responses(
        (status = 200, description = "Twelve months of quote revenue", body = ApiResponse<IngresosMensuales>),
        (status = 400, description = "Unknown status in estados"),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn ingresos_mensuales(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<IngresosQuery>,
) -> AppResult<Json<ApiResponse<IngresosMensuales>>> {
    let resp = report_service::ingresos_mensuales(&state, &user, query).await?;
    Ok(Json(resp))
}
