use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::trabajos::{CreateTrabajoRequest, TrabajoList, UpdateTrabajoRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Trabajo,
    response::ApiResponse,
    routes::params::TrabajoListQuery,
    services::trabajo_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trabajos).post(create_trabajo))
        .route("/cotizacion/{cotizacion_id}", get(get_trabajo_by_quote))
        .route(
            "/{id}",
            get(get_trabajo).put(update_trabajo).delete(delete_trabajo),
        )
}

#[utoipa::path(
    get,
    path = "/api/trabajos",
    params(TrabajoListQuery),
    responses(
        (status = 200, description = "List jobs", body = ApiResponse<TrabajoList>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn list_trabajos(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<TrabajoListQuery>,
) -> AppResult<Json<ApiResponse<TrabajoList>>> {
    let resp = trabajo_service::list_trabajos(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/trabajos",
    request_body = CreateTrabajoRequest,
    responses(
        (status = 201, description = "Create job", body = ApiResponse<Trabajo>),
        (status = 404, description = "Quote or employee not found"),
        (status = 409, description = "A job already exists for this quote")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn create_trabajo(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateTrabajoRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Trabajo>>)> {
    let resp = trabajo_service::create_trabajo(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/trabajos/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Get job", body = ApiResponse<Trabajo>),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn get_trabajo(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Trabajo>>> {
    let resp = trabajo_service::get_trabajo(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/trabajos/cotizacion/{cotizacion_id}",
    params(("cotizacion_id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Job for a quote", body = ApiResponse<Trabajo>),
        (status = 404, description = "No job for this quote")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn get_trabajo_by_quote(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(cotizacion_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Trabajo>>> {
    let resp = trabajo_service::get_trabajo_by_quote(&state, &user, cotizacion_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/trabajos/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateTrabajoRequest,
    responses(
        (status = 200, description = "Update job; delivering it completes the quote", body = ApiResponse<Trabajo>),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn update_trabajo(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTrabajoRequest>,
) -> AppResult<Json<ApiResponse<Trabajo>>> {
    let resp = trabajo_service::update_trabajo(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/trabajos/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Delete job"),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Trabajos"
)]
pub async fn delete_trabajo(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = trabajo_service::delete_trabajo(&state, &user, id).await?;
    Ok(Json(resp))
}
