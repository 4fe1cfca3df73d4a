use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::cotizaciones::{CotizacionList, CreateCotizacionRequest, UpdateCotizacionRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Cotizacion,
    response::ApiResponse,
    routes::params::CotizacionListQuery,
    services::cotizacion_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cotizaciones).post(create_cotizacion))
        .route(
            "/{id}",
            get(get_cotizacion).put(update_cotizacion).delete(delete_cotizacion),
        )
}

#[utoipa::path(
    get,
    path = "/api/cotizaciones",
    params(CotizacionListQuery),
    responses(
        (status = 200, description = "List quotes; clients only see their own", body = ApiResponse<CotizacionList>),
        (status = 403, description = "Not a staff member or owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Cotizaciones"
)]
pub async fn list_cotizaciones(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<CotizacionListQuery>,
) -> AppResult<Json<ApiResponse<CotizacionList>>> {
    let resp = cotizacion_service::list_cotizaciones(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cotizaciones",
    request_body = CreateCotizacionRequest,
    responses(
        (status = 201, description = "Create quote", body = ApiResponse<Cotizacion>),
        (status = 404, description = "Client or base material not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cotizaciones"
)]
pub async fn create_cotizacion(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateCotizacionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cotizacion>>)> {
    let resp = cotizacion_service::create_cotizacion(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/cotizaciones/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Get quote", body = ApiResponse<Cotizacion>),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cotizaciones"
)]
pub async fn get_cotizacion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cotizacion>>> {
    let resp = cotizacion_service::get_cotizacion(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cotizaciones/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = UpdateCotizacionRequest,
    responses(
        (status = 200, description = "Update quote", body = ApiResponse<Cotizacion>),
        (status = 400, description = "Deposit above the required amount or invalid status change"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cotizaciones"
)]
pub async fn update_cotizacion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCotizacionRequest>,
) -> AppResult<Json<ApiResponse<Cotizacion>>> {
    let resp = cotizacion_service::update_cotizacion(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cotizaciones/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Delete quote"),
        (status = 409, description = "Quote still has a job")
    ),
    security(("bearer_auth" = [])),
    tag = "Cotizaciones"
)]
pub async fn delete_cotizacion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cotizacion_service::delete_cotizacion(&state, &user, id).await?;
    Ok(Json(resp))
}
