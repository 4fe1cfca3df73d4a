use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::empleados::{EmpleadoList, CreateEmpleadoRequest, UpdateEmpleadoRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Empleado,
    response::ApiResponse,
    routes::params::EmpleadoListQuery,
    services::empleado_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_empleados).post(create_empleado))
        .route(
            "/{id}",
            get(get_empleado).put(update_empleado).delete(delete_empleado),
        )
}

#[utoipa::path(
    get,
    path = "/api/empleados",
    params(EmpleadoListQuery),
    responses(
        (status = 200, description = "List employees", body = ApiResponse<EmpleadoList>),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Empleados"
)]
pub async fn list_empleados(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<EmpleadoListQuery>,
) -> AppResult<Json<ApiResponse<EmpleadoList>>> {
    let resp = empleado_service::list_empleados(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/empleados",
    request_body = CreateEmpleadoRequest,
    responses(
        (status = 201, description = "Create employee", body = ApiResponse<Empleado>),
        (status = 409, description = "Username or contact already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Empleados"
)]
pub async fn create_empleado(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateEmpleadoRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Empleado>>)> {
    let resp = empleado_service::create_empleado(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/empleados/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get employee", body = ApiResponse<Empleado>),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Empleados"
)]
pub async fn get_empleado(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Empleado>>> {
    let resp = empleado_service::get_empleado(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/empleados/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmpleadoRequest,
    responses(
        (status = 200, description = "Update employee", body = ApiResponse<Empleado>),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Empleados"
)]
pub async fn update_empleado(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateEmpleadoRequest>,
) -> AppResult<Json<ApiResponse<Empleado>>> {
    let resp = empleado_service::update_empleado(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/empleados/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Delete employee"),
        (status = 409, description = "Employee still assigned to jobs")
    ),
    security(("bearer_auth" = [])),
    tag = "Empleados"
)]
pub async fn delete_empleado(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = empleado_service::delete_empleado(&state, &user, id).await?;
    Ok(Json(resp))
}
