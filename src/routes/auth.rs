use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        clientes::CreateClienteRequest,
    },
    error::AppResult,
    extract::AppJson,
    models::Cliente,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cliente/register", post(register_cliente))
        .route("/cliente/login", post(login_cliente))
        .route("/empleado/login", post(login_empleado))
}

#[utoipa::path(
    post,
    path = "/api/auth/cliente/register",
    request_body = CreateClienteRequest,
    responses(
        (status = 201, description = "Register client", body = ApiResponse<Cliente>),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Username or contact already in use")
    ),
    tag = "Auth"
)]
pub async fn register_cliente(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClienteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cliente>>)> {
    let resp = auth_service::register_cliente(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/cliente/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Client login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login_cliente(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_cliente(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/empleado/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Employee login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login_empleado(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_empleado(&state, payload).await?;
    Ok(Json(resp))
}
