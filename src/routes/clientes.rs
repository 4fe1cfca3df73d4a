use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::clientes::{ClienteList, CreateClienteRequest, UpdateClienteRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Cliente,
    response::ApiResponse,
    routes::params::ClienteListQuery,
    services::cliente_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clientes).post(create_cliente))
        .route(
            "/{id}",
            get(get_cliente).put(update_cliente).delete(delete_cliente),
        )
}

#[utoipa::path(
    get,
    path = "/api/clientes",
    params(ClienteListQuery),
    responses(
        (status = 200, description = "List clients", body = ApiResponse<ClienteList>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "Clientes"
)]
pub async fn list_clientes(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ClienteListQuery>,
) -> AppResult<Json<ApiResponse<ClienteList>>> {
    let resp = cliente_service::list_clientes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/clientes",
    request_body = CreateClienteRequest,
    responses(
        (status = 201, description = "Create client", body = ApiResponse<Cliente>),
        (status = 409, description = "Username or contact already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Clientes"
)]
pub async fn create_cliente(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateClienteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cliente>>)> {
    let resp = cliente_service::create_cliente(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Get client", body = ApiResponse<Cliente>),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Clientes"
)]
pub async fn get_cliente(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cliente>>> {
    let resp = cliente_service::get_cliente(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClienteRequest,
    responses(
        (status = 200, description = "Update client", body = ApiResponse<Cliente>),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Clientes"
)]
pub async fn update_cliente(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateClienteRequest>,
) -> AppResult<Json<ApiResponse<Cliente>>> {
    let resp = cliente_service::update_cliente(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Delete client"),
        (status = 409, description = "Client still has quotes")
    ),
    security(("bearer_auth" = [])),
    tag = "Clientes"
)]
pub async fn delete_cliente(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cliente_service::delete_cliente(&state, &user, id).await?;
    Ok(Json(resp))
}
