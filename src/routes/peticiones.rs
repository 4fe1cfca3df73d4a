use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::peticiones::{PeticionList, CreatePeticionRequest, UpdatePeticionRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::PeticionMaterial,
    response::ApiResponse,
    routes::params::PeticionListQuery,
    services::peticion_material_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_peticiones).post(create_peticion))
        .route(
            "/{id}",
            get(get_peticion).put(update_peticion).delete(delete_peticion),
        )
}

#[utoipa::path(
    get,
    path = "/api/peticiones-material",
    params(PeticionListQuery),
    responses(
        (status = 200, description = "List material requests", body = ApiResponse<PeticionList>),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = [])),
    tag = "Peticiones"
)]
pub async fn list_peticiones(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<PeticionListQuery>,
) -> AppResult<Json<ApiResponse<PeticionList>>> {
    let resp = peticion_material_service::list_peticiones(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/peticiones-material",
    request_body = CreatePeticionRequest,
    responses(
        (status = 201, description = "Create material request", body = ApiResponse<PeticionMaterial>),
        (status = 404, description = "Referenced material, quote or job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Peticiones"
)]
pub async fn create_peticion(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreatePeticionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PeticionMaterial>>)> {
    let resp = peticion_material_service::create_peticion(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/peticiones-material/{id}",
    params(("id" = Uuid, Path, description = "Material request ID")),
    responses(
        (status = 200, description = "Get material request", body = ApiResponse<PeticionMaterial>),
        (status = 404, description = "Material request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Peticiones"
)]
pub async fn get_peticion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PeticionMaterial>>> {
    let resp = peticion_material_service::get_peticion(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/peticiones-material/{id}",
    params(("id" = Uuid, Path, description = "Material request ID")),
    request_body = UpdatePeticionRequest,
    responses(
        (status = 200, description = "Update material request", body = ApiResponse<PeticionMaterial>),
        (status = 404, description = "Material request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Peticiones"
)]
pub async fn update_peticion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePeticionRequest>,
) -> AppResult<Json<ApiResponse<PeticionMaterial>>> {
    let resp = peticion_material_service::update_peticion(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/peticiones-material/{id}",
    params(("id" = Uuid, Path, description = "Material request ID")),
    responses(
        (status = 200, description = "Delete material request"),
        (status = 403, description = "Management only")
    ),
    security(("bearer_auth" = [])),
    tag = "Peticiones"
)]
pub async fn delete_peticion(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = peticion_material_service::delete_peticion(&state, &user, id).await?;
    Ok(Json(resp))
}
