use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::materiales::{CreateMaterialRequest, MaterialList, UpdateMaterialRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Material,
    response::ApiResponse,
    routes::params::MaterialListQuery,
    services::material_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materiales).post(create_material))
        .route("/codigo/{codigo}", get(get_material_by_code))
        .route(
            "/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
}

// Reads only need a valid token, whatever the role.

#[utoipa::path(
    get,
    path = "/api/materiales",
    params(MaterialListQuery),
    responses(
        (status = 200, description = "List materials", body = ApiResponse<MaterialList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn list_materiales(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(query): AppQuery<MaterialListQuery>,
) -> AppResult<Json<ApiResponse<MaterialList>>> {
    let resp = material_service::list_materiales(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/materiales/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Get material", body = ApiResponse<Material>),
        (status = 404, description = "Material not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn get_material(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let resp = material_service::get_material(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/materiales/codigo/{codigo}",
    params(("codigo" = String, Path, description = "Material code")),
    responses(
        (status = 200, description = "Get material by code", body = ApiResponse<Material>),
        (status = 404, description = "Material not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn get_material_by_code(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(codigo): AppPath<String>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let resp = material_service::get_material_by_code(&state, &codigo).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/materiales",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Create material", body = ApiResponse<Material>),
        (status = 400, description = "Missing name, unit or cost"),
        (status = 409, description = "Code or name already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn create_material(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateMaterialRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Material>>)> {
    let resp = material_service::create_material(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/materiales/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Update material", body = ApiResponse<Material>),
        (status = 404, description = "Material not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn update_material(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateMaterialRequest>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let resp = material_service::update_material(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/materiales/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Delete material"),
        (status = 409, description = "Material still referenced")
    ),
    security(("bearer_auth" = [])),
    tag = "Materiales"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = material_service::delete_material(&state, &user, id).await?;
    Ok(Json(resp))
}
