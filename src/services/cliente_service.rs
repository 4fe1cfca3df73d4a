use sea_orm::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::clientes::{ClienteList, CreateClienteRequest, UpdateClienteRequest},
    entity::clientes::ActiveModel,
    enums::Role,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management, ensure_staff, ensure_staff_or_self},
    models::Cliente,
    repositories::cliente_repo::{self, ClienteFilter},
    response::{ApiResponse, Meta},
    routes::params::ClienteListQuery,
    services::{auth_service::hash_password, non_blank, page_meta, required},
    state::AppState,
};

pub async fn list_clientes(
    state: &AppState,
    user: &AuthUser,
    query: ClienteListQuery,
) -> AppResult<ApiResponse<ClienteList>> {
    ensure_staff(user)?;
    let filter = ClienteFilter { q: query.q.clone() };

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page = cliente_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(Cliente::from).items, meta)
        }
        None => {
            let items: Vec<Cliente> = cliente_repo::find_all(&state.orm, &filter)
                .await?
                .into_iter()
                .map(Cliente::from)
                .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success("Clients", ClienteList { items }, Some(meta)))
}

pub async fn get_cliente(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Cliente>> {
    ensure_staff_or_self(user, Role::Cliente, id)?;
    let cliente = cliente_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Client"))?;
    Ok(ApiResponse::success("Client", Cliente::from(cliente), None))
}

pub async fn create_cliente(
    state: &AppState,
    user: &AuthUser,
    payload: CreateClienteRequest,
) -> AppResult<ApiResponse<Cliente>> {
    ensure_staff(user)?;
    let cliente = insert_cliente(state, Some(user), payload).await?;
    Ok(ApiResponse::success(
        "Client created",
        cliente,
        Some(Meta::empty()),
    ))
}

/// Shared by staff-driven creation and self registration.
pub(crate) async fn insert_cliente(
    state: &AppState,
    actor: Option<&AuthUser>,
    payload: CreateClienteRequest,
) -> AppResult<Cliente> {
    let nombre = required(payload.nombre, "nombre")?;
    let contacto = required(payload.contacto, "contacto")?;
    let username = required(payload.username, "username")?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".into()))?;

    if cliente_repo::find_by_username(&state.orm, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username is already in use".into()));
    }
    if cliente_repo::find_by_contact(&state.orm, &contacto)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("contacto is already in use".into()));
    }

    let password_hash = hash_password(&password)?;
    let cliente = cliente_repo::create(
        &state.orm,
        ActiveModel {
            nombre: Set(nombre),
            contacto: Set(contacto),
            username: Set(username),
            password_hash: Set(password_hash),
            rol: Set(Role::Cliente),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        actor,
        "cliente_create",
        "clientes",
        serde_json::json!({ "cliente_id": cliente.id }),
    )
    .await;

    Ok(Cliente::from(cliente))
}

pub async fn update_cliente(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateClienteRequest,
) -> AppResult<ApiResponse<Cliente>> {
    ensure_staff_or_self(user, Role::Cliente, id)?;
    let existing = cliente_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Client"))?;

    let mut changes: ActiveModel = Default::default();
    if let Some(nombre) = non_blank(payload.nombre, "nombre")? {
        changes.nombre = Set(nombre);
    }
    if let Some(contacto) = non_blank(payload.contacto, "contacto")? {
        if contacto != existing.contacto {
            let taken = cliente_repo::find_by_contact(&state.orm, &contacto).await?;
            if taken.is_some_and(|c| c.id != id) {
                return Err(AppError::Conflict("contacto is already in use".into()));
            }
            changes.contacto = Set(contacto);
        }
    }
    if let Some(username) = non_blank(payload.username, "username")? {
        if username != existing.username {
            let taken = cliente_repo::find_by_username(&state.orm, &username).await?;
            if taken.is_some_and(|c| c.id != id) {
                return Err(AppError::Conflict("username is already in use".into()));
            }
            changes.username = Set(username);
        }
    }
    if let Some(password) = payload.password {
        if password.is_empty() {
            return Err(AppError::BadRequest("password is required".into()));
        }
        changes.password_hash = Set(hash_password(&password)?);
    }

    if !cliente_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            Cliente::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = cliente_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Client"))?;

    audit::record(
        &state.pool,
        Some(user),
        "cliente_update",
        "clientes",
        serde_json::json!({ "cliente_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Client updated",
        Cliente::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_cliente(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_management(user)?;
    if !cliente_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Client"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "cliente_delete",
        "clientes",
        serde_json::json!({ "cliente_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Client deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
