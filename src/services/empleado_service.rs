use sea_orm::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::empleados::{CreateEmpleadoRequest, EmpleadoList, UpdateEmpleadoRequest},
    entity::empleados::ActiveModel,
    enums::Role,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_management},
    models::Empleado,
    repositories::empleado_repo::{self, EmpleadoFilter},
    response::{ApiResponse, Meta},
    routes::params::EmpleadoListQuery,
    services::{auth_service::hash_password, non_blank, page_meta, required},
    state::AppState,
};

fn employee_role(rol: Role) -> AppResult<Role> {
    if rol.is_staff() {
        Ok(rol)
    } else {
        Err(AppError::BadRequest(
            "rol must be one of empleado, gerente, admin".into(),
        ))
    }
}

/// Admin accounts, and promotions to admin, are reserved to admins.
fn ensure_can_modify(user: &AuthUser, rol: Role) -> AppResult<()> {
    if rol == Role::Admin {
        ensure_admin(user)?;
    }
    Ok(())
}

pub async fn list_empleados(
    state: &AppState,
    user: &AuthUser,
    query: EmpleadoListQuery,
) -> AppResult<ApiResponse<EmpleadoList>> {
    ensure_management(user)?;
    let filter = EmpleadoFilter {
        q: query.q.clone(),
        rol: query.rol,
        activo: query.activo,
    };

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page = empleado_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(Empleado::from).items, meta)
        }
        None => {
            let items: Vec<Empleado> = empleado_repo::find_all(&state.orm, &filter)
                .await?
                .into_iter()
                .map(Empleado::from)
                .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success("Employees", EmpleadoList { items }, Some(meta)))
}

pub async fn get_empleado(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Empleado>> {
    if user.user_id != id || !user.is_staff() {
        ensure_management(user)?;
    }
    let empleado = empleado_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Employee"))?;
    Ok(ApiResponse::success("Employee", Empleado::from(empleado), None))
}

pub async fn create_empleado(
    state: &AppState,
    user: &AuthUser,
    payload: CreateEmpleadoRequest,
) -> AppResult<ApiResponse<Empleado>> {
    ensure_management(user)?;
    let nombre = required(payload.nombre, "nombre")?;
    let username = required(payload.username, "username")?;
    let contacto = crate::dto::fields::trimmed(payload.contacto);
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".into()))?;
    let rol = employee_role(payload.rol.unwrap_or(Role::Empleado))?;
    ensure_can_modify(user, rol)?;

    if empleado_repo::find_by_username(&state.orm, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username is already in use".into()));
    }
    if let Some(contacto) = contacto.as_deref() {
        if empleado_repo::find_by_contact(&state.orm, contacto)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("contacto is already in use".into()));
        }
    }

    let empleado = empleado_repo::create(
        &state.orm,
        ActiveModel {
            nombre: Set(nombre),
            contacto: Set(contacto),
            username: Set(username),
            password_hash: Set(hash_password(&password)?),
            rol: Set(rol),
            activo: Set(payload.activo.unwrap_or(true)),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user),
        "empleado_create",
        "empleados",
        serde_json::json!({ "empleado_id": empleado.id, "rol": rol }),
    )
    .await;

    Ok(ApiResponse::success(
        "Employee created",
        Empleado::from(empleado),
        Some(Meta::empty()),
    ))
}

pub async fn update_empleado(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateEmpleadoRequest,
) -> AppResult<ApiResponse<Empleado>> {
    ensure_management(user)?;
    let existing = empleado_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Employee"))?;
    ensure_can_modify(user, existing.rol)?;

    let mut changes: ActiveModel = Default::default();
    if let Some(nombre) = non_blank(payload.nombre, "nombre")? {
        changes.nombre = Set(nombre);
    }
    if let Some(contacto) = payload.contacto {
        let contacto = crate::dto::fields::trimmed(contacto);
        if contacto != existing.contacto {
            if let Some(value) = contacto.as_deref() {
                let taken = empleado_repo::find_by_contact(&state.orm, value).await?;
                if taken.is_some_and(|e| e.id != id) {
                    return Err(AppError::Conflict("contacto is already in use".into()));
                }
            }
            changes.contacto = Set(contacto);
        }
    }
    if let Some(username) = non_blank(payload.username, "username")? {
        if username != existing.username {
            let taken = empleado_repo::find_by_username(&state.orm, &username).await?;
            if taken.is_some_and(|e| e.id != id) {
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
    if let Some(rol) = payload.rol {
        let rol = employee_role(rol)?;
        ensure_can_modify(user, rol)?;
        changes.rol = Set(rol);
    }
    if let Some(activo) = payload.activo {
        changes.activo = Set(activo);
    }

    if !empleado_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            Empleado::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = empleado_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Employee"))?;

    audit::record(
        &state.pool,
        Some(user),
        "empleado_update",
        "empleados",
        serde_json::json!({ "empleado_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Employee updated",
        Empleado::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_empleado(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if user.user_id == id {
        return Err(AppError::BadRequest("Cannot delete your own account".into()));
    }
    if !empleado_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Employee"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "empleado_delete",
        "empleados",
        serde_json::json!({ "empleado_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Employee deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_cannot_be_employees() {
        assert!(employee_role(Role::Gerente).is_ok());
        assert!(matches!(
            employee_role(Role::Cliente),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn only_admins_touch_admin_accounts() {
        let gerente = AuthUser {
            user_id: Uuid::new_v4(),
            username: "gerente".into(),
            role: Role::Gerente,
        };
        let admin = AuthUser {
            role: Role::Admin,
            ..gerente.clone()
        };
        assert!(ensure_can_modify(&gerente, Role::Empleado).is_ok());
        assert!(ensure_can_modify(&gerente, Role::Gerente).is_ok());
        assert!(matches!(
            ensure_can_modify(&gerente, Role::Admin),
            Err(AppError::Forbidden)
        ));
        assert!(ensure_can_modify(&admin, Role::Admin).is_ok());
    }
}
