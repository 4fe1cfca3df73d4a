use sea_orm::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        fields::trimmed,
        peticiones::{CreatePeticionRequest, PeticionList, UpdatePeticionRequest},
    },
    entity::peticiones_material::ActiveModel,
    enums::EstadoPeticion,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management, ensure_staff},
    models::PeticionMaterial,
    repositories::{
        cotizacion_repo, material_repo,
        peticion_material_repo::{self, PeticionFilter},
        trabajo_repo,
    },
    response::{ApiResponse, Meta},
    routes::params::PeticionListQuery,
    services::{non_blank, page_meta, required},
    state::AppState,
};

fn ensure_reference(cotizacion_id: Option<Uuid>, trabajo_id: Option<Uuid>) -> AppResult<()> {
    if cotizacion_id.is_none() && trabajo_id.is_none() {
        return Err(AppError::BadRequest(
            "Either cotizacion_id or trabajo_id is required".into(),
        ));
    }
    Ok(())
}

fn required_quantity(cantidad: f64) -> AppResult<f64> {
    if cantidad.is_finite() && cantidad > 0.0 {
        Ok(cantidad)
    } else {
        Err(AppError::BadRequest(
            "cantidad_requerida must be greater than 0".into(),
        ))
    }
}

async fn ensure_targets_exist(
    state: &AppState,
    material_codigo: Option<&str>,
    cotizacion_id: Option<Uuid>,
    trabajo_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(codigo) = material_codigo {
        if material_repo::find_by_code(&state.orm, codigo)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Material"));
        }
    }
    if let Some(id) = cotizacion_id {
        if cotizacion_repo::find_by_id(&state.orm, id).await?.is_none() {
            return Err(AppError::NotFound("Quote"));
        }
    }
    if let Some(id) = trabajo_id {
        if trabajo_repo::find_by_id(&state.orm, id).await?.is_none() {
            return Err(AppError::NotFound("Job"));
        }
    }
    Ok(())
}

pub async fn list_peticiones(
    state: &AppState,
    user: &AuthUser,
    query: PeticionListQuery,
) -> AppResult<ApiResponse<PeticionList>> {
    ensure_staff(user)?;
    let filter = PeticionFilter {
        estado: query.estado,
        cotizacion_id: query.cotizacion_id,
        trabajo_id: query.trabajo_id,
        material_codigo: query.material_codigo.clone(),
    };

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page =
                peticion_material_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(PeticionMaterial::from).items, meta)
        }
        None => {
            let items: Vec<PeticionMaterial> =
                peticion_material_repo::find_all(&state.orm, &filter)
                    .await?
                    .into_iter()
                    .map(PeticionMaterial::from)
                    .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success(
        "Material requests",
        PeticionList { items },
        Some(meta),
    ))
}

pub async fn get_peticion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PeticionMaterial>> {
    ensure_staff(user)?;
    let peticion = peticion_material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material request"))?;
    Ok(ApiResponse::success(
        "Material request",
        PeticionMaterial::from(peticion),
        None,
    ))
}

pub async fn create_peticion(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePeticionRequest,
) -> AppResult<ApiResponse<PeticionMaterial>> {
    ensure_staff(user)?;
    ensure_reference(payload.cotizacion_id, payload.trabajo_id)?;
    let material_codigo = required(payload.material_codigo, "material_codigo")?;
    let cantidad = payload
        .cantidad_requerida
        .ok_or_else(|| AppError::BadRequest("cantidad_requerida is required".into()))
        .and_then(required_quantity)?;

    ensure_targets_exist(
        state,
        Some(&material_codigo),
        payload.cotizacion_id,
        payload.trabajo_id,
    )
    .await?;

    let peticion = peticion_material_repo::create(
        &state.orm,
        ActiveModel {
            cotizacion_id: Set(payload.cotizacion_id),
            trabajo_id: Set(payload.trabajo_id),
            material_codigo: Set(material_codigo),
            cantidad_requerida: Set(cantidad),
            estado: Set(payload.estado.unwrap_or(EstadoPeticion::PendienteCompra)),
            notificado_gerente: Set(false),
            notas: Set(trimmed(payload.notas)),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user),
        "peticion_create",
        "peticiones_material",
        serde_json::json!({
            "peticion_id": peticion.id,
            "material_codigo": peticion.material_codigo,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material request created",
        PeticionMaterial::from(peticion),
        Some(Meta::empty()),
    ))
}

pub async fn update_peticion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePeticionRequest,
) -> AppResult<ApiResponse<PeticionMaterial>> {
    ensure_staff(user)?;
    let existing = peticion_material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material request"))?;

    let cotizacion_id = payload.cotizacion_id.unwrap_or(existing.cotizacion_id);
    let trabajo_id = payload.trabajo_id.unwrap_or(existing.trabajo_id);
    ensure_reference(cotizacion_id, trabajo_id)?;

    let material_codigo = non_blank(payload.material_codigo, "material_codigo")?
        .filter(|codigo| *codigo != existing.material_codigo);
    ensure_targets_exist(
        state,
        material_codigo.as_deref(),
        payload.cotizacion_id.flatten(),
        payload.trabajo_id.flatten(),
    )
    .await?;

    let mut changes: ActiveModel = Default::default();
    if let Some(cotizacion_id) = payload.cotizacion_id {
        changes.cotizacion_id = Set(cotizacion_id);
    }
    if let Some(trabajo_id) = payload.trabajo_id {
        changes.trabajo_id = Set(trabajo_id);
    }
    if let Some(codigo) = material_codigo {
        changes.material_codigo = Set(codigo);
    }
    if let Some(cantidad) = payload.cantidad_requerida {
        changes.cantidad_requerida = Set(required_quantity(cantidad)?);
    }
    if let Some(estado) = payload.estado {
        changes.estado = Set(estado);
    }
    if let Some(notificado) = payload.notificado_gerente {
        changes.notificado_gerente = Set(notificado);
    }
    if let Some(notas) = payload.notas {
        changes.notas = Set(trimmed(notas));
    }

    if !peticion_material_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            PeticionMaterial::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = peticion_material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material request"))?;

    audit::record(
        &state.pool,
        Some(user),
        "peticion_update",
        "peticiones_material",
        serde_json::json!({ "peticion_id": id, "estado": updated.estado.label() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material request updated",
        PeticionMaterial::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_peticion(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_management(user)?;
    if !peticion_material_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Material request"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "peticion_delete",
        "peticiones_material",
        serde_json::json!({ "peticion_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material request deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_request_needs_a_quote_or_a_job() {
        assert!(matches!(
            ensure_reference(None, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(ensure_reference(Some(Uuid::new_v4()), None).is_ok());
        assert!(ensure_reference(None, Some(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn quantities_must_be_positive() {
        assert!(required_quantity(0.0).is_err());
        assert!(required_quantity(-2.0).is_err());
        assert_eq!(required_quantity(2.5).unwrap(), 2.5);
    }
}
