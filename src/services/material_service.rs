use sea_orm::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        fields::trimmed,
        materiales::{CreateMaterialRequest, MaterialList, UpdateMaterialRequest},
    },
    entity::materiales::ActiveModel,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_management, ensure_staff},
    models::Material,
    repositories::material_repo::{self, MaterialFilter},
    response::{ApiResponse, Meta},
    routes::params::MaterialListQuery,
    services::{non_blank, page_meta, required},
    state::AppState,
};

fn unit_cost(value: f64) -> AppResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::BadRequest(
            "costo_unitario must be a non-negative number".into(),
        ))
    }
}

pub async fn list_materiales(
    state: &AppState,
    query: MaterialListQuery,
) -> AppResult<ApiResponse<MaterialList>> {
    let filter = MaterialFilter {
        q: query.q.clone(),
        disponible: query.disponible,
    };

    let (items, meta) = match query.pagination().normalize() {
        Some((page, limit)) => {
            let page = material_repo::find_page(&state.orm, &filter, page, limit).await?;
            let meta = page_meta(&page);
            (page.map(Material::from).items, meta)
        }
        None => {
            let items: Vec<Material> = material_repo::find_all(&state.orm, &filter)
                .await?
                .into_iter()
                .map(Material::from)
                .collect();
            let meta = Meta::total(items.len() as u64);
            (items, meta)
        }
    };

    Ok(ApiResponse::success("Materials", MaterialList { items }, Some(meta)))
}

pub async fn get_material(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Material>> {
    let material = material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;
    Ok(ApiResponse::success("Material", Material::from(material), None))
}

pub async fn get_material_by_code(
    state: &AppState,
    codigo: &str,
) -> AppResult<ApiResponse<Material>> {
    let material = material_repo::find_by_code(&state.orm, codigo.trim())
        .await?
        .ok_or(AppError::NotFound("Material"))?;
    Ok(ApiResponse::success("Material", Material::from(material), None))
}

pub async fn create_material(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMaterialRequest,
) -> AppResult<ApiResponse<Material>> {
    ensure_staff(user)?;
    let nombre = required(payload.nombre, "nombre")?;
    let unidad_medida = required(payload.unidad_medida, "unidad_medida")?;
    let costo_unitario = payload
        .costo_unitario
        .ok_or_else(|| AppError::BadRequest("costo_unitario is required".into()))
        .and_then(unit_cost)?;
    let codigo = trimmed(payload.codigo);

    if let Some(codigo) = codigo.as_deref() {
        if material_repo::find_by_code(&state.orm, codigo)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("codigo is already in use".into()));
        }
    }
    if material_repo::find_by_name(&state.orm, &nombre)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("nombre is already in use".into()));
    }

    let material = material_repo::create(
        &state.orm,
        ActiveModel {
            codigo: Set(codigo),
            nombre: Set(nombre),
            unidad_medida: Set(unidad_medida),
            costo_unitario: Set(costo_unitario),
            disponible: Set(payload.disponible.unwrap_or(true)),
            ..Default::default()
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user),
        "material_create",
        "materiales",
        serde_json::json!({ "material_id": material.id, "codigo": material.codigo }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material created",
        Material::from(material),
        Some(Meta::empty()),
    ))
}

pub async fn update_material(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMaterialRequest,
) -> AppResult<ApiResponse<Material>> {
    ensure_staff(user)?;
    let existing = material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    let mut changes: ActiveModel = Default::default();
    if let Some(codigo) = payload.codigo {
        let codigo = trimmed(codigo);
        if codigo != existing.codigo {
            if let Some(value) = codigo.as_deref() {
                let taken = material_repo::find_by_code(&state.orm, value).await?;
                if taken.is_some_and(|m| m.id != id) {
                    return Err(AppError::Conflict("codigo is already in use".into()));
                }
            }
            changes.codigo = Set(codigo);
        }
    }
    if let Some(nombre) = non_blank(payload.nombre, "nombre")? {
        if nombre != existing.nombre {
            let taken = material_repo::find_by_name(&state.orm, &nombre).await?;
            if taken.is_some_and(|m| m.id != id) {
                return Err(AppError::Conflict("nombre is already in use".into()));
            }
            changes.nombre = Set(nombre);
        }
    }
    if let Some(unidad) = non_blank(payload.unidad_medida, "unidad_medida")? {
        changes.unidad_medida = Set(unidad);
    }
    if let Some(costo) = payload.costo_unitario {
        changes.costo_unitario = Set(unit_cost(costo)?);
    }
    if let Some(disponible) = payload.disponible {
        changes.disponible = Set(disponible);
    }

    if !material_repo::update(&state.orm, id, changes).await? {
        return Ok(ApiResponse::success(
            "No changes applied",
            Material::from(existing),
            Some(Meta::empty()),
        ));
    }

    let updated = material_repo::find_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    audit::record(
        &state.pool,
        Some(user),
        "material_update",
        "materiales",
        serde_json::json!({ "material_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material updated",
        Material::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_material(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_management(user)?;
    if !material_repo::delete(&state.orm, id).await? {
        return Err(AppError::NotFound("Material"));
    }

    audit::record(
        &state.pool,
        Some(user),
        "material_delete",
        "materiales",
        serde_json::json!({ "material_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Material deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cost_must_be_non_negative() {
        assert_eq!(unit_cost(0.0).unwrap(), 0.0);
        assert_eq!(unit_cost(12.5).unwrap(), 12.5);
        assert!(unit_cost(-0.01).is_err());
        assert!(unit_cost(f64::NAN).is_err());
    }
}
