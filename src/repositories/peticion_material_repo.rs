use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use crate::{
    entity::peticiones_material::{ActiveModel, Column, Entity as PeticionesMaterial, Model},
    enums::EstadoPeticion,
    error::AppResult,
};

use super::{Page, map_db_err, paginate};

#[derive(Debug, Default, Clone)]
pub struct PeticionFilter {
    pub estado: Option<EstadoPeticion>,
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: Option<String>,
}

fn select(filter: &PeticionFilter) -> Select<PeticionesMaterial> {
    let mut condition = Condition::all();
    if let Some(estado) = filter.estado {
        condition = condition.add(Column::Estado.eq(estado));
    }
    if let Some(cotizacion_id) = filter.cotizacion_id {
        condition = condition.add(Column::CotizacionId.eq(cotizacion_id));
    }
    if let Some(trabajo_id) = filter.trabajo_id {
        condition = condition.add(Column::TrabajoId.eq(trabajo_id));
    }
    if let Some(codigo) = filter.material_codigo.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::MaterialCodigo.eq(codigo.clone()));
    }
    PeticionesMaterial::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
}

pub async fn create<C: ConnectionTrait>(db: &C, mut data: ActiveModel) -> AppResult<Model> {
    data.id = Set(Uuid::new_v4());
    data.created_at = NotSet;
    data.updated_at = NotSet;
    data.insert(db).await.map_err(map_db_err)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Model>> {
    Ok(PeticionesMaterial::find_by_id(id).one(db).await?)
}

pub async fn find_all<C: ConnectionTrait>(
    db: &C,
    filter: &PeticionFilter,
) -> AppResult<Vec<Model>> {
    Ok(select(filter).all(db).await?)
}

pub async fn find_page<C: ConnectionTrait>(
    db: &C,
    filter: &PeticionFilter,
    page: u64,
    limit: u64,
) -> AppResult<Page<Model>> {
    paginate(db, select(filter), page, limit).await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    mut changes: ActiveModel,
) -> AppResult<bool> {
    changes.id = NotSet;
    changes.created_at = NotSet;
    changes.updated_at = NotSet;
    if !changes.is_changed() {
        return Ok(false);
    }
    changes.updated_at = Set(Utc::now().into());
    let result = PeticionesMaterial::update_many()
        .set(changes)
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    let result = PeticionesMaterial::delete_by_id(id)
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}
