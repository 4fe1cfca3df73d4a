use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    entity::cotizaciones::{ActiveModel, Column, Entity as Cotizaciones, Model},
    enums::EstadoCotizacion,
    error::AppResult,
};

use super::{Page, contains_pattern, map_db_err, paginate};

#[derive(Debug, Default, Clone)]
pub struct CotizacionFilter {
    pub q: Option<String>,
    pub cliente_id: Option<Uuid>,
    pub estado: Option<EstadoCotizacion>,
}

fn select(filter: &CotizacionFilter) -> Select<Cotizaciones> {
    let mut condition = Condition::all();
    if let Some(search) = filter.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::TipoProducto).ilike(pattern.clone()))
                .add(Expr::col(Column::Descripcion).ilike(pattern)),
        );
    }
    if let Some(cliente_id) = filter.cliente_id {
        condition = condition.add(Column::ClienteId.eq(cliente_id));
    }
    if let Some(estado) = filter.estado {
        condition = condition.add(Column::Estado.eq(estado));
    }
    Cotizaciones::find()
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
    Ok(Cotizaciones::find_by_id(id).one(db).await?)
}

pub async fn find_all<C: ConnectionTrait>(
    db: &C,
    filter: &CotizacionFilter,
) -> AppResult<Vec<Model>> {
    Ok(select(filter).all(db).await?)
}

pub async fn find_page<C: ConnectionTrait>(
    db: &C,
    filter: &CotizacionFilter,
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
    let result = Cotizaciones::update_many()
        .set(changes)
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    let result = Cotizaciones::delete_by_id(id)
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}
