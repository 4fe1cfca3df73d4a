use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    entity::materiales::{ActiveModel, Column, Entity as Materiales, Model},
    error::AppResult,
};

use super::{Page, contains_pattern, map_db_err, paginate};

#[derive(Debug, Default, Clone)]
pub struct MaterialFilter {
    pub q: Option<String>,
    pub disponible: Option<bool>,
}

fn select(filter: &MaterialFilter) -> Select<Materiales> {
    let mut condition = Condition::all();
    if let Some(search) = filter.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Nombre).ilike(pattern.clone()))
                .add(Expr::col(Column::Codigo).ilike(pattern)),
        );
    }
    if let Some(disponible) = filter.disponible {
        condition = condition.add(Column::Disponible.eq(disponible));
    }
    Materiales::find()
        .filter(condition)
        .order_by_asc(Column::Nombre)
}

pub async fn create<C: ConnectionTrait>(db: &C, mut data: ActiveModel) -> AppResult<Model> {
    data.id = Set(Uuid::new_v4());
    data.created_at = NotSet;
    data.updated_at = NotSet;
    data.insert(db).await.map_err(map_db_err)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Model>> {
    Ok(Materiales::find_by_id(id).one(db).await?)
}

pub async fn find_by_code<C: ConnectionTrait>(db: &C, codigo: &str) -> AppResult<Option<Model>> {
    Ok(Materiales::find()
        .filter(Column::Codigo.eq(codigo))
        .one(db)
        .await?)
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, nombre: &str) -> AppResult<Option<Model>> {
    Ok(Materiales::find()
        .filter(Column::Nombre.eq(nombre))
        .one(db)
        .await?)
}

pub async fn find_all<C: ConnectionTrait>(
    db: &C,
    filter: &MaterialFilter,
) -> AppResult<Vec<Model>> {
    Ok(select(filter).all(db).await?)
}

pub async fn find_page<C: ConnectionTrait>(
    db: &C,
    filter: &MaterialFilter,
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
    let result = Materiales::update_many()
        .set(changes)
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    let result = Materiales::delete_by_id(id)
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}
