use sea_orm::entity::prelude::*;

use crate::enums::Role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "empleados")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nombre: String,
    pub contacto: Option<String>,
    pub username: String,
    pub password_hash: String,
    pub rol: Role,
    pub activo: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trabajos::Entity")]
    Trabajos,
}

impl Related<super::trabajos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trabajos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
