use sea_orm::entity::prelude::*;

use crate::enums::EstadoPeticion;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "peticiones_material")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: String,
    pub cantidad_requerida: f64,
    pub estado: EstadoPeticion,
    pub notificado_gerente: bool,
    pub notas: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
