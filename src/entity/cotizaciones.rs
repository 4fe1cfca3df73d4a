use sea_orm::entity::prelude::*;

use crate::enums::EstadoCotizacion;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cotizaciones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub tipo_producto: String,
    pub material_base_id: Option<Uuid>,
    pub descripcion: Option<String>,
    pub total_estimado: f64,
    pub anticipo_requerido: f64,
    pub monto_anticipo_pagado: f64,
    pub estado: EstadoCotizacion,
    pub fecha_agendada: Option<DateTimeWithTimeZone>,
    pub fecha_anticipo_pagado: Option<DateTimeWithTimeZone>,
    pub notas: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::ClienteId",
        to = "super::clientes::Column::Id"
    )]
    Clientes,
    #[sea_orm(has_one = "super::trabajos::Entity")]
    Trabajos,
}

impl Related<super::clientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clientes.def()
    }
}

impl Related<super::trabajos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trabajos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
