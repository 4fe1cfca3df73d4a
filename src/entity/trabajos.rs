use sea_orm::entity::prelude::*;

use crate::enums::EstadoTrabajo;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trabajos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cotizacion_id: Uuid,
    pub empleado_id: Option<Uuid>,
    pub estado: EstadoTrabajo,
    pub materiales_usados: Json,
    pub fecha_inicio_estimada: Option<DateTimeWithTimeZone>,
    pub fecha_fin_estimada: Option<DateTimeWithTimeZone>,
    pub fecha_inicio_real: Option<DateTimeWithTimeZone>,
    pub fecha_fin_real: Option<DateTimeWithTimeZone>,
    pub notas: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cotizaciones::Entity",
        from = "Column::CotizacionId",
        to = "super::cotizaciones::Column::Id"
    )]
    Cotizaciones,
    #[sea_orm(
        belongs_to = "super::empleados::Entity",
        from = "Column::EmpleadoId",
        to = "super::empleados::Column::Id"
    )]
    Empleados,
}

impl Related<super::cotizaciones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cotizaciones.def()
    }
}

impl Related<super::empleados::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Empleados.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
