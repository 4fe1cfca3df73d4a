use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CotizacionesPorEstado {
    pub estado: String,
    pub cantidad: i64,
    pub total_estimado: f64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TrabajosPorEstado {
    pub estado: String,
    pub cantidad: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PeticionPendiente {
    pub id: Uuid,
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: String,
    pub cantidad_requerida: f64,
    pub notificado_gerente: bool,
    pub created_at: DateTime<Utc>,
    pub material_nombre: String,
    pub unidad_medida: String,
    pub costo_unitario: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub cotizaciones_por_estado: Vec<CotizacionesPorEstado>,
    pub trabajos_por_estado: Vec<TrabajosPorEstado>,
    pub peticiones_pendientes: Vec<PeticionPendiente>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct IngresoMensual {
    pub mes: i32,
    pub cantidad: i64,
    pub total_estimado: f64,
    pub anticipos_pagados: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngresosMensuales {
    pub year: i32,
    pub estados: Vec<String>,
    pub meses: Vec<IngresoMensual>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngresosQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
    /// Comma separated quote statuses, e.g. `Completada,Anticipo Pagado - Agendado`.
    pub estados: Option<String>,
}
