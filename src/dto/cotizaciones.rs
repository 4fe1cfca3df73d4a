use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::fields::nullable, enums::EstadoCotizacion, models::Cotizacion};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCotizacionRequest {
    pub cliente_id: Option<Uuid>,
    pub tipo_producto: Option<String>,
    pub material_base_id: Option<Uuid>,
    pub descripcion: Option<String>,
    pub total_estimado: Option<f64>,
    pub anticipo_requerido: Option<f64>,
    pub monto_anticipo_pagado: Option<f64>,
    pub estado: Option<EstadoCotizacion>,
    pub fecha_agendada: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCotizacionRequest {
    pub cliente_id: Option<Uuid>,
    pub tipo_producto: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub material_base_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub descripcion: Option<Option<String>>,
    pub total_estimado: Option<f64>,
    pub anticipo_requerido: Option<f64>,
    pub monto_anticipo_pagado: Option<f64>,
    pub estado: Option<EstadoCotizacion>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_agendada: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_anticipo_pagado: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CotizacionList {
    #[schema(value_type = Vec<Cotizacion>)]
    pub items: Vec<Cotizacion>,
}
