use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::fields::nullable,
    enums::EstadoTrabajo,
    models::{MaterialesUsados, Trabajo},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTrabajoRequest {
    pub cotizacion_id: Option<Uuid>,
    pub empleado_id: Option<Uuid>,
    pub estado: Option<EstadoTrabajo>,
    pub materiales_usados: Option<MaterialesUsados>,
    pub fecha_inicio_estimada: Option<String>,
    pub fecha_fin_estimada: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTrabajoRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub empleado_id: Option<Option<Uuid>>,
    pub estado: Option<EstadoTrabajo>,
    pub materiales_usados: Option<MaterialesUsados>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_inicio_estimada: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_fin_estimada: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_inicio_real: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub fecha_fin_real: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TrabajoList {
    #[schema(value_type = Vec<Trabajo>)]
    pub items: Vec<Trabajo>,
}
