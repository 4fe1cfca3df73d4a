use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::fields::nullable, enums::EstadoPeticion, models::PeticionMaterial};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePeticionRequest {
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: Option<String>,
    pub cantidad_requerida: Option<f64>,
    pub estado: Option<EstadoPeticion>,
    pub notas: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePeticionRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub cotizacion_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub trabajo_id: Option<Option<Uuid>>,
    pub material_codigo: Option<String>,
    pub cantidad_requerida: Option<f64>,
    pub estado: Option<EstadoPeticion>,
    pub notificado_gerente: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PeticionList {
    #[schema(value_type = Vec<PeticionMaterial>)]
    pub items: Vec<PeticionMaterial>,
}
