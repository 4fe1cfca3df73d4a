use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::fields::nullable, models::Material};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateMaterialRequest {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub unidad_medida: Option<String>,
    pub costo_unitario: Option<f64>,
    pub disponible: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMaterialRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub codigo: Option<Option<String>>,
    pub nombre: Option<String>,
    pub unidad_medida: Option<String>,
    pub costo_unitario: Option<f64>,
    pub disponible: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct MaterialList {
    #[schema(value_type = Vec<Material>)]
    pub items: Vec<Material>,
}
