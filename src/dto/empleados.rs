use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::fields::nullable, enums::Role, models::Empleado};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateEmpleadoRequest {
    pub nombre: Option<String>,
    pub contacto: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub rol: Option<Role>,
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmpleadoRequest {
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub contacto: Option<Option<String>>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub rol: Option<Role>,
    pub activo: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct EmpleadoList {
    #[schema(value_type = Vec<Empleado>)]
    pub items: Vec<Empleado>,
}
