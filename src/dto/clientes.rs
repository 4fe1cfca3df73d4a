use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Cliente;

/// Also the body of `POST /auth/cliente/register`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateClienteRequest {
    pub nombre: Option<String>,
    pub contacto: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateClienteRequest {
    pub nombre: Option<String>,
    pub contacto: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ClienteList {
    #[schema(value_type = Vec<Cliente>)]
    pub items: Vec<Cliente>,
}
