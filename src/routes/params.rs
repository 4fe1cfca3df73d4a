use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::enums::{EstadoCotizacion, EstadoPeticion, EstadoTrabajo, Role};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Pagination {
    /// `None` when the caller asked for neither a page nor a page size.
    pub fn normalize(&self) -> Option<(u64, u64)> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        Some((page, per_page))
    }
}

// serde_urlencoded cannot parse numbers through `#[serde(flatten)]`, so every
// list query carries its own page fields.

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClienteListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches nombre, contacto or username.
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmpleadoListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub q: Option<String>,
    pub rol: Option<Role>,
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches nombre or codigo.
    pub q: Option<String>,
    pub disponible: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CotizacionListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub q: Option<String>,
    pub cliente_id: Option<Uuid>,
    pub estado: Option<EstadoCotizacion>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrabajoListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub cotizacion_id: Option<Uuid>,
    pub empleado_id: Option<Uuid>,
    pub estado: Option<EstadoTrabajo>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeticionListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub estado: Option<EstadoPeticion>,
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: Option<String>,
}

macro_rules! impl_pagination {
    ($($query:ty),* $(,)?) => {
        $(impl $query {
            pub fn pagination(&self) -> Pagination {
                Pagination {
                    page: self.page,
                    per_page: self.per_page,
                }
            }
        })*
    };
}

impl_pagination!(
    ClienteListQuery,
    EmpleadoListQuery,
    MaterialListQuery,
    CotizacionListQuery,
    TrabajoListQuery,
    PeticionListQuery,
);
