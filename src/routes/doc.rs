use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, LoginUser},
        clientes::{ClienteList, CreateClienteRequest, UpdateClienteRequest},
        cotizaciones::{CotizacionList, CreateCotizacionRequest, UpdateCotizacionRequest},
        empleados::{CreateEmpleadoRequest, EmpleadoList, UpdateEmpleadoRequest},
        materiales::{CreateMaterialRequest, MaterialList, UpdateMaterialRequest},
        peticiones::{CreatePeticionRequest, PeticionList, UpdatePeticionRequest},
        reports::{
            CotizacionesPorEstado, Dashboard, IngresoMensual, IngresosMensuales,
            PeticionPendiente, TrabajosPorEstado,
        },
        trabajos::{CreateTrabajoRequest, TrabajoList, UpdateTrabajoRequest},
    },
    enums::{EstadoCotizacion, EstadoPeticion, EstadoTrabajo, Role},
    models::{
        CantidadMaterial, Cliente, Cotizacion, Empleado, Material, MaterialesUsados,
        PeticionMaterial, Trabajo,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, clientes, cotizaciones, empleados, health, materiales, peticiones, reports,
        trabajos,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register_cliente,
        auth::login_cliente,
        auth::login_empleado,
        clientes::list_clientes,
        clientes::create_cliente,
        clientes::get_cliente,
        clientes::update_cliente,
        clientes::delete_cliente,
        empleados::list_empleados,
        empleados::create_empleado,
        empleados::get_empleado,
        empleados::update_empleado,
        empleados::delete_empleado,
        materiales::list_materiales,
        materiales::create_material,
        materiales::get_material,
        materiales::get_material_by_code,
        materiales::update_material,
        materiales::delete_material,
        cotizaciones::list_cotizaciones,
        cotizaciones::create_cotizacion,
        cotizaciones::get_cotizacion,
        cotizaciones::update_cotizacion,
        cotizaciones::delete_cotizacion,
        trabajos::list_trabajos,
        trabajos::create_trabajo,
        trabajos::get_trabajo,
        trabajos::get_trabajo_by_quote,
        trabajos::update_trabajo,
        trabajos::delete_trabajo,
        peticiones::list_peticiones,
        peticiones::create_peticion,
        peticiones::get_peticion,
        peticiones::update_peticion,
        peticiones::delete_peticion,
        reports::cotizaciones_por_estado,
        reports::trabajos_por_estado,
        reports::peticiones_pendientes,
        reports::dashboard,
        reports::ingresos_mensuales
    ),
    components(
        schemas(
            Role,
            EstadoCotizacion,
            EstadoTrabajo,
            EstadoPeticion,
            Cliente,
            Empleado,
            Material,
            Cotizacion,
            Trabajo,
            PeticionMaterial,
            CantidadMaterial,
            MaterialesUsados,
            LoginRequest,
            LoginResponse,
            LoginUser,
            CreateClienteRequest,
            UpdateClienteRequest,
            ClienteList,
            CreateEmpleadoRequest,
            UpdateEmpleadoRequest,
            EmpleadoList,
            CreateMaterialRequest,
            UpdateMaterialRequest,
            MaterialList,
            CreateCotizacionRequest,
            UpdateCotizacionRequest,
            CotizacionList,
            CreateTrabajoRequest,
            UpdateTrabajoRequest,
            TrabajoList,
            CreatePeticionRequest,
            UpdatePeticionRequest,
            PeticionList,
            CotizacionesPorEstado,
            TrabajosPorEstado,
            PeticionPendiente,
            Dashboard,
            IngresoMensual,
            IngresosMensuales,
            Meta,
            ApiResponse<Cliente>,
            ApiResponse<Cotizacion>,
            ApiResponse<Trabajo>,
            ApiResponse<Dashboard>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Client and employee authentication"),
        (name = "Clientes", description = "Client endpoints"),
        (name = "Empleados", description = "Employee endpoints"),
        (name = "Materiales", description = "Material catalogue endpoints"),
        (name = "Cotizaciones", description = "Quote endpoints"),
        (name = "Trabajos", description = "Job endpoints"),
        (name = "Peticiones", description = "Material request endpoints"),
        (name = "Reports", description = "Management reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
