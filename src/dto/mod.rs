pub mod auth;
pub mod clientes;
pub mod cotizaciones;
pub mod empleados;
pub mod fields;
pub mod materiales;
pub mod peticiones;
pub mod reports;
pub mod trabajos;
