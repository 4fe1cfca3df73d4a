pub mod clientes;
pub mod cotizaciones;
pub mod empleados;
pub mod materiales;
pub mod peticiones_material;
pub mod trabajos;

pub use clientes::Entity as Clientes;
pub use cotizaciones::Entity as Cotizaciones;
pub use empleados::Entity as Empleados;
pub use materiales::Entity as Materiales;
pub use peticiones_material::Entity as PeticionesMaterial;
pub use trabajos::Entity as Trabajos;
