use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{clientes, cotizaciones, empleados, materiales, peticiones_material, trabajos},
    enums::{EstadoCotizacion, EstadoPeticion, EstadoTrabajo, Role},
    error::{AppError, AppResult},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    pub nombre: String,
    pub contacto: String,
    pub username: String,
    pub rol: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Empleado {
    pub id: Uuid,
    pub nombre: String,
    pub contacto: Option<String>,
    pub username: String,
    pub rol: Role,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Material {
    pub id: Uuid,
    pub codigo: Option<String>,
    pub nombre: String,
    pub unidad_medida: String,
    pub costo_unitario: f64,
    pub disponible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Cotizacion {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub tipo_producto: String,
    pub material_base_id: Option<Uuid>,
    pub descripcion: Option<String>,
    pub total_estimado: f64,
    pub anticipo_requerido: f64,
    pub monto_anticipo_pagado: f64,
    pub estado: EstadoCotizacion,
    pub fecha_agendada: Option<DateTime<Utc>>,
    pub fecha_anticipo_pagado: Option<DateTime<Utc>>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quantity of one material consumed by a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CantidadMaterial {
    pub cantidad: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unidad_medida: Option<String>,
}

/// Materials consumed by a job, keyed by material code. Stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MaterialesUsados(pub BTreeMap<String, CantidadMaterial>);

impl MaterialesUsados {
    pub fn validate(&self) -> AppResult<()> {
        for (codigo, uso) in &self.0 {
            if codigo.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "materiales_usados keys must be material codes".into(),
                ));
            }
            if !uso.cantidad.is_finite() || uso.cantidad < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "materiales_usados.{codigo}.cantidad must be a non-negative number"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Rows written before the column had a schema fall back to an empty map.
    pub fn from_json(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(error = %err, "unreadable materiales_usados, using empty map");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Trabajo {
    pub id: Uuid,
    pub cotizacion_id: Uuid,
    pub empleado_id: Option<Uuid>,
    pub estado: EstadoTrabajo,
    pub materiales_usados: MaterialesUsados,
    pub fecha_inicio_estimada: Option<DateTime<Utc>>,
    pub fecha_fin_estimada: Option<DateTime<Utc>>,
    pub fecha_inicio_real: Option<DateTime<Utc>>,
    pub fecha_fin_real: Option<DateTime<Utc>>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PeticionMaterial {
    pub id: Uuid,
    pub cotizacion_id: Option<Uuid>,
    pub trabajo_id: Option<Uuid>,
    pub material_codigo: String,
    pub cantidad_requerida: f64,
    pub estado: EstadoPeticion,
    pub notificado_gerente: bool,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<clientes::Model> for Cliente {
    fn from(model: clientes::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            contacto: model.contacto,
            username: model.username,
            rol: model.rol,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<empleados::Model> for Empleado {
    fn from(model: empleados::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            contacto: model.contacto,
            username: model.username,
            rol: model.rol,
            activo: model.activo,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<materiales::Model> for Material {
    fn from(model: materiales::Model) -> Self {
        Self {
            id: model.id,
            codigo: model.codigo,
            nombre: model.nombre,
            unidad_medida: model.unidad_medida,
            costo_unitario: model.costo_unitario,
            disponible: model.disponible,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<cotizaciones::Model> for Cotizacion {
    fn from(model: cotizaciones::Model) -> Self {
        Self {
            id: model.id,
            cliente_id: model.cliente_id,
            tipo_producto: model.tipo_producto,
            material_base_id: model.material_base_id,
            descripcion: model.descripcion,
            total_estimado: model.total_estimado,
            anticipo_requerido: model.anticipo_requerido,
            monto_anticipo_pagado: model.monto_anticipo_pagado,
            estado: model.estado,
            fecha_agendada: model.fecha_agendada.map(|dt| dt.with_timezone(&Utc)),
            fecha_anticipo_pagado: model.fecha_anticipo_pagado.map(|dt| dt.with_timezone(&Utc)),
            notas: model.notas,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<trabajos::Model> for Trabajo {
    fn from(model: trabajos::Model) -> Self {
        Self {
            id: model.id,
            cotizacion_id: model.cotizacion_id,
            empleado_id: model.empleado_id,
            estado: model.estado,
            materiales_usados: MaterialesUsados::from_json(model.materiales_usados),
            fecha_inicio_estimada: model.fecha_inicio_estimada.map(|dt| dt.with_timezone(&Utc)),
            fecha_fin_estimada: model.fecha_fin_estimada.map(|dt| dt.with_timezone(&Utc)),
            fecha_inicio_real: model.fecha_inicio_real.map(|dt| dt.with_timezone(&Utc)),
            fecha_fin_real: model.fecha_fin_real.map(|dt| dt.with_timezone(&Utc)),
            notas: model.notas,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<peticiones_material::Model> for PeticionMaterial {
    fn from(model: peticiones_material::Model) -> Self {
        Self {
            id: model.id,
            cotizacion_id: model.cotizacion_id,
            trabajo_id: model.trabajo_id,
            material_codigo: model.material_codigo,
            cantidad_requerida: model.cantidad_requerida,
            estado: model.estado,
            notificado_gerente: model.notificado_gerente,
            notas: model.notas,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materiales_usados_is_a_plain_map_on_the_wire() {
        let raw = serde_json::json!({
            "TEL-01": { "cantidad": 3.5, "unidad_medida": "m" },
            "ESP-02": { "cantidad": 1.0 }
        });
        let parsed: MaterialesUsados = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.0.len(), 2);
        assert_eq!(parsed.0["TEL-01"].cantidad, 3.5);
        assert_eq!(parsed.to_json(), raw);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let mut usados = MaterialesUsados::default();
        usados.0.insert(
            "TEL-01".into(),
            CantidadMaterial {
                cantidad: -1.0,
                unidad_medida: None,
            },
        );
        assert!(matches!(usados.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn unreadable_json_falls_back_to_empty() {
        let usados = MaterialesUsados::from_json(serde_json::json!("legacy text"));
        assert_eq!(usados, MaterialesUsados::default());
    }
}
