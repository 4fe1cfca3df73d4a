//! Closed value sets persisted as text columns.
//!
//! Each status enum owns its transition table. The wire and storage spelling
//! is the Spanish label used by the shop.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "cliente")]
    Cliente,
    #[sea_orm(string_value = "empleado")]
    Empleado,
    #[sea_orm(string_value = "gerente")]
    Gerente,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub const STAFF: &'static [Role] = &[Role::Empleado, Role::Gerente, Role::Admin];
    pub const MANAGEMENT: &'static [Role] = &[Role::Gerente, Role::Admin];

    pub fn is_staff(self) -> bool {
        Self::STAFF.contains(&self)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EstadoCotizacion {
    #[sea_orm(string_value = "Pendiente de Anticipo")]
    #[serde(rename = "Pendiente de Anticipo")]
    PendienteAnticipo,
    #[sea_orm(string_value = "Anticipo Pagado - Agendado")]
    #[serde(rename = "Anticipo Pagado - Agendado")]
    AnticipoPagadoAgendado,
    #[sea_orm(string_value = "Anticipo Pagado - En Cola")]
    #[serde(rename = "Anticipo Pagado - En Cola")]
    AnticipoPagadoEnCola,
    #[sea_orm(string_value = "Rechazada")]
    #[serde(rename = "Rechazada")]
    Rechazada,
    #[sea_orm(string_value = "Completada")]
    #[serde(rename = "Completada")]
    Completada,
    #[sea_orm(string_value = "Cancelada")]
    #[serde(rename = "Cancelada")]
    Cancelada,
}

impl EstadoCotizacion {
    pub fn label(self) -> &'static str {
        match self {
            Self::PendienteAnticipo => "Pendiente de Anticipo",
            Self::AnticipoPagadoAgendado => "Anticipo Pagado - Agendado",
            Self::AnticipoPagadoEnCola => "Anticipo Pagado - En Cola",
            Self::Rechazada => "Rechazada",
            Self::Completada => "Completada",
            Self::Cancelada => "Cancelada",
        }
    }

    pub fn allowed_next(self) -> &'static [Self] {
        use EstadoCotizacion::*;
        match self {
            PendienteAnticipo => &[
                AnticipoPagadoAgendado,
                AnticipoPagadoEnCola,
                Rechazada,
                Completada,
                Cancelada,
            ],
            AnticipoPagadoAgendado => &[
                PendienteAnticipo,
                AnticipoPagadoEnCola,
                Rechazada,
                Completada,
                Cancelada,
            ],
            AnticipoPagadoEnCola => &[
                PendienteAnticipo,
                AnticipoPagadoAgendado,
                Rechazada,
                Completada,
                Cancelada,
            ],
            Rechazada | Completada | Cancelada => &[],
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        use sea_orm::Iterable;
        Self::iter().find(|e| e.label() == label.trim())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EstadoTrabajo {
    #[sea_orm(string_value = "Pendiente")]
    #[serde(rename = "Pendiente")]
    Pendiente,
    #[sea_orm(string_value = "En Progreso")]
    #[serde(rename = "En Progreso")]
    EnProgreso,
    #[sea_orm(string_value = "Tomando Medidas")]
    #[serde(rename = "Tomando Medidas")]
    TomandoMedidas,
    #[sea_orm(string_value = "Listo para Entrega")]
    #[serde(rename = "Listo para Entrega")]
    ListoParaEntrega,
    #[sea_orm(string_value = "Entregado")]
    #[serde(rename = "Entregado")]
    Entregado,
    #[sea_orm(string_value = "Cancelado")]
    #[serde(rename = "Cancelado")]
    Cancelado,
}

impl EstadoTrabajo {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::EnProgreso => "En Progreso",
            Self::TomandoMedidas => "Tomando Medidas",
            Self::ListoParaEntrega => "Listo para Entrega",
            Self::Entregado => "Entregado",
            Self::Cancelado => "Cancelado",
        }
    }

    pub fn allowed_next(self) -> &'static [Self] {
        use EstadoTrabajo::*;
        match self {
            Pendiente => &[TomandoMedidas, EnProgreso, ListoParaEntrega, Entregado, Cancelado],
            TomandoMedidas => &[Pendiente, EnProgreso, ListoParaEntrega, Entregado, Cancelado],
            EnProgreso => &[Pendiente, TomandoMedidas, ListoParaEntrega, Entregado, Cancelado],
            ListoParaEntrega => &[Pendiente, TomandoMedidas, EnProgreso, Entregado, Cancelado],
            Entregado | Cancelado => &[],
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_next().contains(&next)
    }

    /// A job in this state has finished its work and closes the linked quote.
    pub fn completes_quote(self) -> bool {
        matches!(self, Self::Entregado)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EstadoPeticion {
    #[sea_orm(string_value = "Pendiente de Compra")]
    #[serde(rename = "Pendiente de Compra")]
    PendienteCompra,
    #[sea_orm(string_value = "Comprado")]
    #[serde(rename = "Comprado")]
    Comprado,
    #[sea_orm(string_value = "En Uso")]
    #[serde(rename = "En Uso")]
    EnUso,
}

impl EstadoPeticion {
    pub fn label(self) -> &'static str {
        match self {
            Self::PendienteCompra => "Pendiente de Compra",
            Self::Comprado => "Comprado",
            Self::EnUso => "En Uso",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn labels_match_stored_values() {
        for estado in EstadoCotizacion::iter() {
            assert_eq!(estado.to_value(), estado.label());
        }
        for estado in EstadoTrabajo::iter() {
            assert_eq!(estado.to_value(), estado.label());
        }
        for estado in EstadoPeticion::iter() {
            assert_eq!(estado.to_value(), estado.label());
        }
    }

    #[test]
    fn serde_uses_the_labels() {
        let json = serde_json::to_string(&EstadoCotizacion::AnticipoPagadoAgendado).unwrap();
        assert_eq!(json, "\"Anticipo Pagado - Agendado\"");
        let parsed: EstadoTrabajo = serde_json::from_str("\"Entregado\"").unwrap();
        assert_eq!(parsed, EstadoTrabajo::Entregado);
        assert!(serde_json::from_str::<EstadoTrabajo>("\"Terminado\"").is_err());
        let role: Role = serde_json::from_str("\"gerente\"").unwrap();
        assert_eq!(role, Role::Gerente);
    }

    #[test]
    fn terminal_quote_states_are_final() {
        for terminal in [
            EstadoCotizacion::Rechazada,
            EstadoCotizacion::Completada,
            EstadoCotizacion::Cancelada,
        ] {
            assert!(terminal.is_terminal());
            assert!(terminal.can_transition_to(terminal));
            assert!(!terminal.can_transition_to(EstadoCotizacion::PendienteAnticipo));
        }
        assert!(
            EstadoCotizacion::PendienteAnticipo
                .can_transition_to(EstadoCotizacion::AnticipoPagadoAgendado)
        );
    }

    #[test]
    fn jobs_can_be_delivered_from_any_open_state() {
        for estado in EstadoTrabajo::iter().filter(|e| !e.allowed_next().is_empty()) {
            assert!(estado.can_transition_to(EstadoTrabajo::Entregado));
        }
        assert!(!EstadoTrabajo::Cancelado.can_transition_to(EstadoTrabajo::EnProgreso));
        assert!(EstadoTrabajo::Entregado.completes_quote());
        assert!(!EstadoTrabajo::ListoParaEntrega.completes_quote());
    }

    #[test]
    fn quote_label_lookup() {
        assert_eq!(
            EstadoCotizacion::from_label(" Completada "),
            Some(EstadoCotizacion::Completada)
        );
        assert_eq!(EstadoCotizacion::from_label("Done"), None);
    }

    #[test]
    fn staff_roles() {
        assert!(Role::Empleado.is_staff());
        assert!(Role::Admin.is_staff());
        assert!(!Role::Cliente.is_staff());
    }
}
