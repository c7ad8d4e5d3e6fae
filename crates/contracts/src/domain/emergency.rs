use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmergencyStatus {
    #[serde(rename = "operativa")]
    Operational,
    #[serde(rename = "en_emergencia")]
    Active,
    #[serde(rename = "fuera_de_servicio")]
    OutOfService,
}

impl EmergencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyStatus::Operational => "operativa",
            EmergencyStatus::Active => "en_emergencia",
            EmergencyStatus::OutOfService => "fuera_de_servicio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmergencyStatus::Operational => "Operativa",
            EmergencyStatus::Active => "En emergencia",
            EmergencyStatus::OutOfService => "Fuera de servicio",
        }
    }
}

/// Единица парка, для которой можно включить аварийный режим
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyUnit {
    /// Plate, e.g. "AB-1234"
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "numero_unidad")]
    pub unit_number: String,
    #[serde(rename = "ruta", default)]
    pub route_name: Option<String>,
    #[serde(rename = "estado")]
    pub status: EmergencyStatus,
    #[serde(rename = "activada_en", default)]
    pub activated_at: Option<String>,
}

impl EmergencyUnit {
    pub fn can_activate(&self) -> bool {
        self.status == EmergencyStatus::Operational
    }
}
