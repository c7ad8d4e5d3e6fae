use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Вид обслуживания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaintenanceKind {
    #[serde(rename = "preventivo")]
    Preventive,
    #[serde(rename = "correctivo")]
    Corrective,
    #[serde(rename = "predictivo")]
    Predictive,
    /// Any `tipo` this client does not know yet
    #[serde(rename = "otro")]
    #[serde(other)]
    Other,
}

impl MaintenanceKind {
    /// Kinds that can be filtered on and entered; `Other` only comes from the server
    pub const ALL: [MaintenanceKind; 3] = [
        MaintenanceKind::Preventive,
        MaintenanceKind::Corrective,
        MaintenanceKind::Predictive,
    ];

    /// Wire value, also used as the `tipo` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Preventive => "preventivo",
            MaintenanceKind::Corrective => "correctivo",
            MaintenanceKind::Predictive => "predictivo",
            MaintenanceKind::Other => "otro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceKind::Preventive => "Preventivo",
            MaintenanceKind::Corrective => "Correctivo",
            MaintenanceKind::Predictive => "Predictivo",
            MaintenanceKind::Other => "Otro",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

/// Строка анализа обслуживания: одно событие ТО по одной единице парка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: i64,
    #[serde(rename = "unidad")]
    pub bus_code: String,
    #[serde(rename = "tipo")]
    pub kind: MaintenanceKind,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "costo")]
    pub cost: f64,
    #[serde(rename = "taller", default)]
    pub workshop: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceForm {
    #[serde(rename = "unidad")]
    pub bus_code: String,
    #[serde(rename = "tipo")]
    pub kind: MaintenanceKind,
    #[serde(rename = "fecha")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "costo")]
    pub cost: f64,
    #[serde(rename = "taller", skip_serializing_if = "Option::is_none")]
    pub workshop: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for MaintenanceForm {
    fn default() -> Self {
        Self {
            bus_code: String::new(),
            kind: MaintenanceKind::Preventive,
            date: None,
            cost: 0.0,
            workshop: None,
            description: None,
        }
    }
}

impl From<&MaintenanceRecord> for MaintenanceForm {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            bus_code: record.bus_code.clone(),
            kind: record.kind,
            date: Some(record.date),
            cost: record.cost,
            workshop: record.workshop.clone(),
            description: record.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json() {
        let json = r#"{
            "id": 10,
            "unidad": "BUS-014",
            "tipo": "correctivo",
            "fecha": "2024-05-02",
            "costo": 1250.5
        }"#;
        let record: MaintenanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, MaintenanceKind::Corrective);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(record.workshop, None);
    }

    #[test]
    fn test_unknown_kind_does_not_fail_the_list() {
        let json = r#"[
            {"id": 1, "unidad": "BUS-001", "tipo": "preventivo", "fecha": "2024-05-01", "costo": 80},
            {"id": 2, "unidad": "BUS-002", "tipo": "garantia", "fecha": "2024-05-02", "costo": 0}
        ]"#;
        let records: Vec<MaintenanceRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, MaintenanceKind::Preventive);
        assert_eq!(records[1].kind, MaintenanceKind::Other);
        assert_eq!(records[1].kind.label(), "Otro");
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in MaintenanceKind::ALL {
            assert_eq!(MaintenanceKind::from_str_opt(kind.as_str()), Some(kind));
        }
        assert_eq!(MaintenanceKind::from_str_opt("otro"), None);
    }
}
