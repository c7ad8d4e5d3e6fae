use crate::shared::api_utils::{self, api_url, record_url};
use crate::shared::list_controller::{
    ApiError, CrudBackend, ListBackend, ListRecord, QueryParams,
};
use crate::shared::list_utils::{compare_ci, contains_ci, Searchable, Sortable};
use async_trait::async_trait;
use contracts::domain::common::RecordId;
use contracts::domain::maintenance::{MaintenanceForm, MaintenanceKind, MaintenanceRecord};
use std::cmp::Ordering;

const MAINTENANCE_PATH: &str = "/api/mantenimientos";

impl Searchable for MaintenanceRecord {
    fn matches_filter(&self, needle: &str) -> bool {
        contains_ci(&self.bus_code, needle)
            || self.workshop.as_deref().is_some_and(|w| contains_ci(w, needle))
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
    }
}

impl Sortable for MaintenanceRecord {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "unidad" => compare_ci(&self.bus_code, &other.bus_code),
            "tipo" => self.kind.cmp(&other.kind),
            "fecha" => self.date.cmp(&other.date),
            "costo" => self.cost.partial_cmp(&other.cost).unwrap_or(Ordering::Equal),
            "taller" => compare_ci(
                self.workshop.as_deref().unwrap_or(""),
                other.workshop.as_deref().unwrap_or(""),
            ),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl ListRecord for MaintenanceRecord {
    type Form = MaintenanceForm;

    fn record_id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn display_name(&self) -> String {
        format!(
            "{} {} del {}",
            self.kind.label(),
            self.bus_code,
            self.date.format("%d/%m/%Y")
        )
    }

    fn to_form(&self) -> MaintenanceForm {
        MaintenanceForm::from(self)
    }
}

pub fn validate(form: &MaintenanceForm) -> Result<(), ApiError> {
    if form.bus_code.trim().is_empty() {
        return Err(ApiError::validation(Some("unidad"), "es obligatoria"));
    }
    if form.kind == MaintenanceKind::Other {
        return Err(ApiError::validation(Some("tipo"), "seleccione un tipo"));
    }
    if form.date.is_none() {
        return Err(ApiError::validation(Some("fecha"), "es obligatoria"));
    }
    if !form.cost.is_finite() || form.cost < 0.0 {
        return Err(ApiError::validation(Some("costo"), "no puede ser negativo"));
    }
    Ok(())
}

/// REST collaborator for `/api/mantenimientos`
pub struct MaintenanceApi;

#[async_trait(?Send)]
impl ListBackend for MaintenanceApi {
    type Record = MaintenanceRecord;

    async fn list(
        &self,
        params: &QueryParams,
    ) -> Result<Option<Vec<MaintenanceRecord>>, ApiError> {
        api_utils::fetch_list(MAINTENANCE_PATH, params).await
    }
}

#[async_trait(?Send)]
impl CrudBackend for MaintenanceApi {
    async fn create(&self, form: &MaintenanceForm) -> Result<MaintenanceRecord, ApiError> {
        validate(form)?;
        api_utils::post_json(&api_url(MAINTENANCE_PATH), form).await
    }

    async fn update(
        &self,
        id: &RecordId,
        form: &MaintenanceForm,
    ) -> Result<MaintenanceRecord, ApiError> {
        validate(form)?;
        api_utils::put_json(&record_url(MAINTENANCE_PATH, id), form).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        api_utils::delete(&record_url(MAINTENANCE_PATH, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> MaintenanceRecord {
        MaintenanceRecord {
            id: 9,
            bus_code: "BUS-021".into(),
            kind: MaintenanceKind::Corrective,
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            cost: 1250.0,
            workshop: Some("Taller Peñón".into()),
            description: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(record().display_name(), "Correctivo BUS-021 del 03/05/2024");
    }

    #[test]
    fn test_search_covers_workshop() {
        assert!(record().matches_filter("peñón"));
        assert!(record().matches_filter("bus-02"));
        assert!(!record().matches_filter("norte"));
    }

    #[test]
    fn test_validate() {
        let mut form = record().to_form();
        assert!(validate(&form).is_ok());

        form.cost = -1.0;
        assert_eq!(validate(&form).unwrap_err().field(), Some("costo"));

        form.cost = 10.0;
        form.date = None;
        assert_eq!(validate(&form).unwrap_err().field(), Some("fecha"));
    }

    #[test]
    fn test_unrecognised_kind_must_be_replaced_before_saving() {
        let mut unknown = record();
        unknown.kind = MaintenanceKind::Other;
        let mut form = unknown.to_form();
        assert_eq!(validate(&form).unwrap_err().field(), Some("tipo"));

        form.kind = MaintenanceKind::Preventive;
        assert!(validate(&form).is_ok());
    }
}
