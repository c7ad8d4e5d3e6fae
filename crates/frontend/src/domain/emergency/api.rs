use crate::shared::api_utils::{self, record_url};
use crate::shared::list_controller::{ApiError, ListBackend, ListRecord, QueryParams};
use crate::shared::list_utils::{compare_ci, contains_ci, Searchable, Sortable};
use async_trait::async_trait;
use contracts::domain::common::RecordId;
use contracts::domain::emergency::EmergencyUnit;
use std::cmp::Ordering;

const UNITS_PATH: &str = "/api/emergencias/unidades";

impl Searchable for EmergencyUnit {
    fn matches_filter(&self, needle: &str) -> bool {
        contains_ci(&self.plate, needle)
            || contains_ci(&self.unit_number, needle)
            || self
                .route_name
                .as_deref()
                .is_some_and(|r| contains_ci(r, needle))
    }
}

impl Sortable for EmergencyUnit {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "numero_unidad" => compare_unit_numbers(&self.unit_number, &other.unit_number),
            "ruta" => compare_ci(
                self.route_name.as_deref().unwrap_or(""),
                other.route_name.as_deref().unwrap_or(""),
            ),
            "estado" => self.status.cmp(&other.status),
            _ => compare_ci(&self.plate, &other.plate),
        }
    }
}

/// Numeric unit numbers sort by value ("9" before "12"), anything else as text
fn compare_unit_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => compare_ci(a, b),
    }
}

impl ListRecord for EmergencyUnit {
    type Form = ();

    fn record_id(&self) -> RecordId {
        RecordId::Text(self.plate.clone())
    }

    fn display_name(&self) -> String {
        format!("Unidad {} ({})", self.unit_number, self.plate)
    }

    fn to_form(&self) {}
}

/// Fleet units eligible for emergency service.
///
/// Read-only list plus the `activar` action; units are never created or
/// deleted from this page.
pub struct EmergencyApi;

impl EmergencyApi {
    pub async fn activate(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = format!("{}/activar", record_url(UNITS_PATH, id));
        api_utils::post_empty(&url).await
    }
}

#[async_trait(?Send)]
impl ListBackend for EmergencyApi {
    type Record = EmergencyUnit;

    async fn list(&self, params: &QueryParams) -> Result<Option<Vec<EmergencyUnit>>, ApiError> {
        api_utils::fetch_list(UNITS_PATH, params).await
    }
}
