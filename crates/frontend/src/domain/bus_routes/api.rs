use crate::shared::api_utils::{self, api_url, record_url};
use crate::shared::list_controller::{
    ApiError, CrudBackend, ListBackend, ListRecord, QueryParams,
};
use crate::shared::list_utils::{compare_ci, compare_opt_f64, contains_ci, Searchable, Sortable};
use async_trait::async_trait;
use contracts::domain::bus_routes::{BusRoute, BusRouteForm};
use contracts::domain::common::RecordId;
use std::cmp::Ordering;

const ROUTES_PATH: &str = "/api/rutas";

impl Searchable for BusRoute {
    fn matches_filter(&self, needle: &str) -> bool {
        contains_ci(&self.code, needle)
            || contains_ci(&self.name, needle)
            || contains_ci(&self.origin, needle)
            || contains_ci(&self.destination, needle)
    }
}

impl Sortable for BusRoute {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "codigo" => compare_ci(&self.code, &other.code),
            "nombre" => compare_ci(&self.name, &other.name),
            "origen" => compare_ci(&self.origin, &other.origin),
            "destino" => compare_ci(&self.destination, &other.destination),
            "distancia_km" => compare_opt_f64(self.distance_km, other.distance_km),
            "activa" => self.active.cmp(&other.active),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl ListRecord for BusRoute {
    type Form = BusRouteForm;

    fn record_id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }

    fn to_form(&self) -> BusRouteForm {
        BusRouteForm::from(self)
    }
}

pub fn validate(form: &BusRouteForm) -> Result<(), ApiError> {
    let required = [
        ("codigo", &form.code),
        ("nombre", &form.name),
        ("origen", &form.origin),
        ("destino", &form.destination),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(ApiError::validation(Some(*field), "es obligatorio"));
    }
    if form.distance_km.is_some_and(|d| d <= 0.0) {
        return Err(ApiError::validation(
            Some("distancia_km"),
            "debe ser mayor que cero",
        ));
    }
    Ok(())
}

/// REST collaborator for `/api/rutas`
pub struct BusRoutesApi;

#[async_trait(?Send)]
impl ListBackend for BusRoutesApi {
    type Record = BusRoute;

    async fn list(&self, params: &QueryParams) -> Result<Option<Vec<BusRoute>>, ApiError> {
        api_utils::fetch_list(ROUTES_PATH, params).await
    }
}

#[async_trait(?Send)]
impl CrudBackend for BusRoutesApi {
    async fn create(&self, form: &BusRouteForm) -> Result<BusRoute, ApiError> {
        validate(form)?;
        api_utils::post_json(&api_url(ROUTES_PATH), form).await
    }

    async fn update(&self, id: &RecordId, form: &BusRouteForm) -> Result<BusRoute, ApiError> {
        validate(form)?;
        api_utils::put_json(&record_url(ROUTES_PATH, id), form).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        api_utils::delete(&record_url(ROUTES_PATH, id)).await
    }
}
