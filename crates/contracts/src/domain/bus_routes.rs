use serde::{Deserialize, Serialize};

/// Маршрут автобуса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "origen")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "distancia_km", default)]
    pub distance_km: Option<f64>,
    #[serde(rename = "activa", default)]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusRouteForm {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "origen")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "distancia_km", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "activa")]
    pub active: bool,
}

impl From<&BusRoute> for BusRouteForm {
    fn from(route: &BusRoute) -> Self {
        Self {
            code: route.code.clone(),
            name: route.name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            distance_km: route.distance_km,
            active: route.active,
        }
    }
}
