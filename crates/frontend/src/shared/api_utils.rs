//! API utilities for frontend-backend communication
//!
//! URL construction, query-string encoding and the mapping of HTTP responses
//! onto [`ApiError`]. Every `domain/*/api.rs` goes through these helpers.

use crate::shared::list_controller::{ApiError, QueryParams};
use contracts::domain::common::RecordId;
use contracts::shared::api_error::ApiErrorBody;
use gloo_net::http::{Request, RequestBuilder, Response};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Get the base URL for API requests
///
/// `FLEET_API_BASE` set at build time wins. Otherwise the URL is built from
/// the current window location, using port 3000 for the backend server.
/// Empty string if window is not available.
pub fn api_base() -> String {
    if let Some(base) = option_env!("FLEET_API_BASE") {
        return base.trim_end_matches('/').to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// URL of one record of a collection, the id percent-encoded
pub fn record_url(collection_path: &str, id: &RecordId) -> String {
    api_url(&format!(
        "{}/{}",
        collection_path,
        urlencoding::encode(&id.to_string())
    ))
}

/// Appends `params` as a query string. Keys come out sorted, so equal filter
/// states always produce equal URLs.
pub fn with_query(url: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", url, query)
}

/// Maps a non-2xx status and its raw body to an [`ApiError`].
///
/// 400/422 are validation failures, 409 a domain conflict, anything else a
/// transport failure.
pub fn error_for_status(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .filter(|b| !b.message.trim().is_empty());
    let message = parsed
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| default_message(status));

    match status {
        400 | 422 => ApiError::Validation {
            field: parsed.and_then(|b| b.field),
            message,
        },
        409 => ApiError::Conflict(message),
        _ => ApiError::Transport(message),
    }
}

fn default_message(status: u16) -> String {
    match status {
        400 | 422 => "Los datos enviados no son válidos".to_string(),
        404 => "Recurso no encontrado (404)".to_string(),
        409 => "La operación entra en conflicto con el estado actual".to_string(),
        s if s >= 500 => format!("Error del servidor ({})", s),
        s => format!("Respuesta inesperada del servidor ({})", s),
    }
}

/// Turns a non-2xx response into an error, passing 2xx through
pub async fn check_response(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!("HTTP {} from {}: {}", status, response.url(), body);
    Err(error_for_status(status, &body))
}

async fn send(request: Request) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("No se pudo conectar con el servidor: {}", e)))?;
    check_response(response).await
}

fn with_json<T: Serialize>(builder: RequestBuilder, body: &T) -> Result<Request, ApiError> {
    builder
        .json(body)
        .map_err(|e| ApiError::transport(format!("Error al serializar la solicitud: {}", e)))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::transport(format!("Respuesta no válida del servidor: {}", e)))
}

/// GET a collection. A `null` body comes back as `Ok(None)`.
pub async fn fetch_list<T: DeserializeOwned>(
    path: &str,
    params: &QueryParams,
) -> Result<Option<Vec<T>>, ApiError> {
    let url = with_query(&api_url(path), params);
    let response = send(
        Request::get(&url)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?,
    )
    .await?;
    parse_json::<Option<Vec<T>>>(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, ApiError> {
    let response = send(with_json(Request::post(url), body)?).await?;
    parse_json(response).await
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, ApiError> {
    let response = send(with_json(Request::put(url), body)?).await?;
    parse_json(response).await
}

/// POST without a body, ignoring whatever the backend answers with
pub async fn post_empty(url: &str) -> Result<(), ApiError> {
    send(
        Request::post(url)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?,
    )
    .await?;
    Ok(())
}

pub async fn delete(url: &str) -> Result<(), ApiError> {
    send(
        Request::delete(url)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?,
    )
    .await?;
    Ok(())
}
