use serde::{Deserialize, Serialize};

/// Тело ответа бэкенда при ошибке (4xx/5xx)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(alias = "mensaje", alias = "error", default)]
    pub message: String,
    /// Field the validation failed on, when the backend knows it
    #[serde(alias = "campo", default)]
    pub field: Option<String>,
}
