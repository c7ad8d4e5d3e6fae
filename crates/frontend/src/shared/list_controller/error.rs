use thiserror::Error;

/// Ошибка обращения к REST-бэкенду.
///
/// The controller only distinguishes success from failure; the variant picks
/// the wording of the notification and whether an inline field message exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network failure, timeout or server error
    #[error("{0}")]
    Transport(String),

    /// Payload rejected by the backend
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Domain precondition violated (e.g. unit already in emergency service)
    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport(err.to_string())
    }

    pub fn validation(field: Option<&str>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Notification title for this kind of failure
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Error de conexión",
            ApiError::Validation { .. } => "Datos no válidos",
            ApiError::Conflict(_) => "Operación no permitida",
        }
    }

    /// Message shown under the form of an open edit dialog
    pub fn inline_message(&self) -> String {
        match self {
            ApiError::Validation {
                field: Some(field),
                message,
            } => format!("{}: {}", field, message),
            other => other.to_string(),
        }
    }
}
