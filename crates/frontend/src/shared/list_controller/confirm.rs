use async_trait::async_trait;

/// Текст запроса подтверждения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Yes/no decision point in front of destructive actions.
///
/// `false` (declined or dismissed) means the operation is not attempted at all.
#[async_trait(?Send)]
pub trait ConfirmationGate {
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}
