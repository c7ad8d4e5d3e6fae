/// Уровень уведомления
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Success => "toast--success",
            Severity::Error => "toast--error",
            Severity::Warning => "toast--warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Receiver of transient user feedback.
///
/// The list controller calls it exactly once per load failure and per
/// mutation outcome; implementations must not batch or drop messages.
pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}
