//! Всплывающие уведомления.

use crate::shared::icons::icon;
use crate::shared::list_controller::{Notification, NotificationSink, Severity};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const AUTO_DISMISS_MS: u32 = 4_500;

#[derive(Clone, Debug, PartialEq)]
struct Toast {
    id: u64,
    notification: Notification,
}

/// Errors stay until closed
fn dismiss_after(severity: Severity) -> Option<u32> {
    match severity {
        Severity::Error => None,
        _ => Some(AUTO_DISMISS_MS),
    }
}

/// Toast stack provided at the app root; every list controller notifies through it.
#[derive(Clone, Copy)]
pub struct ToastService {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    pub fn push(&self, notification: Notification) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        let severity = notification.severity;
        self.toasts.update(|list| list.push(Toast { id, notification }));

        if let Some(ms) = dismiss_after(severity) {
            let svc = *self;
            spawn_local(async move {
                TimeoutFuture::new(ms).await;
                svc.dismiss(id);
            });
        }
    }

    pub fn dismiss(&self, id: u64) {
        let _ = self.toasts.try_update(|list| list.retain(|t| t.id != id));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ToastService {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}

pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().expect("ToastService not found. Provide it in App.")
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "check",
        Severity::Error => "alert-circle",
        Severity::Warning => "alert-triangle",
    }
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let svc = use_toasts();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || svc.toasts.get()
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    let Notification { severity, title, message } = toast.notification;
                    view! {
                        <div class=format!("toast {}", severity.css_class())>
                            <span class="toast__icon">{icon(severity_icon(severity))}</span>
                            <div class="toast__body">
                                <div class="toast__title">{title}</div>
                                <div class="toast__message">{message}</div>
                            </div>
                            <button
                                class="toast__close"
                                title="Cerrar"
                                on:click=move |_| svc.dismiss(id)
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
