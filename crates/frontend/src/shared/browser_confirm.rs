use crate::shared::list_controller::{ConfirmRequest, ConfirmationGate};
use async_trait::async_trait;

/// Confirmation through the browser's blocking `window.confirm`
#[derive(Clone, Copy, Default)]
pub struct BrowserConfirm;

#[async_trait(?Send)]
impl ConfirmationGate for BrowserConfirm {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        match web_sys::window() {
            Some(win) => win
                .confirm_with_message(&format!("{}\n\n{}", request.title, request.message))
                .unwrap_or(false),
            None => false,
        }
    }
}
