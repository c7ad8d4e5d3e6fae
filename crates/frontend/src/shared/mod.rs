pub mod api_utils;
pub mod browser_confirm;
pub mod components;
pub mod form_utils;
pub mod icons;
pub mod list_controller;
pub mod list_handle;
pub mod list_utils;
pub mod toasts;
