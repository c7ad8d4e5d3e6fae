use crate::shared::browser_confirm::BrowserConfirm;
use crate::shared::list_controller::{FilterDescriptor, ListBackend, ListConfig, ListController};
use crate::shared::toasts::use_toasts;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::rc::Rc;

/// Reactive handle to a [`ListController`] for use inside components.
///
/// The controller is `Rc`-based, so it lives in local storage; a revision
/// signal bumped by the controller's change hook makes every [`read`] a
/// tracked dependency.
///
/// [`read`]: ListHandle::read
pub struct ListHandle<B: ListBackend> {
    controller: StoredValue<ListController<B>, LocalStorage>,
    revision: RwSignal<u64>,
}

impl<B: ListBackend> Clone for ListHandle<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ListBackend> Copy for ListHandle<B> {}

impl<B: ListBackend> ListHandle<B> {
    pub fn new(controller: ListController<B>) -> Self {
        let revision = RwSignal::new(0u64);
        controller.subscribe(move || {
            // The page may already be unmounted when a late response settles.
            let _ = revision.try_update(|r| *r += 1);
        });
        Self {
            controller: StoredValue::new_local(controller),
            revision,
        }
    }

    /// Controller notifying through the app's toast stack and confirming
    /// through the browser dialog; loads once on mount.
    pub fn mount(backend: B, filters: Vec<FilterDescriptor>, config: ListConfig) -> Self {
        let controller = ListController::new(
            backend,
            filters,
            config,
            Rc::new(use_toasts()),
            Rc::new(BrowserConfirm),
        );
        let handle = Self::new(controller);
        handle.load_on_mount();
        handle
    }

    pub fn controller(&self) -> ListController<B> {
        self.controller.get_value()
    }

    /// Reads controller state, subscribing the current reactive scope
    pub fn read<T>(&self, f: impl FnOnce(&ListController<B>) -> T) -> T {
        self.revision.track();
        self.controller.with_value(f)
    }

    /// Runs an async controller operation on the local executor
    pub fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(ListController<B>) -> Fut,
        Fut: Future + 'static,
    {
        let fut = op(self.controller());
        spawn_local(async move {
            fut.await;
        });
    }

    /// Initial load on mount
    pub fn load_on_mount(&self) {
        let handle = *self;
        Effect::new(move |_| {
            handle.spawn(|c| async move { c.load().await });
        });
    }
}
