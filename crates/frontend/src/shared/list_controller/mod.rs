//! Переиспользуемое ядро списочных страниц.
//!
//! Every list page (roles, routes, maintenance, emergency units) is a thin
//! configuration over [`ListController`]: a set of filter descriptors, a
//! backend collaborator and a [`ListConfig`].

pub mod backend;
pub mod confirm;
pub mod controller;
pub mod edit_session;
pub mod error;
pub mod filter_state;
pub mod notify;
pub mod pagination;

pub use backend::{CrudBackend, FormOf, ListBackend, ListRecord, QueryParams};
pub use confirm::{ConfirmRequest, ConfirmationGate};
pub use controller::{
    ListConfig, ListController, LoadOutcome, LoadStatus, MutationOutcome, RowAction, SortSpec,
};
pub use edit_session::{EditMode, EditSession};
pub use error::ApiError;
pub use filter_state::{FilterDescriptor, FilterError, FilterKind, FilterOption, FilterValue};
pub use notify::{Notification, NotificationSink, Severity};
pub use pagination::{Page, PageResetPolicy};
