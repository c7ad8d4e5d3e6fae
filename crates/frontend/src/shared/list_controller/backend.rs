//! Backend collaborator contracts.
//!
//! Every list page talks to its REST resource through these traits. The
//! browser implementations live next to each page (`domain/*/api.rs`); tests
//! substitute in-memory doubles.

use super::error::ApiError;
use crate::shared::list_utils::{Searchable, Sortable};
use async_trait::async_trait;
use contracts::domain::common::RecordId;
use std::collections::BTreeMap;

/// Query string parameters, sorted by key so the same filters always encode
/// to the same URL.
pub type QueryParams = BTreeMap<String, String>;

/// A backend-owned entity shown in a list.
pub trait ListRecord: Clone + Searchable + Sortable + 'static {
    /// Editable fields staged by the create/edit dialog
    type Form: Clone + Default + 'static;

    fn record_id(&self) -> RecordId;

    /// Human readable name used in confirmations and notifications
    fn display_name(&self) -> String;

    fn to_form(&self) -> Self::Form;
}

pub type FormOf<B> = <<B as ListBackend>::Record as ListRecord>::Form;

#[async_trait(?Send)]
pub trait ListBackend: 'static {
    type Record: ListRecord;

    /// `Ok(None)` stands for a `null` body; the controller treats it as empty.
    async fn list(&self, params: &QueryParams) -> Result<Option<Vec<Self::Record>>, ApiError>;
}

#[async_trait(?Send)]
pub trait CrudBackend: ListBackend {
    async fn create(
        &self,
        form: &<Self::Record as ListRecord>::Form,
    ) -> Result<Self::Record, ApiError>;

    async fn update(
        &self,
        id: &RecordId,
        form: &<Self::Record as ListRecord>::Form,
    ) -> Result<Self::Record, ApiError>;

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError>;
}
