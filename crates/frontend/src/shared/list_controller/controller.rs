//! Контроллер списка: загрузка → фильтр → сортировка → страница, и мутации
//! (создание/изменение/удаление/доменные действия) → перезагрузка → уведомление.
//!
//! The controller is framework independent: it owns all list state behind a
//! `RefCell`, suspends only on backend calls, and tells the UI layer about
//! changes through [`ListController::subscribe`].

use super::backend::{CrudBackend, FormOf, ListBackend, ListRecord, QueryParams};
use super::confirm::{ConfirmRequest, ConfirmationGate};
use super::edit_session::{EditMode, EditSession};
use super::error::ApiError;
use super::filter_state::{FilterDescriptor, FilterError, FilterState};
use super::notify::{Notification, NotificationSink, Severity};
use super::pagination::{paginate, Page, PageResetPolicy, PaginationState, DEFAULT_PAGE_SIZE};
use crate::shared::list_utils::{filter_list, sort_list};
use chrono::{DateTime, Utc};
use contracts::domain::common::RecordId;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub ascending: bool,
}

/// Names used in confirmations and notifications ("Rol" / "roles")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLabels {
    pub singular: &'static str,
    pub plural: &'static str,
}

/// Static configuration of one list page
#[derive(Debug, Clone, PartialEq)]
pub struct ListConfig {
    pub labels: EntityLabels,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub reset_policy: PageResetPolicy,
    /// `None` keeps backend order
    pub default_sort: Option<SortSpec>,
}

impl ListConfig {
    pub fn new(singular: &'static str, plural: &'static str) -> Self {
        Self {
            labels: EntityLabels { singular, plural },
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 25, 50, 100],
            reset_policy: PageResetPolicy::default(),
            default_sort: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn with_reset_policy(mut self, policy: PageResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn with_sort(mut self, field: &'static str, ascending: bool) -> Self {
        self.default_sort = Some(SortSpec { field, ascending });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A later load was issued while this one was in flight; its result was dropped
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Completed,
    /// Declined at the confirmation gate
    Cancelled,
    Failed,
    /// Nothing to do: no open edit session, or the row already has an action in flight
    Skipped,
}

/// Texts for a confirm → mutate → reload → notify row action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub confirm: ConfirmRequest,
    pub success_title: String,
    pub success_message: String,
}

struct ListState<R: ListRecord> {
    collection: Vec<R>,
    filters: FilterState,
    search: String,
    sort: Option<SortSpec>,
    pagination: PaginationState,
    status: LoadStatus,
    loaded_at: Option<DateTime<Utc>>,
    edit: Option<EditSession<R::Form>>,
    in_flight: HashSet<RecordId>,
    load_seq: u64,
    edit_seq: u64,
}

impl<R: ListRecord> ListState<R> {
    /// Search-narrowed and sorted view of the collection
    fn filtered_sorted(&self) -> Vec<R> {
        let mut rows = filter_list(self.collection.clone(), &self.search);
        if let Some(sort) = &self.sort {
            sort_list(&mut rows, sort.field, sort.ascending);
        }
        rows
    }

    fn next_edit_generation(&mut self) -> u64 {
        self.edit_seq += 1;
        self.edit_seq
    }

    /// Open session, if it is still the one numbered `generation`
    fn edit_with_generation(&mut self, generation: u64) -> Option<&mut EditSession<R::Form>> {
        self.edit.as_mut().filter(|s| s.generation == generation)
    }

    fn sync_pagination(&mut self, policy: PageResetPolicy) {
        let total = filter_list(self.collection.clone(), &self.search).len();
        self.pagination.set_total_items(total, policy);
    }
}

struct Inner<B: ListBackend> {
    backend: Rc<B>,
    config: ListConfig,
    notifier: Rc<dyn NotificationSink>,
    confirm: Rc<dyn ConfirmationGate>,
    state: RefCell<ListState<B::Record>>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Generic filterable, paginated, editable list.
///
/// Cloning is cheap and yields a handle to the same list.
pub struct ListController<B: ListBackend> {
    inner: Rc<Inner<B>>,
}

impl<B: ListBackend> Clone for ListController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: ListBackend> ListController<B> {
    pub fn new(
        backend: B,
        filters: Vec<FilterDescriptor>,
        config: ListConfig,
        notifier: Rc<dyn NotificationSink>,
        confirm: Rc<dyn ConfirmationGate>,
    ) -> Self {
        let state = ListState {
            collection: Vec::new(),
            filters: FilterState::new(filters),
            search: String::new(),
            sort: config.default_sort.clone(),
            pagination: PaginationState::new(config.page_size),
            status: LoadStatus::Idle,
            loaded_at: None,
            edit: None,
            in_flight: HashSet::new(),
            load_seq: 0,
            edit_seq: 0,
        };
        Self {
            inner: Rc::new(Inner {
                backend: Rc::new(backend),
                config,
                notifier,
                confirm,
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers a callback fired after every state change
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn publish(&self) {
        // Listeners read the controller back, so the list is copied out first.
        let listeners: Vec<_> = self.inner.listeners.borrow().iter().cloned().collect();
        for listener in listeners {
            listener();
        }
    }

    fn notify(&self, severity: Severity, title: impl Into<String>, message: impl Into<String>) {
        self.inner
            .notifier
            .notify(Notification::new(severity, title, message));
    }

    fn labels(&self) -> &EntityLabels {
        &self.inner.config.labels
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.state.borrow().status.clone()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.borrow().loaded_at
    }

    /// Full collection as last fetched, unfiltered
    pub fn collection(&self) -> Vec<B::Record> {
        self.inner.state.borrow().collection.clone()
    }

    /// Search-narrowed, sorted rows across all pages
    pub fn visible_records(&self) -> Vec<B::Record> {
        self.inner.state.borrow().filtered_sorted()
    }

    /// The page currently on screen, recomputed from the collection
    pub fn page(&self) -> Page<B::Record> {
        let state = self.inner.state.borrow();
        let rows = state.filtered_sorted();
        paginate(
            &rows,
            state.pagination.page_size(),
            state.pagination.current_page(),
        )
    }

    pub fn pagination(&self) -> PaginationState {
        self.inner.state.borrow().pagination
    }

    pub fn search(&self) -> String {
        self.inner.state.borrow().search.clone()
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.inner.state.borrow().sort.clone()
    }

    pub fn filters(&self) -> FilterState {
        self.inner.state.borrow().filters.clone()
    }

    pub fn query_params(&self) -> QueryParams {
        self.inner.state.borrow().filters.build_query_params()
    }

    pub fn active_filter_count(&self) -> usize {
        self.inner.state.borrow().filters.active_count()
    }

    pub fn edit_session(&self) -> Option<EditSession<FormOf<B>>> {
        self.inner.state.borrow().edit.clone()
    }

    /// True while a delete or row action for `id` is awaiting the backend
    pub fn is_in_flight(&self, id: &RecordId) -> bool {
        self.inner.state.borrow().in_flight.contains(id)
    }

    pub fn find(&self, id: &RecordId) -> Option<B::Record> {
        self.inner
            .state
            .borrow()
            .collection
            .iter()
            .find(|r| &r.record_id() == id)
            .cloned()
    }

    fn display_name_of(&self, id: &RecordId) -> String {
        self.find(id)
            .map(|r| r.display_name())
            .unwrap_or_else(|| format!("#{}", id))
    }

    // ------------------------------------------------------------------
    // Loading and filters
    // ------------------------------------------------------------------

    /// Fetches the collection for the current filters.
    ///
    /// Every call takes a ticket; when a newer load was issued before this one
    /// settles, this result is dropped and the newer one decides the state.
    /// On failure the previous collection stays on screen.
    pub async fn load(&self) -> LoadOutcome {
        let (ticket, params) = {
            let mut state = self.inner.state.borrow_mut();
            state.load_seq += 1;
            state.status = LoadStatus::Loading;
            (state.load_seq, state.filters.build_query_params())
        };
        debug!(
            "load #{} of {} with {:?}",
            ticket,
            self.labels().plural,
            params
        );
        self.publish();

        let result = self.inner.backend.list(&params).await;

        let failure = {
            let mut state = self.inner.state.borrow_mut();
            if state.load_seq != ticket {
                warn!(
                    "dropping load #{} of {}, superseded by #{}",
                    ticket,
                    self.labels().plural,
                    state.load_seq
                );
                if let Err(err) = &result {
                    debug!("superseded load #{} had failed: {}", ticket, err);
                }
                return LoadOutcome::Superseded;
            }
            match result {
                Ok(records) => {
                    state.collection = records.unwrap_or_default();
                    state.status = LoadStatus::Loaded;
                    state.loaded_at = Some(Utc::now());
                    state.sync_pagination(self.inner.config.reset_policy);
                    debug!(
                        "load #{} of {}: {} records",
                        ticket,
                        self.labels().plural,
                        state.collection.len()
                    );
                    None
                }
                Err(err) => {
                    state.status = LoadStatus::Error(err.to_string());
                    Some(err)
                }
            }
        };

        let outcome = match failure {
            None => LoadOutcome::Applied,
            Some(err) => {
                warn!("failed to load {}: {}", self.labels().plural, err);
                self.notify(
                    Severity::Error,
                    err.title(),
                    format!("No se pudieron cargar los {}: {}", self.labels().plural, err),
                );
                LoadOutcome::Failed
            }
        };
        self.publish();
        outcome
    }

    /// Manual refresh; also the only way out of the error state
    pub async fn refresh(&self) -> LoadOutcome {
        self.load().await
    }

    /// Updates one filter field without reloading
    pub fn set_filter(&self, name: &str, raw: &str) -> Result<(), FilterError> {
        let result = self.inner.state.borrow_mut().filters.set_filter(name, raw);
        if let Err(err) = &result {
            debug!("filter rejected: {}", err);
        }
        self.publish();
        result
    }

    /// Sends the current filters to the backend
    pub async fn apply_filters(&self) -> LoadOutcome {
        if self.inner.config.reset_policy == PageResetPolicy::ResetToFirst {
            self.inner.state.borrow_mut().pagination.reset();
        }
        self.load().await
    }

    /// Resets all filters to their defaults and reloads.
    ///
    /// The cleared state is published and the task yields once before the
    /// reload is issued, so the UI commits the reset first.
    pub async fn clear_filters(&self) -> LoadOutcome {
        {
            let mut state = self.inner.state.borrow_mut();
            state.filters.clear();
            state.pagination.reset();
        }
        self.publish();
        YieldNow::default().await;
        self.load().await
    }

    // ------------------------------------------------------------------
    // Local view: search, sort, paging
    // ------------------------------------------------------------------

    /// Narrows the loaded collection; always returns to page 1
    pub fn set_search(&self, term: &str) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.search == term {
                return;
            }
            state.search = term.to_string();
            state.pagination.reset();
            state.sync_pagination(PageResetPolicy::ResetToFirst);
        }
        self.publish();
    }

    /// Same field flips direction, another field sorts ascending
    pub fn toggle_sort(&self, field: &'static str) {
        {
            let mut state = self.inner.state.borrow_mut();
            let next = match &state.sort {
                Some(sort) if sort.field == field => SortSpec {
                    field,
                    ascending: !sort.ascending,
                },
                _ => SortSpec {
                    field,
                    ascending: true,
                },
            };
            state.sort = Some(next);
        }
        self.publish();
    }

    pub fn go_to_page(&self, page: usize) {
        self.inner.state.borrow_mut().pagination.set_page(page);
        self.publish();
    }

    pub fn next_page(&self) {
        if self.inner.state.borrow_mut().pagination.next_page() {
            self.publish();
        }
    }

    pub fn prev_page(&self) {
        if self.inner.state.borrow_mut().pagination.prev_page() {
            self.publish();
        }
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.inner
            .state
            .borrow_mut()
            .pagination
            .set_page_size(page_size);
        self.publish();
    }

    // ------------------------------------------------------------------
    // Edit session
    // ------------------------------------------------------------------

    pub fn open_create(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let generation = state.next_edit_generation();
            state.edit = Some(EditSession::create(generation, <FormOf<B>>::default()));
        }
        self.publish();
    }

    /// Opens the edit dialog on a staged copy of the record. Returns false if
    /// the record is not in the collection.
    pub fn open_edit(&self, id: &RecordId) -> bool {
        let Some(record) = self.find(id) else {
            return false;
        };
        {
            let mut state = self.inner.state.borrow_mut();
            let generation = state.next_edit_generation();
            state.edit = Some(EditSession::edit(generation, id.clone(), record.to_form()));
        }
        self.publish();
        true
    }

    pub fn update_form(&self, edit: impl FnOnce(&mut FormOf<B>)) {
        {
            let mut state = self.inner.state.borrow_mut();
            let Some(session) = state.edit.as_mut() else {
                return;
            };
            edit(&mut session.form);
        }
        self.publish();
    }

    pub fn cancel_edit(&self) {
        self.inner.state.borrow_mut().edit = None;
        self.publish();
    }

    // ------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------

    fn begin_row_action(&self, id: &RecordId) -> bool {
        let inserted = self.inner.state.borrow_mut().in_flight.insert(id.clone());
        if inserted {
            self.publish();
        }
        inserted
    }

    fn end_row_action(&self, id: &RecordId) {
        self.inner.state.borrow_mut().in_flight.remove(id);
    }

    /// Confirm → call backend → reload → notify, for a domain specific action
    /// on one row. Only that row is marked in flight while the call runs.
    pub async fn run_action<F, Fut>(&self, id: &RecordId, action: RowAction, perform: F) -> MutationOutcome
    where
        F: FnOnce(Rc<B>, RecordId) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        if self.is_in_flight(id) {
            return MutationOutcome::Skipped;
        }
        if !self.inner.confirm.confirm(&action.confirm).await {
            debug!("action on {} declined", id);
            return MutationOutcome::Cancelled;
        }
        if !self.begin_row_action(id) {
            return MutationOutcome::Skipped;
        }

        let result = perform(Rc::clone(&self.inner.backend), id.clone()).await;
        self.end_row_action(id);

        match result {
            Ok(()) => {
                info!("action on {} {} succeeded", self.labels().singular, id);
                self.load().await;
                self.notify(Severity::Success, action.success_title, action.success_message);
                MutationOutcome::Completed
            }
            Err(err) => {
                warn!("action on {} {} failed: {}", self.labels().singular, id, err);
                self.notify(Severity::Error, err.title(), err.to_string());
                self.publish();
                MutationOutcome::Failed
            }
        }
    }
}

impl<B: CrudBackend> ListController<B> {
    fn begin_save(&self) -> Option<EditSession<FormOf<B>>> {
        let started = {
            let mut state = self.inner.state.borrow_mut();
            match state.edit.as_mut() {
                Some(session) if !session.saving => {
                    session.saving = true;
                    session.error = None;
                    Some(session.clone())
                }
                _ => None,
            }
        };
        if started.is_some() {
            self.publish();
        }
        started
    }

    /// Submits the open edit session.
    ///
    /// Success closes the dialog, notifies and reloads. Failure keeps the
    /// dialog open with the error shown inline. If the dialog was closed or
    /// replaced while the request ran, the session now open is left alone.
    pub async fn save(&self) -> MutationOutcome {
        let Some(submitted) = self.begin_save() else {
            return MutationOutcome::Skipped;
        };
        let EditSession {
            generation,
            mode,
            target_id,
            form,
            ..
        } = submitted;

        let backend = &self.inner.backend;
        let result = match (mode, &target_id) {
            (EditMode::Edit, Some(id)) => backend.update(id, &form).await,
            _ => backend.create(&form).await,
        };

        match result {
            Ok(record) => {
                {
                    let mut state = self.inner.state.borrow_mut();
                    if state.edit_with_generation(generation).is_some() {
                        state.edit = None;
                    } else {
                        debug!("save of session #{} settled after it was closed", generation);
                    }
                }
                let name = record.display_name();
                let (title, verb) = match mode {
                    EditMode::Create => ("Registro creado", "creado"),
                    EditMode::Edit => ("Registro actualizado", "actualizado"),
                };
                info!("{} {} {}", self.labels().singular, name, verb);
                self.notify(
                    Severity::Success,
                    title,
                    format!("{} «{}» {} correctamente", self.labels().singular, name, verb),
                );
                self.publish();
                self.load().await;
                MutationOutcome::Completed
            }
            Err(err) => {
                warn!("failed to save {}: {}", self.labels().singular, err);
                if let Some(session) = self.inner.state.borrow_mut().edit_with_generation(generation) {
                    session.saving = false;
                    session.error = Some(err.inline_message());
                }
                self.notify(Severity::Error, err.title(), err.to_string());
                self.publish();
                MutationOutcome::Failed
            }
        }
    }

    /// Deletes a record after the confirmation gate approves it by name
    pub async fn delete(&self, id: &RecordId) -> MutationOutcome {
        if self.is_in_flight(id) {
            return MutationOutcome::Skipped;
        }
        let name = self.display_name_of(id);
        let singular = self.labels().singular;
        let request = ConfirmRequest::new(
            format!("Eliminar {}", singular.to_lowercase()),
            format!(
                "¿Eliminar {} «{}»? Esta acción no se puede deshacer.",
                singular.to_lowercase(),
                name
            ),
        );
        if !self.inner.confirm.confirm(&request).await {
            debug!("delete of {} declined", id);
            return MutationOutcome::Cancelled;
        }
        if !self.begin_row_action(id) {
            return MutationOutcome::Skipped;
        }

        let result = self.inner.backend.delete(id).await;
        self.end_row_action(id);

        match result {
            Ok(()) => {
                info!("{} {} deleted", singular, name);
                self.load().await;
                self.notify(
                    Severity::Warning,
                    "Registro eliminado",
                    format!("{} «{}» fue eliminado", singular, name),
                );
                MutationOutcome::Completed
            }
            Err(err) => {
                warn!("failed to delete {} {}: {}", singular, id, err);
                self.notify(Severity::Error, err.title(), err.to_string());
                self.publish();
                MutationOutcome::Failed
            }
        }
    }
}

/// Gives the executor one turn before continuing
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_controller::filter_state::FilterOption;
    use crate::shared::list_utils::{compare_ci, contains_ci, Searchable, Sortable};
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::cmp::Ordering;
    use std::collections::VecDeque;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct TestRole {
        id: i64,
        name: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct TestRoleForm {
        name: String,
    }

    impl Searchable for TestRole {
        fn matches_filter(&self, needle: &str) -> bool {
            contains_ci(&self.name, needle)
        }
    }

    impl Sortable for TestRole {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => compare_ci(&self.name, &other.name),
                _ => self.id.cmp(&other.id),
            }
        }
    }

    impl ListRecord for TestRole {
        type Form = TestRoleForm;

        fn record_id(&self) -> RecordId {
            RecordId::Int(self.id)
        }

        fn display_name(&self) -> String {
            self.name.clone()
        }

        fn to_form(&self) -> TestRoleForm {
            TestRoleForm {
                name: self.name.clone(),
            }
        }
    }

    fn roles(n: i64) -> Vec<TestRole> {
        (1..=n)
            .map(|id| TestRole {
                id,
                name: format!("Rol {:02}", id),
            })
            .collect()
    }

    type ListReply = (Result<Option<Vec<TestRole>>, ApiError>, u64);

    /// Scripted backend: list replies are consumed in call order, each with an
    /// optional delay in milliseconds.
    #[derive(Default)]
    struct MockBackend {
        list_replies: RefCell<VecDeque<ListReply>>,
        list_calls: RefCell<Vec<QueryParams>>,
        create_reply: RefCell<Option<Result<TestRole, ApiError>>>,
        create_delay_ms: Cell<u64>,
        creates: RefCell<Vec<TestRoleForm>>,
        updates: RefCell<Vec<(RecordId, TestRoleForm)>>,
        delete_reply: RefCell<Option<Result<(), ApiError>>>,
        deletes: RefCell<Vec<RecordId>>,
        activations: RefCell<Vec<RecordId>>,
    }

    impl MockBackend {
        fn reply(self, result: Result<Option<Vec<TestRole>>, ApiError>) -> Self {
            self.list_replies.borrow_mut().push_back((result, 0));
            self
        }

        fn reply_after(self, result: Result<Option<Vec<TestRole>>, ApiError>, ms: u64) -> Self {
            self.list_replies.borrow_mut().push_back((result, ms));
            self
        }
    }

    #[async_trait(?Send)]
    impl ListBackend for MockBackend {
        type Record = TestRole;

        async fn list(&self, params: &QueryParams) -> Result<Option<Vec<TestRole>>, ApiError> {
            self.list_calls.borrow_mut().push(params.clone());
            let (result, delay) = self
                .list_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or((Ok(Some(Vec::new())), 0));
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            result
        }
    }

    #[async_trait(?Send)]
    impl CrudBackend for MockBackend {
        async fn create(&self, form: &TestRoleForm) -> Result<TestRole, ApiError> {
            self.creates.borrow_mut().push(form.clone());
            let delay = self.create_delay_ms.get();
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            self.create_reply.borrow_mut().take().unwrap_or_else(|| {
                Ok(TestRole {
                    id: 100,
                    name: form.name.clone(),
                })
            })
        }

        async fn update(&self, id: &RecordId, form: &TestRoleForm) -> Result<TestRole, ApiError> {
            self.updates.borrow_mut().push((id.clone(), form.clone()));
            Ok(TestRole {
                id: id.as_int().unwrap_or_default(),
                name: form.name.clone(),
            })
        }

        async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
            self.deletes.borrow_mut().push(id.clone());
            self.delete_reply.borrow_mut().take().unwrap_or(Ok(()))
        }
    }

    impl MockBackend {
        async fn activate(&self, id: &RecordId) -> Result<(), ApiError> {
            self.activations.borrow_mut().push(id.clone());
            if id == &RecordId::Int(2) {
                return Err(ApiError::Conflict("La unidad ya está en emergencia".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: RefCell<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.seen.borrow_mut().push(notification);
        }
    }

    impl RecordingSink {
        fn severities(&self) -> Vec<Severity> {
            self.seen.borrow().iter().map(|n| n.severity).collect()
        }
    }

    struct ScriptedConfirm {
        answer: bool,
        asked: RefCell<Vec<ConfirmRequest>>,
    }

    #[async_trait(?Send)]
    impl ConfirmationGate for ScriptedConfirm {
        async fn confirm(&self, request: &ConfirmRequest) -> bool {
            self.asked.borrow_mut().push(request.clone());
            self.answer
        }
    }

    struct Harness {
        controller: ListController<MockBackend>,
        sink: Rc<RecordingSink>,
        confirm: Rc<ScriptedConfirm>,
    }

    impl Harness {
        fn backend(&self) -> &MockBackend {
            &self.controller.inner.backend
        }
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("nombre", "Nombre"),
            FilterDescriptor::select(
                "activo",
                "Estado",
                vec![
                    FilterOption::new("true", "Activo"),
                    FilterOption::new("false", "Inactivo"),
                ],
            ),
        ]
    }

    fn harness_with(backend: MockBackend, config: ListConfig, confirm: bool) -> Harness {
        let sink = Rc::new(RecordingSink::default());
        let confirm = Rc::new(ScriptedConfirm {
            answer: confirm,
            asked: RefCell::new(Vec::new()),
        });
        let controller = ListController::new(
            backend,
            filters(),
            config,
            sink.clone(),
            confirm.clone(),
        );
        Harness {
            controller,
            sink,
            confirm,
        }
    }

    fn harness(backend: MockBackend) -> Harness {
        harness_with(backend, ListConfig::new("Rol", "roles"), true)
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        assert_eq!(h.controller.status(), LoadStatus::Idle);

        assert_eq!(h.controller.load().await, LoadOutcome::Applied);
        assert_eq!(h.controller.status(), LoadStatus::Loaded);
        assert_eq!(h.controller.collection().len(), 3);
        assert!(h.controller.loaded_at().is_some());
        assert!(h.sink.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_null_body_becomes_empty_collection() {
        let h = harness(MockBackend::default().reply(Ok(None)));
        h.controller.load().await;
        assert_eq!(h.controller.status(), LoadStatus::Loaded);
        assert!(h.controller.collection().is_empty());
        let page = h.controller.page();
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_load_twice_is_idempotent() {
        let h = harness(
            MockBackend::default()
                .reply(Ok(Some(roles(4))))
                .reply(Ok(Some(roles(4)))),
        );
        h.controller.load().await;
        let first = h.controller.collection();
        h.controller.load().await;
        assert_eq!(h.controller.collection(), first);
        assert!(h.sink.seen.borrow().is_empty());
        assert_eq!(h.backend().list_calls.borrow()[0], h.backend().list_calls.borrow()[1]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_collection() {
        let h = harness(
            MockBackend::default()
                .reply(Ok(Some(roles(12))))
                .reply(Err(ApiError::transport("connection refused"))),
        );
        h.controller.load().await;
        assert_eq!(h.controller.load().await, LoadOutcome::Failed);

        assert_eq!(h.controller.collection().len(), 12);
        assert_eq!(
            h.controller.status(),
            LoadStatus::Error("connection refused".to_string())
        );
        assert_eq!(h.sink.severities(), vec![Severity::Error]);
    }

    #[tokio::test]
    async fn test_error_state_does_not_retry_by_itself() {
        let h = harness(
            MockBackend::default()
                .reply(Err(ApiError::transport("down")))
                .reply(Ok(Some(roles(2)))),
        );
        h.controller.load().await;
        assert_eq!(h.backend().list_calls.borrow().len(), 1);
        assert!(h.controller.status().error_message().is_some());

        h.controller.refresh().await;
        assert_eq!(h.controller.status(), LoadStatus::Loaded);
        assert_eq!(h.backend().list_calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let h = harness(
            MockBackend::default()
                .reply_after(Ok(Some(roles(5))), 60)
                .reply_after(Ok(Some(roles(2))), 5),
        );
        let (first, second) = tokio::join!(h.controller.load(), h.controller.load());

        let mut outcomes = vec![first, second];
        outcomes.sort_by_key(|o| *o == LoadOutcome::Applied);
        assert_eq!(outcomes, vec![LoadOutcome::Superseded, LoadOutcome::Applied]);
        // The slow reply belongs to the first issued call and must not win.
        assert_eq!(h.controller.collection().len(), 2);
        assert_eq!(h.controller.status(), LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_superseded_failure_is_not_reported() {
        let h = harness(
            MockBackend::default()
                .reply_after(Err(ApiError::transport("timeout")), 40)
                .reply_after(Ok(Some(roles(3))), 5),
        );
        tokio::join!(h.controller.load(), h.controller.load());
        assert_eq!(h.controller.status(), LoadStatus::Loaded);
        assert!(h.sink.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_apply_filters_sends_only_set_fields() {
        let h = harness(MockBackend::default());
        h.controller.set_filter("nombre", "mec").unwrap();
        h.controller.set_filter("activo", "").unwrap();
        h.controller.apply_filters().await;

        let calls = h.backend().list_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0]["nombre"], "mec");
    }

    #[tokio::test]
    async fn test_rejected_filter_leaves_state() {
        let h = harness(MockBackend::default());
        assert!(h.controller.set_filter("ruta", "x").is_err());
        assert!(h.controller.set_filter("activo", "quizas").is_err());
        assert!(h.controller.query_params().is_empty());
    }

    #[tokio::test]
    async fn test_clear_filters_matches_fresh_mount() {
        let fresh = harness(MockBackend::default());
        fresh.controller.apply_filters().await;

        let h = harness(MockBackend::default());
        h.controller.set_filter("nombre", "admin").unwrap();
        h.controller.set_filter("activo", "false").unwrap();
        h.controller.apply_filters().await;
        assert_eq!(h.controller.active_filter_count(), 2);

        assert_eq!(h.controller.clear_filters().await, LoadOutcome::Applied);
        assert_eq!(h.controller.active_filter_count(), 0);

        let calls = h.backend().list_calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], fresh.backend().list_calls.borrow()[0]);
    }

    #[tokio::test]
    async fn test_clear_filters_publishes_before_reload() {
        let h = harness(MockBackend::default());
        h.controller.set_filter("nombre", "admin").unwrap();
        h.controller.apply_filters().await;

        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let observed = h.controller.clone();
        let sink = snapshots.clone();
        h.controller.subscribe(move || {
            sink.borrow_mut().push((
                observed.query_params().is_empty(),
                observed.inner.backend.list_calls.borrow().len(),
                observed.status().is_loading(),
            ));
        });

        h.controller.clear_filters().await;

        let snapshots = snapshots.borrow();
        assert_eq!(snapshots[0], (true, 1, false));
        assert_eq!(h.backend().list_calls.borrow().len(), 2);
        assert!(h.backend().list_calls.borrow()[1].is_empty());
    }

    #[tokio::test]
    async fn test_requested_page_past_end_clamps() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(25)))));
        h.controller.load().await;

        h.controller.go_to_page(4);
        let page = h.controller.page();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(h.controller.pagination().current_page(), 3);
    }

    #[tokio::test]
    async fn test_reload_with_fewer_rows_clamps_page() {
        let h = harness(
            MockBackend::default()
                .reply(Ok(Some(roles(25))))
                .reply(Ok(Some(roles(11)))),
        );
        h.controller.load().await;
        h.controller.go_to_page(3);
        h.controller.load().await;
        assert_eq!(h.controller.pagination().current_page(), 2);
        assert_eq!(h.controller.page().items.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_policy_returns_to_first_page_on_reload() {
        let config = ListConfig::new("Ruta", "rutas").with_reset_policy(PageResetPolicy::ResetToFirst);
        let h = harness_with(
            MockBackend::default()
                .reply(Ok(Some(roles(25))))
                .reply(Ok(Some(roles(25)))),
            config,
            true,
        );
        h.controller.load().await;
        h.controller.go_to_page(2);
        h.controller.apply_filters().await;
        assert_eq!(h.controller.pagination().current_page(), 1);
    }

    #[tokio::test]
    async fn test_page_size_change_resets_page() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(25)))));
        h.controller.load().await;
        h.controller.go_to_page(3);
        h.controller.set_page_size(5);
        assert_eq!(h.controller.pagination().current_page(), 1);
        assert_eq!(h.controller.page().total_pages, 5);
    }

    #[tokio::test]
    async fn test_search_narrows_and_resets_page() {
        let mut rows = roles(30);
        rows[27].name = "Mecánico de turno".to_string();
        let h = harness(MockBackend::default().reply(Ok(Some(rows))));
        h.controller.load().await;
        h.controller.go_to_page(3);

        h.controller.set_search("MECÁNICO");
        assert_eq!(h.controller.pagination().current_page(), 1);
        let page = h.controller.page();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, 28);
        // Search is local: no extra request.
        assert_eq!(h.backend().list_calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_applies_before_pagination() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(25)))));
        h.controller.load().await;

        h.controller.toggle_sort("id");
        h.controller.toggle_sort("id");
        assert_eq!(h.controller.sort().map(|s| s.ascending), Some(false));

        let first = h.controller.page();
        assert_eq!(first.items[0].id, 25);
        h.controller.next_page();
        let second = h.controller.page();
        assert_eq!(second.items[0].id, 15);
        h.controller.prev_page();
        assert_eq!(h.controller.page(), first);
    }

    #[tokio::test]
    async fn test_create_success_notifies_closes_and_reloads() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(2)))));
        h.controller.load().await;

        h.controller.open_create();
        h.controller.update_form(|form| form.name = "Mecánico".to_string());
        assert_eq!(h.controller.save().await, MutationOutcome::Completed);

        assert!(h.controller.edit_session().is_none());
        assert_eq!(h.backend().creates.borrow()[0].name, "Mecánico");
        let seen = h.sink.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Success);
        assert!(seen[0].message.contains("Mecánico"));
        assert_eq!(h.backend().list_calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_session_open() {
        let backend = MockBackend::default();
        *backend.create_reply.borrow_mut() = Some(Err(ApiError::validation(
            Some("nombre"),
            "ya existe",
        )));
        let h = harness(backend);

        h.controller.open_create();
        h.controller.update_form(|form| form.name = "Admin".to_string());
        assert_eq!(h.controller.save().await, MutationOutcome::Failed);

        let session = h.controller.edit_session().expect("session stays open");
        assert_eq!(session.form.name, "Admin");
        assert_eq!(session.error.as_deref(), Some("nombre: ya existe"));
        assert!(!session.saving);
        assert_eq!(h.sink.severities(), vec![Severity::Error]);
        assert!(h.backend().list_calls.borrow().is_empty());
    }

    /// Closes the dialog of a pending create and opens row 2 for editing
    async fn switch_to_edit_mid_save(controller: &ListController<MockBackend>) {
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.cancel_edit();
        assert!(controller.open_edit(&RecordId::Int(2)));
        controller.update_form(|form| form.name = "Rol 02 editado".to_string());
    }

    #[tokio::test]
    async fn test_late_save_success_keeps_newer_session() {
        let backend = MockBackend::default().reply(Ok(Some(roles(3))));
        backend.create_delay_ms.set(30);
        let h = harness(backend);
        h.controller.load().await;

        h.controller.open_create();
        h.controller.update_form(|form| form.name = "Nuevo".to_string());
        let (outcome, ()) = tokio::join!(
            h.controller.save(),
            switch_to_edit_mid_save(&h.controller)
        );

        assert_eq!(outcome, MutationOutcome::Completed);
        let session = h.controller.edit_session().expect("newer session survives");
        assert_eq!(session.mode, EditMode::Edit);
        assert_eq!(session.target_id, Some(RecordId::Int(2)));
        assert_eq!(session.form.name, "Rol 02 editado");
        assert!(!session.saving);
        assert_eq!(h.sink.severities(), vec![Severity::Success]);
    }

    #[tokio::test]
    async fn test_late_save_failure_leaves_newer_session_clean() {
        let backend = MockBackend::default().reply(Ok(Some(roles(3))));
        backend.create_delay_ms.set(30);
        *backend.create_reply.borrow_mut() = Some(Err(ApiError::validation(
            Some("nombre"),
            "ya existe",
        )));
        let h = harness(backend);
        h.controller.load().await;

        h.controller.open_create();
        let (outcome, ()) = tokio::join!(
            h.controller.save(),
            switch_to_edit_mid_save(&h.controller)
        );

        assert_eq!(outcome, MutationOutcome::Failed);
        let session = h.controller.edit_session().expect("newer session survives");
        assert_eq!(session.target_id, Some(RecordId::Int(2)));
        assert_eq!(session.form.name, "Rol 02 editado");
        assert_eq!(session.error, None);
        assert_eq!(h.sink.severities(), vec![Severity::Error]);
    }

    #[tokio::test]
    async fn test_each_opened_dialog_gets_a_new_generation() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        h.controller.load().await;

        h.controller.open_edit(&RecordId::Int(1));
        let first = h.controller.edit_session().unwrap();
        h.controller.open_edit(&RecordId::Int(1));
        let second = h.controller.edit_session().unwrap();
        assert!(first.is_edit());
        assert_ne!(first.generation, second.generation);
    }

    #[tokio::test]
    async fn test_edit_stages_a_copy() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        h.controller.load().await;

        assert!(h.controller.open_edit(&RecordId::Int(2)));
        h.controller.update_form(|form| form.name = "Supervisor".to_string());
        assert_eq!(h.controller.find(&RecordId::Int(2)).unwrap().name, "Rol 02");

        h.controller.cancel_edit();
        assert!(h.controller.edit_session().is_none());
        assert!(h.backend().updates.borrow().is_empty());
        assert!(!h.controller.open_edit(&RecordId::Int(99)));
    }

    #[tokio::test]
    async fn test_update_goes_to_target_id() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        h.controller.load().await;
        h.controller.open_edit(&RecordId::Int(3));
        h.controller.update_form(|form| form.name = "Despachador".to_string());

        assert_eq!(h.controller.save().await, MutationOutcome::Completed);
        let updates = h.backend().updates.borrow();
        assert_eq!(updates[0].0, RecordId::Int(3));
        assert!(h.sink.seen.borrow()[0].message.contains("Despachador"));
    }

    #[tokio::test]
    async fn test_save_without_session_is_skipped() {
        let h = harness(MockBackend::default());
        assert_eq!(h.controller.save().await, MutationOutcome::Skipped);
        assert!(h.backend().creates.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_declined_delete_does_nothing() {
        let h = harness_with(
            MockBackend::default().reply(Ok(Some(roles(8)))),
            ListConfig::new("Rol", "roles"),
            false,
        );
        h.controller.load().await;

        let outcome = h.controller.delete(&RecordId::Int(7)).await;
        assert_eq!(outcome, MutationOutcome::Cancelled);
        assert!(h.backend().deletes.borrow().is_empty());
        assert!(h.sink.seen.borrow().is_empty());
        assert_eq!(h.controller.collection().len(), 8);
        assert_eq!(h.backend().list_calls.borrow().len(), 1);
        assert!(h.confirm.asked.borrow()[0].message.contains("Rol 07"));
    }

    #[tokio::test]
    async fn test_confirmed_delete_reloads_then_warns() {
        let h = harness(
            MockBackend::default()
                .reply(Ok(Some(roles(8))))
                .reply(Ok(Some(roles(7)))),
        );
        h.controller.load().await;

        let outcome = h.controller.delete(&RecordId::Int(7)).await;
        assert_eq!(outcome, MutationOutcome::Completed);
        assert_eq!(h.backend().deletes.borrow().as_slice(), &[RecordId::Int(7)]);
        assert_eq!(h.controller.collection().len(), 7);
        assert_eq!(h.sink.severities(), vec![Severity::Warning]);
        assert!(!h.controller.is_in_flight(&RecordId::Int(7)));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_collection() {
        let backend = MockBackend::default().reply(Ok(Some(roles(8))));
        *backend.delete_reply.borrow_mut() = Some(Err(ApiError::transport("500")));
        let h = harness(backend);
        h.controller.load().await;

        assert_eq!(h.controller.delete(&RecordId::Int(1)).await, MutationOutcome::Failed);
        assert_eq!(h.controller.collection().len(), 8);
        assert_eq!(h.sink.severities(), vec![Severity::Error]);
        assert_eq!(h.backend().list_calls.borrow().len(), 1);
    }

    fn activate_action(id: &RecordId) -> RowAction {
        RowAction {
            confirm: ConfirmRequest::new("Activar emergencia", format!("¿Activar {}?", id)),
            success_title: "Emergencia activada".to_string(),
            success_message: format!("Unidad {} en servicio de emergencia", id),
        }
    }

    #[tokio::test]
    async fn test_row_action_marks_only_its_row() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        h.controller.load().await;

        let observed = Rc::new(Cell::new(false));
        let probe = h.controller.clone();
        let seen = observed.clone();
        h.controller.subscribe(move || {
            if probe.is_in_flight(&RecordId::Int(1)) {
                assert!(!probe.is_in_flight(&RecordId::Int(3)));
                seen.set(true);
            }
        });

        let id = RecordId::Int(1);
        let outcome = h
            .controller
            .run_action(&id, activate_action(&id), |backend, id| async move {
                backend.activate(&id).await
            })
            .await;

        assert_eq!(outcome, MutationOutcome::Completed);
        assert!(observed.get());
        assert!(!h.controller.is_in_flight(&id));
        assert_eq!(h.sink.severities(), vec![Severity::Success]);
        assert_eq!(h.backend().list_calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_row_action_conflict() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        h.controller.load().await;

        let id = RecordId::Int(2);
        let outcome = h
            .controller
            .run_action(&id, activate_action(&id), |backend, id| async move {
                backend.activate(&id).await
            })
            .await;

        assert_eq!(outcome, MutationOutcome::Failed);
        let seen = h.sink.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Error);
        assert_eq!(seen[0].title, "Operación no permitida");
        assert_eq!(h.backend().list_calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_row_action() {
        let h = harness_with(MockBackend::default(), ListConfig::new("Unidad", "unidades"), false);
        let id = RecordId::from("AB-1234");
        let outcome = h
            .controller
            .run_action(&id, activate_action(&id), |backend, id| async move {
                backend.activate(&id).await
            })
            .await;
        assert_eq!(outcome, MutationOutcome::Cancelled);
        assert!(h.backend().activations.borrow().is_empty());
        assert!(h.sink.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_listeners_fire_on_changes() {
        let h = harness(MockBackend::default().reply(Ok(Some(roles(3)))));
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        h.controller.subscribe(move || counter.set(counter.get() + 1));

        h.controller.load().await;
        // Loading + Loaded
        assert_eq!(hits.get(), 2);
        h.controller.set_search("rol");
        assert_eq!(hits.get(), 3);
        h.controller.set_search("rol");
        assert_eq!(hits.get(), 3);
    }
}
