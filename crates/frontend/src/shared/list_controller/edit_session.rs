use contracts::domain::common::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

/// Состояние открытого диалога создания/редактирования.
///
/// `form` is a staged copy; the list collection is never touched until the
/// backend accepts the save and the list is reloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession<F> {
    /// Distinct for every opened dialog; a save only settles into the session
    /// it was submitted from
    pub generation: u64,
    pub mode: EditMode,
    pub target_id: Option<RecordId>,
    pub form: F,
    /// Inline error from the last failed save
    pub error: Option<String>,
    pub saving: bool,
}

impl<F> EditSession<F> {
    pub fn create(generation: u64, form: F) -> Self {
        Self {
            generation,
            mode: EditMode::Create,
            target_id: None,
            form,
            error: None,
            saving: false,
        }
    }

    pub fn edit(generation: u64, id: RecordId, form: F) -> Self {
        Self {
            generation,
            mode: EditMode::Edit,
            target_id: Some(id),
            form,
            error: None,
            saving: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.mode == EditMode::Edit
    }
}
