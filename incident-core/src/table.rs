//! State controller behind the incidents table.
//!
//! Owns the collection, the search and status selector, the add and edit
//! drafts with their error maps, and the adding / editing flags. Every
//! mutation of the collection is mirrored to the storage slot before the
//! method returns.

use crate::clock::{Clock, LocalClock};
use crate::config::TableConfig;
use crate::draft::{validate_edit, validate_new, Field, IncidentDraft, ValidationErrors};
use crate::filter::filter_incidents;
use crate::model::{next_id, Incident, IncidentId, StatusFilter};
use crate::storage::{load_incidents, save_incidents, StorageSlot};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The collection already holds the largest representable id.
    #[error("no incident id left after {0}")]
    IdsExhausted(IncidentId),
}

/// Callback handed the full collection after a create, update or delete.
pub type ChangeHandler = Box<dyn Fn(&[Incident])>;

/// Blocking yes/no prompt shown before a delete.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing,
}

pub struct IncidentTable<S, C = LocalClock> {
    data: Vec<Incident>,
    storage: S,
    clock: C,
    config: TableConfig,
    on_change: Option<ChangeHandler>,

    search: String,
    status_filter: StatusFilter,

    adding: bool,
    new_draft: IncidentDraft,
    new_errors: ValidationErrors,

    editing_id: Option<IncidentId>,
    edit_draft: IncidentDraft,
    edit_errors: ValidationErrors,
}

impl<S: StorageSlot> IncidentTable<S, LocalClock> {
    pub fn new(storage: S, config: TableConfig) -> Self {
        Self::with_clock(storage, LocalClock, config)
    }
}

impl<S: StorageSlot, C: Clock> IncidentTable<S, C> {
    pub fn with_clock(storage: S, clock: C, config: TableConfig) -> Self {
        Self {
            data: Vec::new(),
            storage,
            clock,
            config,
            on_change: None,
            search: String::new(),
            status_filter: StatusFilter::All,
            adding: false,
            new_draft: IncidentDraft::default(),
            new_errors: ValidationErrors::default(),
            editing_id: None,
            edit_draft: IncidentDraft::default(),
            edit_errors: ValidationErrors::default(),
        }
    }

    /// Registers the owner's change callback.
    pub fn set_on_change(&mut self, handler: impl Fn(&[Incident]) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    /// Applies a new external incidents list.
    ///
    /// A non-empty list replaces the collection. An empty one means "no
    /// external data": the collection is loaded from storage instead, and
    /// is left as is when nothing usable is stored.
    pub fn reconcile(&mut self, external: &[Incident]) {
        if !external.is_empty() {
            debug!(count = external.len(), "adopting external incidents");
            self.replace(external.to_vec());
            return;
        }

        match load_incidents(&self.storage, &self.config.storage_key) {
            Ok(Some(stored)) => {
                debug!(count = stored.len(), key = %self.config.storage_key, "restored incidents from storage");
                self.replace(stored);
            }
            Ok(None) => debug!(key = %self.config.storage_key, "no stored incidents"),
            Err(e) => debug!(error = %e, key = %self.config.storage_key, "ignoring stored incidents"),
        }
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.data
    }

    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.data.iter().find(|i| i.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rows matching the current search and status selector.
    pub fn visible(&self) -> Vec<Incident> {
        filter_incidents(&self.data, &self.search, self.status_filter)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    // Add form.

    pub fn is_adding(&self) -> bool {
        self.adding
    }

    pub fn start_adding(&mut self) {
        self.adding = true;
    }

    pub fn cancel_adding(&mut self) {
        self.adding = false;
        self.new_draft = IncidentDraft::default();
        self.new_errors = ValidationErrors::default();
    }

    pub fn new_draft(&self) -> &IncidentDraft {
        &self.new_draft
    }

    pub fn new_draft_mut(&mut self) -> &mut IncidentDraft {
        &mut self.new_draft
    }

    pub fn new_errors(&self) -> &ValidationErrors {
        &self.new_errors
    }

    /// Validates the add draft and prepends the new incident.
    ///
    /// Neither the collection nor the draft changes on error.
    pub fn create(&mut self) -> Result<IncidentId, CreateError> {
        let time = match validate_new(&self.new_draft, &self.clock.now()) {
            Ok(time) => time,
            Err(errors) => {
                debug!(%errors, "create rejected");
                self.new_errors = errors.clone();
                return Err(errors.into());
            }
        };

        let Some(id) = next_id(&self.data) else {
            let max = self.data.iter().map(|i| i.id).max().unwrap_or_default();
            warn!(max, "incident ids exhausted");
            return Err(CreateError::IdsExhausted(max));
        };
        let created = Incident {
            id,
            kind: self.new_draft.kind.clone(),
            location: self.new_draft.location.clone(),
            method: self.new_draft.method.clone(),
            time,
            status: self.new_draft.status,
        };

        let mut next = Vec::with_capacity(self.data.len() + 1);
        next.push(created);
        next.extend(self.data.iter().cloned());

        debug!(id, "incident created");
        self.new_errors = ValidationErrors::default();
        self.commit(next);
        self.new_draft = IncidentDraft::default();
        self.adding = false;
        Ok(id)
    }

    // Edit form.

    pub fn editing_id(&self) -> Option<IncidentId> {
        self.editing_id
    }

    pub fn row_mode(&self, id: IncidentId) -> RowMode {
        if self.editing_id == Some(id) {
            RowMode::Editing
        } else {
            RowMode::Viewing
        }
    }

    /// Puts row `id` into edit mode with its current values in the draft.
    /// Returns false for an unknown id.
    pub fn start_edit(&mut self, id: IncidentId) -> bool {
        let Some(incident) = self.get(id) else {
            return false;
        };
        self.edit_draft = IncidentDraft::from_incident(incident);
        self.editing_id = Some(id);
        self.edit_errors = ValidationErrors::default();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
    }

    pub fn edit_draft(&self) -> &IncidentDraft {
        &self.edit_draft
    }

    pub fn edit_draft_mut(&mut self) -> &mut IncidentDraft {
        &mut self.edit_draft
    }

    pub fn edit_errors(&self) -> &ValidationErrors {
        &self.edit_errors
    }

    /// Validates the edit draft and writes it over incident `id`.
    ///
    /// Returns whether a row matched; an unknown id leaves the collection
    /// unchanged but still ends edit mode.
    pub fn update(&mut self, id: IncidentId) -> Result<bool, ValidationErrors> {
        if let Err(errors) = validate_edit(&self.edit_draft) {
            debug!(id, %errors, "update rejected");
            self.edit_errors = errors.clone();
            return Err(errors);
        }
        self.edit_errors = ValidationErrors::default();

        let mut matched = false;
        let next: Vec<Incident> = self
            .data
            .iter()
            .map(|incident| {
                let mut incident = incident.clone();
                if incident.id == id {
                    self.edit_draft.apply_to(&mut incident);
                    matched = true;
                }
                incident
            })
            .collect();

        debug!(id, matched, "incident updated");
        self.commit(next);
        self.editing_id = None;
        Ok(matched)
    }

    /// Removes incident `id` once `confirm` agrees. Returns whether the
    /// prompt was accepted.
    pub fn delete(&mut self, id: IncidentId, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(&self.config.confirm_message) {
            debug!(id, "delete declined");
            return false;
        }

        let next: Vec<Incident> = self.data.iter().filter(|i| i.id != id).cloned().collect();
        debug!(id, "incident deleted");
        self.commit(next);
        if self.editing_id == Some(id) {
            self.editing_id = None;
        }
        true
    }

    /// Sets a single field of the draft for whichever form is addressed.
    pub fn set_new_field(&mut self, field: Field, value: impl Into<String>) {
        self.new_draft.set(field, value);
    }

    pub fn set_edit_field(&mut self, field: Field, value: impl Into<String>) {
        self.edit_draft.set(field, value);
    }

    fn commit(&mut self, next: Vec<Incident>) {
        self.replace(next);
        if let Some(notify) = &self.on_change {
            notify(&self.data);
        }
    }

    fn replace(&mut self, next: Vec<Incident>) {
        self.data = next;
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_incidents(&self.storage, &self.config.storage_key, &self.data) {
            warn!(error = %e, key = %self.config.storage_key, "failed to persist incidents");
        }
    }
}
