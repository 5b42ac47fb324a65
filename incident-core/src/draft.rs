use crate::model::{Incident, Status};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Uncommitted values of the add or edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidentDraft {
    pub kind: String,
    pub location: String,
    pub method: String,
    pub time: String,
    pub status: Status,
}

impl IncidentDraft {
    pub fn from_incident(incident: &Incident) -> Self {
        Self {
            kind: incident.kind.clone(),
            location: incident.location.clone(),
            method: incident.method.clone(),
            time: incident.time.clone(),
            status: incident.status,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Type => &self.kind,
            Field::Location => &self.location,
            Field::Method => &self.method,
            Field::Time => &self.time,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Type => self.kind = value,
            Field::Location => self.location = value,
            Field::Method => self.method = value,
            Field::Time => self.time = value,
        }
    }

    /// Copies the editable fields onto `incident`, leaving its id alone.
    pub(crate) fn apply_to(&self, incident: &mut Incident) {
        incident.kind = self.kind.clone();
        incident.location = self.location.clone();
        incident.method = self.method.clone();
        incident.time = self.time.clone();
        incident.status = self.status;
    }
}

/// Text fields the forms validate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Type,
    Location,
    Method,
    Time,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Type, Field::Location, Field::Method, Field::Time];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Location => "location",
            Field::Method => "method",
            Field::Time => "time",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::Location => "Location",
            Field::Method => "Method",
            Field::Time => "Time",
        }
    }

    pub fn required_message(&self) -> &'static str {
        match self {
            Field::Type => "Type is required",
            Field::Location => "Location is required",
            Field::Method => "Method is required",
            Field::Time => "Time is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed messages from a rejected draft.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("incident draft rejected: {}", summarize(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.errors.insert(field, field.required_message());
        }
    }
}

fn summarize(errors: &BTreeMap<Field, &'static str>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates the add form. A blank time falls back to `now`, and is only an
/// error if `now` is blank too. Returns the time to store.
pub fn validate_new(draft: &IncidentDraft, now: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require(Field::Type, &draft.kind);
    errors.require(Field::Location, &draft.location);
    errors.require(Field::Method, &draft.method);

    let time = match draft.time.trim() {
        "" => now.trim(),
        typed => typed,
    };
    errors.require(Field::Time, time);

    if errors.is_empty() {
        Ok(time.to_string())
    } else {
        Err(errors)
    }
}

/// Validates the edit form. Every text field is required.
pub fn validate_edit(draft: &IncidentDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for field in Field::ALL {
        errors.require(field, draft.get(field));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
