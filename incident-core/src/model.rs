use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type IncidentId = i64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Investigating,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Investigating, Status::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Investigating => "investigating",
            Status::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Investigating => "Investigating",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investigating" => Ok(Status::Investigating),
            "resolved" => Ok(Status::Resolved),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

// Stored data may carry "Resolved" from hand edits or older writers.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.to_ascii_lowercase()
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Status selector of the table view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// A detected security or operational event.
///
/// String fields default to empty when missing from stored data; the form
/// boundary is what guarantees they are filled for new and edited records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub status: Status,
}

impl Incident {
    /// Case-insensitive substring match over id, type, location and method.
    /// `needle` must already be lowercased.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        self.id.to_string().contains(needle)
            || [&self.kind, &self.location, &self.method]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Next id for a collection: one past the largest id, counting from 0, so an
/// empty or all-negative collection starts at 1. `None` once `IncidentId::MAX`
/// is taken.
pub fn next_id(incidents: &[Incident]) -> Option<IncidentId> {
    incidents
        .iter()
        .map(|i| i.id)
        .fold(0, IncidentId::max)
        .checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kind_as_type_and_status_lowercase() {
        let incident = Incident {
            id: 7,
            kind: "Fire".into(),
            location: "Dock 4".into(),
            method: "Sensor".into(),
            time: "t1".into(),
            status: Status::Resolved,
        };
        let json = serde_json::to_value(&incident).expect("json");
        assert_eq!(json["type"], "Fire");
        assert_eq!(json["status"], "resolved");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn missing_fields_load_with_defaults() {
        let incident: Incident = serde_json::from_str(r#"{"id":3,"type":"Smoke"}"#).expect("parse");
        assert_eq!(incident.id, 3);
        assert_eq!(incident.kind, "Smoke");
        assert_eq!(incident.location, "");
        assert_eq!(incident.status, Status::Investigating);
    }

    #[test]
    fn parses_status_filter_values() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "resolved".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(Status::Resolved))
        );
        let err = "closed".parse::<StatusFilter>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status 'closed'");
    }

    #[test]
    fn next_id_is_one_past_max() {
        assert_eq!(next_id(&[]), Some(1));
        let list = vec![
            Incident { id: 4, ..Default::default() },
            Incident { id: 9, ..Default::default() },
            Incident { id: 2, ..Default::default() },
        ];
        assert_eq!(next_id(&list), Some(10));
    }

    #[test]
    fn next_id_ignores_negative_ids() {
        let list = vec![Incident { id: -5, ..Default::default() }];
        assert_eq!(next_id(&list), Some(1));
    }

    #[test]
    fn next_id_is_none_at_max() {
        let list = vec![Incident { id: IncidentId::MAX, ..Default::default() }];
        assert_eq!(next_id(&list), None);
    }

    #[test]
    fn negative_ids_deserialize() {
        let list: Vec<Incident> =
            serde_json::from_str(r#"[{"id":-1,"type":"Fire"},{"id":2,"type":"Flood"}]"#).expect("parse");
        assert_eq!(list.iter().map(|i| i.id).collect::<Vec<_>>(), vec![-1, 2]);
    }

    #[test]
    fn status_deserializes_case_insensitively() {
        let incident: Incident =
            serde_json::from_str(r#"{"id":1,"status":"Resolved"}"#).expect("parse");
        assert_eq!(incident.status, Status::Resolved);

        let err = serde_json::from_str::<Incident>(r#"{"id":1,"status":"open"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown status 'open'"), "{err}");
    }
}
