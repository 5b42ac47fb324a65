//! Controller for an editable, searchable list of incident records that is
//! mirrored to a persistent key/value slot.

pub mod clock;
pub mod config;
pub mod draft;
pub mod filter;
pub mod model;
pub mod storage;
pub mod table;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{ConfigError, TableConfig};
pub use draft::{validate_edit, validate_new, Field, IncidentDraft, ValidationErrors};
pub use filter::filter_incidents;
pub use model::{next_id, Incident, IncidentId, ParseStatusError, Status, StatusFilter};
pub use storage::{
    load_incidents, save_incidents, MemoryStorage, StorageError, StorageResult, StorageSlot,
};
pub use table::{ChangeHandler, Confirm, CreateError, IncidentTable, RowMode};
