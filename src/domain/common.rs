//! Capability contract for entities stored through the document gateway.

use chrono::{DateTime, Utc};

/// Timestamp capability required of any storable entity.
///
/// The gateway stamps both fields on create and the last-updated field on
/// every overwrite; entities never manage these timestamps themselves.
pub trait CommonModel {
    fn set_created_time(&mut self, at: DateTime<Utc>);
    fn set_last_updated(&mut self, at: DateTime<Utc>);
}
