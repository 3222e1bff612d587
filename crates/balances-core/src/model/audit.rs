//! Audit columns shared by every persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who created, last touched and soft-deleted a record, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub created: DateTime<Utc>,
    pub created_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<Uuid>,
}

impl Audit {
    pub fn new(actor: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            created: now,
            created_by: actor,
            updated: None,
            updated_by: None,
            deleted: None,
            deleted_by: None,
        }
    }

    pub fn touch(&mut self, actor: Uuid, now: DateTime<Utc>) {
        self.updated = Some(now);
        self.updated_by = Some(actor);
    }

    pub fn mark_deleted(&mut self, actor: Uuid, now: DateTime<Utc>) {
        self.deleted = Some(now);
        self.deleted_by = Some(actor);
    }

    /// Either half of the deletion stamp counts.
    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some() || self.deleted_by.is_some()
    }
}
