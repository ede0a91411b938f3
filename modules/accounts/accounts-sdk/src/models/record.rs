use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Returned when an identifier is assigned to a record that already has one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record already has id {existing}")]
pub struct IdAlreadyAssigned {
    pub existing: Uuid,
}

/// Fields and lifecycle shared by every persisted record.
///
/// Concrete records embed an envelope by value and expose it through
/// [`Record`]. The soft-delete flag is derived from `deleted_at`, so a record
/// can never be flagged deleted without a deletion timestamp.
#[derive(Debug, Clone)]
pub struct RecordEnvelope {
    /// Unset until the record is first persisted, fixed afterwards.
    id: Option<Uuid>,
    pub tenant_id: String,
    pub deleted_at: Option<OffsetDateTime>,
    pub deleted_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    /// Optimistic-lock counter; a write holding a stale value must be rejected
    /// by the persistence layer.
    pub version: i64,
    /// Opaque serialized side-channel, never interpreted here.
    pub metadata: Option<String>,
}

impl RecordEnvelope {
    #[must_use]
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self::new_at(tenant_id, OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn new_at(tenant_id: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            id: None,
            tenant_id: tenant_id.into(),
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
            created_by: None,
            last_modified_by: None,
            version: 0,
            metadata: None,
        }
    }

    /// Envelope of a record loaded from storage.
    #[must_use]
    pub fn persisted(id: Uuid, tenant_id: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            id: Some(id),
            ..Self::new_at(tenant_id, created_at)
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Sets the identifier handed out by storage on first insert.
    ///
    /// # Errors
    /// Returns [`IdAlreadyAssigned`] if the record already has a different id.
    pub fn assign_id(&mut self, id: Uuid) -> Result<(), IdAlreadyAssigned> {
        match self.id {
            Some(existing) if existing != id => Err(IdAlreadyAssigned { existing }),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// True if a non-blank tenant has been assigned.
    #[must_use]
    pub fn has_tenant(&self) -> bool {
        !self.tenant_id.trim().is_empty()
    }

    pub fn mark_as_deleted(&mut self, actor: &str) {
        self.mark_as_deleted_at(actor, OffsetDateTime::now_utc());
    }

    /// Soft-deletes the record. Calling it again only refreshes the timestamp
    /// and the actor.
    pub fn mark_as_deleted_at(&mut self, actor: &str, now: OffsetDateTime) {
        self.deleted_at = Some(now);
        self.deleted_by = Some(actor.to_owned());
        self.touch(actor, now);
    }

    pub fn restore(&mut self, actor: &str) {
        self.restore_at(actor, OffsetDateTime::now_utc());
    }

    pub fn restore_at(&mut self, actor: &str, now: OffsetDateTime) {
        self.deleted_at = None;
        self.deleted_by = None;
        self.touch(actor, now);
    }

    /// Records a modification by `actor`. `updated_at` never moves backwards.
    pub fn touch(&mut self, actor: &str, now: OffsetDateTime) {
        self.touch_at(now);
        self.last_modified_by = Some(actor.to_owned());
    }

    pub(crate) fn touch_at(&mut self, now: OffsetDateTime) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Records are equal only when both carry an identifier and the identifiers
/// match. A record without an identifier is only equal to itself.
impl PartialEq for RecordEnvelope {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Eq for RecordEnvelope {}

/// Capability shared by every persisted record type.
pub trait Record {
    /// Short name used in diagnostics, e.g. `"user"`.
    fn record_kind(&self) -> &'static str;

    fn envelope(&self) -> &RecordEnvelope;

    fn envelope_mut(&mut self) -> &mut RecordEnvelope;

    fn is_new(&self) -> bool {
        self.envelope().is_new()
    }

    fn tenant_id(&self) -> &str {
        &self.envelope().tenant_id
    }

    fn is_deleted(&self) -> bool {
        self.envelope().is_deleted()
    }
}

impl Record for RecordEnvelope {
    fn record_kind(&self) -> &'static str {
        "record"
    }

    fn envelope(&self) -> &RecordEnvelope {
        self
    }

    fn envelope_mut(&mut self) -> &mut RecordEnvelope {
        self
    }
}
