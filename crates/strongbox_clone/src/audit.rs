//! Audit records emitted by every duplicate call.
//!
//! The engine hands one [`AuditRecord`] per call to an [`AuditSink`]. It
//! never formats or stores them itself; that is up to the sink.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use strongbox_foundation::EntityId;
use tracing::info;

// =============================================================================
// Records
// =============================================================================

/// How a duplicate call ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Every copy was made.
    Completed,
    /// Some descendants were not copied.
    Partial,
    /// The actor lacked the privilege for the source's type.
    Denied,
    /// The source's type has no parameterless constructor.
    NoConstructor,
    /// Any other failure.
    Failed(String),
}

impl AuditOutcome {
    /// Returns true for [`Completed`](Self::Completed) and
    /// [`Partial`](Self::Partial).
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::Partial)
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Partial => write!(f, "partial"),
            Self::Denied => write!(f, "denied"),
            Self::NoConstructor => write!(f, "no-constructor"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One duplicate call, as seen by an auditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// Who asked, if anyone.
    pub actor: Option<EntityId>,
    /// The entity duplicated.
    pub source: EntityId,
    /// Top-level copies that survived the call.
    pub copies: Vec<EntityId>,
    /// Total entities created, descendants included.
    pub created: usize,
    /// How it ended.
    pub outcome: AuditOutcome,
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives audit records.
pub trait AuditSink {
    /// Accepts one record.
    fn record(&mut self, record: AuditRecord);
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&mut self, _record: AuditRecord) {}
}

/// Emits each record as an `info` event with target `strongbox::audit`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, record: AuditRecord) {
        info!(
            target: "strongbox::audit",
            actor = ?record.actor,
            source = %record.source,
            copies = ?record.copies,
            created = record.created,
            outcome = %record.outcome,
            "duplicate"
        );
    }
}

/// Keeps the most recent records in memory.
#[derive(Clone, Debug)]
pub struct MemoryAuditSink {
    records: VecDeque<AuditRecord>,
    max_size: usize,
}

impl MemoryAuditSink {
    /// Creates a sink holding at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
        }
    }

    /// Iterates records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &AuditRecord> {
        self.records.iter()
    }

    /// Returns the newest record.
    #[must_use]
    pub fn last(&self) -> Option<&AuditRecord> {
        self.records.back()
    }

    /// Returns the number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns every record.
    pub fn drain(&mut self) -> Vec<AuditRecord> {
        self.records.drain(..).collect()
    }
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&mut self, record: AuditRecord) {
        if self.max_size == 0 {
            return;
        }
        while self.records.len() >= self.max_size {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }
}
