// Push intent and concurrency guard.
//
// Purpose
// - Carry the events one command attempt wants to atomically append, together
//   with its precondition on the aggregate's persisted sequence.

use crate::core::eventstore::aggregate::AggregateRef;
use crate::core::eventstore::event::ProposedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyGuard {
    /// No precondition; append regardless of the persisted sequence.
    Ignore,
    /// The persisted sequence must be at least this value at commit time.
    /// Tolerates unrelated appends between load and push.
    SequenceAtLeast(u64),
    /// The persisted sequence must equal this value at commit time.
    SequenceMatches(u64),
}

impl ConcurrencyGuard {
    pub fn holds(&self, persisted_sequence: u64) -> bool {
        match self {
            ConcurrencyGuard::Ignore => true,
            ConcurrencyGuard::SequenceAtLeast(bound) => persisted_sequence >= *bound,
            ConcurrencyGuard::SequenceMatches(expected) => persisted_sequence == *expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushIntent {
    pub aggregate: AggregateRef,
    pub editor: String,
    pub events: Vec<ProposedEvent>,
    pub guard: ConcurrencyGuard,
}

impl PushIntent {
    pub fn new(aggregate: AggregateRef, editor: impl Into<String>) -> Self {
        Self {
            aggregate,
            editor: editor.into(),
            events: Vec::new(),
            guard: ConcurrencyGuard::Ignore,
        }
    }

    pub fn with_guard(mut self, guard: ConcurrencyGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_event(mut self, event: ProposedEvent) -> Self {
        self.events.push(event);
        self
    }
}
