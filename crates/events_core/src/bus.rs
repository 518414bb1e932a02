//! Simple in-proc dispatcher for announcements.
//!
//! Intentionally minimal: publishers append, the host drains once per frame.
//! Target/source scoping is carried on the envelope so consumers can filter
//! without a subscription registry.

use crate::events::{EntityRef, GameEvent};

/// One published announcement with optional target/source scoping.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub event: GameEvent,
    pub target: Option<EntityRef>,
    pub source: Option<EntityRef>,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Envelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an unscoped announcement.
    pub fn publish(&mut self, event: GameEvent) {
        self.queue.push(Envelope {
            event,
            target: None,
            source: None,
        });
    }

    /// Publish an announcement scoped to a target (and optionally a source).
    pub fn publish_to(&mut self, event: GameEvent, target: EntityRef, source: Option<EntityRef>) {
        self.queue.push(Envelope {
            event,
            target: Some(target),
            source,
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain all queued announcements.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.queue)
    }

    /// Announcements targeted at `target`, without draining.
    pub fn iter_for_target(&self, target: EntityRef) -> impl Iterator<Item = &Envelope> {
        self.queue.iter().filter(move |e| e.target == Some(target))
    }

    /// Announcements published by `source`, without draining.
    pub fn iter_from_source(&self, source: EntityRef) -> impl Iterator<Item = &Envelope> {
        self.queue.iter().filter(move |e| e.source == Some(source))
    }
}
