//! Market Events
//!
//! Phases push a `MarketEvent` for every hire, layoff, quit, switch,
//! retirement and entry into `RoundEvents`. The driver drains them once per
//! round into the JSONL logger and the run statistics.

pub mod logger;

use bevy_ecs::prelude::*;
use labor_events::{generate_event_id, EventKind, MarketEvent, RoundStamp};

pub use logger::EventLogger;

/// Resource: events produced during the current round
#[derive(Resource, Debug)]
pub struct RoundEvents {
    stamp: RoundStamp,
    next_sequence: u64,
    events: Vec<MarketEvent>,
}

impl Default for RoundEvents {
    fn default() -> Self {
        Self {
            stamp: RoundStamp::from_round(0),
            next_sequence: 1,
            events: Vec::new(),
        }
    }
}

impl RoundEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps subsequent events with the given round
    pub fn begin_round(&mut self, round: u64) {
        self.stamp = RoundStamp::from_round(round);
    }

    pub fn stamp(&self) -> RoundStamp {
        self.stamp
    }

    pub fn push(&mut self, kind: EventKind) {
        let event_id = generate_event_id(self.next_sequence);
        self.next_sequence += 1;
        self.events.push(MarketEvent::new(event_id, self.stamp, kind));
    }

    pub fn drain(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events with the given label
    pub fn count(&self, label: &str) -> usize {
        self.events.iter().filter(|e| e.kind.label() == label).count()
    }
}
