//! Market Event Types
//!
//! Every state change in the labor market (hire, layoff, quit, switch,
//! retirement, entry) is described by one `MarketEvent`. Events are
//! serialized one per line into a JSONL log.

use serde::{Deserialize, Serialize};

use crate::RoundStamp;

/// What happened, with the ids and values needed to replay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A candidate accepted a firm's offer
    Hired {
        firm_id: u32,
        worker_id: u32,
        wage_offer: f64,
    },
    /// A candidate rejected the offer and the firm raised it
    OfferRaised {
        firm_id: u32,
        rejected_by: u32,
        previous_offer: f64,
        new_offer: f64,
    },
    /// Profit collapse layoff
    LaidOff {
        firm_id: u32,
        worker_id: u32,
        productivity: f64,
    },
    /// Reservation wage rose above the employer's offer
    Quit {
        firm_id: u32,
        worker_id: u32,
        reservation_wage: f64,
        wage_offer: f64,
    },
    /// Moved to a firm with a strictly higher offer
    Switched {
        worker_id: u32,
        from_firm: u32,
        to_firm: u32,
    },
    Retired {
        worker_id: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        firm_id: Option<u32>,
        years_experience: f64,
    },
    /// A replacement worker joined the labor force
    Entered {
        worker_id: u32,
        education: String,
        reservation_wage: f64,
    },
}

impl EventKind {
    /// Short snake_case label, matching the serialized `type` tag.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Hired { .. } => "hired",
            EventKind::OfferRaised { .. } => "offer_raised",
            EventKind::LaidOff { .. } => "laid_off",
            EventKind::Quit { .. } => "quit",
            EventKind::Switched { .. } => "switched",
            EventKind::Retired { .. } => "retired",
            EventKind::Entered { .. } => "entered",
        }
    }

    /// Returns the worker this event is about.
    pub fn worker_id(&self) -> u32 {
        match self {
            EventKind::Hired { worker_id, .. }
            | EventKind::LaidOff { worker_id, .. }
            | EventKind::Quit { worker_id, .. }
            | EventKind::Switched { worker_id, .. }
            | EventKind::Retired { worker_id, .. }
            | EventKind::Entered { worker_id, .. } => *worker_id,
            EventKind::OfferRaised { rejected_by, .. } => *rejected_by,
        }
    }

    /// Returns true if the event touches the given firm.
    pub fn involves_firm(&self, firm: u32) -> bool {
        match self {
            EventKind::Hired { firm_id, .. }
            | EventKind::OfferRaised { firm_id, .. }
            | EventKind::LaidOff { firm_id, .. }
            | EventKind::Quit { firm_id, .. } => *firm_id == firm,
            EventKind::Switched {
                from_firm, to_firm, ..
            } => *from_firm == firm || *to_firm == firm,
            EventKind::Retired { firm_id, .. } => *firm_id == Some(firm),
            EventKind::Entered { .. } => false,
        }
    }
}

/// A single logged market event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub event_id: String,
    pub timestamp: RoundStamp,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl MarketEvent {
    pub fn new(event_id: impl Into<String>, timestamp: RoundStamp, kind: EventKind) -> Self {
        Self {
            event_id: event_id.into(),
            timestamp,
            kind,
        }
    }

    /// Serializes the event to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses an event from a JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID from a sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
