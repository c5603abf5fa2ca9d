//! Structured analytics events and best-effort sinks.
//!
//! Recording an event never blocks and never fails the request that
//! produced it. [`ChannelSink`] hands events to a consumer thread through a
//! bounded channel and drops them when the channel is full or closed;
//! [`MemorySink`] keeps them for tests and offline export.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cf_core::{Grade, MaterialId, PlayerId, SpeciesId};

use crate::ports::AnalyticsSink;
use crate::synthesis::MergeType;

/// One analytics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A single egg draw.
    Hatched {
        /// Who hatched.
        player: PlayerId,
        /// Pool key.
        pool: String,
        /// Species awarded.
        species: SpeciesId,
        /// Grade of the awarded species.
        grade: Grade,
        /// Grade the sampler produced before pity.
        natural_grade: Grade,
        /// Whether pity raised the grade.
        forced: bool,
        /// Pity count at the time of the draw.
        pity_count: u32,
        /// When the draw happened.
        timestamp: DateTime<Utc>,
    },
    /// A completed synthesis.
    Synthesized {
        /// Who merged.
        player: PlayerId,
        /// Species of the two inputs.
        inputs: [SpeciesId; 2],
        /// Material consumed, if any.
        material: Option<MaterialId>,
        /// Path the merge took.
        merge_type: MergeType,
        /// Species produced.
        result: SpeciesId,
        /// Whether the mutation sub-roll replaced the result.
        is_mutation: bool,
        /// Whether the great-success sub-roll hit.
        is_great_success: bool,
        /// When the merge committed.
        timestamp: DateTime<Utc>,
    },
    /// A synthesis that failed after reserving its material.
    SynthesisRolledBack {
        /// Who merged.
        player: PlayerId,
        /// Material that was reserved.
        material: Option<MaterialId>,
        /// Error code of the failure.
        reason: String,
        /// Whether the material refund succeeded.
        refunded: bool,
        /// When the rollback happened.
        timestamp: DateTime<Utc>,
    },
}

impl AnalyticsEvent {
    /// The player the event concerns.
    pub fn player(&self) -> PlayerId {
        match self {
            Self::Hatched { player, .. }
            | Self::Synthesized { player, .. }
            | Self::SynthesisRolledBack { player, .. } => *player,
        }
    }
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn record(&self, _event: AnalyticsEvent) {}
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export as JSON lines, one event per line.
    pub fn export_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in self.events() {
            out.push_str(&serde_json::to_string(&event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl AnalyticsSink for MemorySink {
    fn record(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

/// Forwards events through a bounded channel without waiting.
#[derive(Debug)]
pub struct ChannelSink {
    sender: SyncSender<AnalyticsEvent>,
}

impl ChannelSink {
    /// A sink plus the receiving end for a consumer thread.
    pub fn bounded(capacity: usize) -> (Self, Receiver<AnalyticsEvent>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender }, receiver)
    }
}

impl AnalyticsSink for ChannelSink {
    fn record(&self, event: AnalyticsEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!(player = %event.player(), "analytics queue full, event dropped");
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::debug!(player = %event.player(), "analytics consumer gone, event dropped");
            }
        }
    }
}
