//! Replaying adapter for the Clock port.

use chrono::{DateTime, Utc};

use super::{next_output, SharedReplayer};
use crate::ports::clock::Clock;

/// Replays recorded clock readings.
///
/// Once the cassette runs out of readings, or holds one that does not
/// parse, the wall clock is used instead.
pub struct ReplayingClock {
    replayer: SharedReplayer,
}

impl ReplayingClock {
    /// Creates a replaying clock backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let recorded = next_output(&self.replayer, "clock", "now").and_then(|output| {
            serde_json::from_value(output).map_err(|e| format!("bad clock reading: {e}"))
        });
        recorded.unwrap_or_else(|reason| {
            tracing::warn!(%reason, "falling back to the wall clock");
            Utc::now()
        })
    }
}
