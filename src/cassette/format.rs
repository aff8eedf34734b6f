//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name (`"prioritizer"` or `"clock"`).
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments sent to the port.
    pub input: serde_json::Value,
    /// What the port returned, `{"Ok": ..}`/`{"Err": ..}` for fallible calls.
    pub output: serde_json::Value,
}

/// An ordered recording of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Base URL of the service the interactions were captured from.
    pub service_url: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}
