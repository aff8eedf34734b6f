//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod prioritizer;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::AnalyzeError;

pub use clock::ReplayingClock;
pub use prioritizer::ReplayingPrioritizer;

/// Shared handle to one cassette's replayer.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Take the recorded output of the next `port::method` call.
pub(crate) fn next_output(
    replayer: &SharedReplayer,
    port: &str,
    method: &str,
) -> Result<Value, String> {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).map(|interaction| interaction.output.clone())
}

/// Decode a recorded `{"Ok": ..}` / `{"Err": ..}` output.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T>(output: Value) -> Result<T, AnalyzeError>
where
    T: DeserializeOwned,
{
    let undecodable = |e: serde_json::Error| {
        AnalyzeError::transport(format!("unreadable cassette interaction: {e}"))
    };
    match output {
        Value::Object(mut map) => {
            if let Some(ok) = map.remove("Ok") {
                serde_json::from_value(ok).map_err(undecodable)
            } else if let Some(err) = map.remove("Err") {
                Err(serde_json::from_value(err).map_err(undecodable)?)
            } else {
                Err(AnalyzeError::transport("cassette interaction has neither Ok nor Err"))
            }
        }
        other => Err(AnalyzeError::transport(format!(
            "cassette interaction is not a result object: {other}"
        ))),
    }
}
