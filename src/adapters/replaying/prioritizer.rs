//! Replaying adapter for the `Prioritizer` port.

use super::{next_output, replay_result, SharedReplayer};
use crate::error::AnalyzeError;
use crate::ports::prioritizer::{Prioritizer, PrioritizerFuture, Ranking, Suggestion};
use crate::task::TaskRecord;

/// Serves recorded service responses instead of calling the network.
///
/// Requests are matched by call order, not by content.
pub struct ReplayingPrioritizer {
    replayer: SharedReplayer,
}

impl ReplayingPrioritizer {
    /// Creates a replaying prioritizer backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl Prioritizer for ReplayingPrioritizer {
    fn analyze<'a>(
        &'a self,
        _tasks: &'a [TaskRecord],
        _strategy: &'a str,
    ) -> PrioritizerFuture<'a, Ranking> {
        let output = next_output(&self.replayer, "prioritizer", "analyze");
        Box::pin(async move {
            let output = output.map_err(AnalyzeError::transport)?;
            replay_result::<Ranking>(output)
        })
    }

    fn suggest<'a>(
        &'a self,
        _tasks: &'a [TaskRecord],
        _strategy: &'a str,
    ) -> PrioritizerFuture<'a, Vec<Suggestion>> {
        let output = next_output(&self.replayer, "prioritizer", "suggest");
        Box::pin(async move {
            let output = output.map_err(AnalyzeError::transport)?;
            replay_result::<Vec<Suggestion>>(output)
        })
    }
}
