//! Recording adapter for the `Prioritizer` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::prioritizer::{Prioritizer, PrioritizerFuture, Ranking, Suggestion};
use crate::task::TaskRecord;

/// Arguments of one service call, as stored in the cassette.
#[derive(Serialize)]
struct CallInput<'a> {
    strategy: &'a str,
    tasks: &'a [TaskRecord],
}

/// Records service calls while delegating to an inner prioritizer.
pub struct RecordingPrioritizer {
    inner: Box<dyn Prioritizer>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingPrioritizer {
    /// Creates a recording prioritizer wrapping `inner`.
    pub fn new(inner: Box<dyn Prioritizer>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Prioritizer for RecordingPrioritizer {
    fn analyze<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Ranking> {
        Box::pin(async move {
            let result = self.inner.analyze(tasks, strategy).await;
            let input = CallInput { strategy, tasks };
            record_result(&self.recorder, "prioritizer", "analyze", &input, &result);
            result
        })
    }

    fn suggest<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Vec<Suggestion>> {
        Box::pin(async move {
            let result = self.inner.suggest(tasks, strategy).await;
            let input = CallInput { strategy, tasks };
            record_result(&self.recorder, "prioritizer", "suggest", &input, &result);
            result
        })
    }
}
