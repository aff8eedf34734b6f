//! The analyze pipeline: bulk parsing, aggregation, submission, rendering.
//!
//! [`Workbench`] is the controlling component of a session. It owns the
//! local task store and the results view, and runs the analyze action.
//! Every submission takes a sequence number; a response is rendered only if
//! no newer submission has been issued since, so a slow earlier response can
//! never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::bulk::parse_bulk;
use crate::context::ServiceContext;
use crate::error::AnalyzeError;
use crate::ports::prioritizer::Suggestion;
use crate::render::ResultsView;
use crate::store::LocalTaskStore;
use crate::task::{Task, TaskForm, TaskRecord};

/// Merges bulk records and local tasks into one batch, bulk first.
///
/// Each source keeps its own order. Duplicate ids are passed through.
#[must_use]
pub fn aggregate(bulk: Vec<Value>, local: &[Task]) -> Vec<TaskRecord> {
    bulk.into_iter()
        .map(TaskRecord::Bulk)
        .chain(local.iter().cloned().map(TaskRecord::Local))
        .collect()
}

/// Hands out increasing submission numbers and remembers the latest.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Issues the next sequence number. The first is 1.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `seq` is the most recently issued number.
    #[must_use]
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// The most recently issued number, 0 if none.
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// What became of a successful analyze response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// The view now shows this response.
    Rendered {
        /// Sequence number of the submission.
        seq: u64,
        /// Number of blocks rendered.
        count: usize,
    },
    /// A newer submission was issued while this one was in flight; the
    /// response was dropped and the view left untouched.
    Stale {
        /// Sequence number of the dropped submission.
        seq: u64,
        /// Sequence number that was current when it arrived.
        latest: u64,
    },
}

/// Session controller owning the local store and the results view.
pub struct Workbench<'a> {
    ctx: &'a ServiceContext,
    store: LocalTaskStore,
    sequencer: RequestSequencer,
    view: Mutex<ResultsView>,
}

impl<'a> Workbench<'a> {
    /// Creates a workbench with an empty store and view.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            store: LocalTaskStore::new(),
            sequencer: RequestSequencer::default(),
            view: Mutex::new(ResultsView::new()),
        }
    }

    /// Submits the form: coerces it into a task with a fresh local id and
    /// appends it to the store.
    pub fn add_task(&mut self, form: &TaskForm) -> &Task {
        let id = self.ctx.id_gen.generate_id();
        self.store.add(Task::from_form(form, id))
    }

    /// The local store.
    #[must_use]
    pub fn store(&self) -> &LocalTaskStore {
        &self.store
    }

    /// The current results view.
    pub fn view(&self) -> MutexGuard<'_, ResultsView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parses the bulk text and merges it with the local store.
    ///
    /// # Errors
    ///
    /// Returns the bulk parser's errors, or [`AnalyzeError::NoInput`] when
    /// the merged batch is empty.
    pub fn prepare_batch(&self, bulk_text: &str) -> Result<Vec<TaskRecord>, AnalyzeError> {
        let bulk = parse_bulk(bulk_text)?;
        let batch = aggregate(bulk, self.store.tasks());
        if batch.is_empty() {
            return Err(AnalyzeError::NoInput);
        }
        Ok(batch)
    }

    /// Runs the analyze action.
    ///
    /// On success the view is replaced by the ranking, unless a newer
    /// analyze was issued meanwhile. On error the view is untouched. A
    /// superseded request yields [`AnalyzeOutcome::Stale`] whether it
    /// succeeded or failed.
    ///
    /// # Errors
    ///
    /// Returns any [`AnalyzeError`]; parse and empty-batch errors are raised
    /// before any network activity.
    pub async fn analyze(
        &self,
        bulk_text: &str,
        strategy: &str,
    ) -> Result<AnalyzeOutcome, AnalyzeError> {
        let batch = self.prepare_batch(bulk_text)?;
        let seq = self.sequencer.issue();
        tracing::debug!(seq, strategy, count = batch.len(), "analyze submitted");

        let result = self.ctx.prioritizer.analyze(&batch, strategy).await;

        let mut view = self.view();
        if !self.sequencer.is_latest(seq) {
            let latest = self.sequencer.latest();
            match &result {
                Ok(_) => tracing::warn!(seq, latest, "discarding stale analyze response"),
                Err(err) => tracing::warn!(seq, latest, %err, "discarding stale analyze error"),
            }
            return Ok(AnalyzeOutcome::Stale { seq, latest });
        }
        view.replace(&result?);
        Ok(AnalyzeOutcome::Rendered { seq, count: view.blocks().len() })
    }

    /// Asks the service for its top suggestions for the merged batch.
    ///
    /// Does not touch the results view.
    ///
    /// # Errors
    ///
    /// Same as [`Workbench::analyze`].
    pub async fn suggest(
        &self,
        bulk_text: &str,
        strategy: &str,
    ) -> Result<Vec<Suggestion>, AnalyzeError> {
        let batch = self.prepare_batch(bulk_text)?;
        tracing::debug!(strategy, count = batch.len(), "suggest submitted");
        self.ctx.prioritizer.suggest(&batch, strategy).await
    }
}
