//! Prioritization service port.
//!
//! The service owns scoring, strategy semantics and dependency handling.
//! This side only ships a batch and a strategy name, then decodes what comes
//! back. Decoding is lenient per item: a ranked entry with missing or oddly
//! typed fields still decodes, with those fields left empty.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AnalyzeError;
use crate::task::TaskRecord;

/// Boxed future type alias used by [`Prioritizer`] to keep the trait dyn-compatible.
pub type PrioritizerFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, AnalyzeError>> + Send + 'a>>;

/// One ranked entry returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Id of the ranked task, as echoed by the service.
    #[serde(default)]
    pub id: Option<String>,
    /// Title of the ranked task, as echoed by the service.
    #[serde(default)]
    pub title: Option<String>,
    /// Priority score; roughly 0 to 100+.
    #[serde(default)]
    pub score: Option<f64>,
    /// Why the score was assigned.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Whether the task sits on a dependency cycle.
    #[serde(default)]
    pub circular_dependency: bool,
    /// The task record as the service saw it.
    #[serde(default)]
    pub task: Value,
}

impl RankedItem {
    /// Decodes one entry of `sorted_tasks`, ignoring fields of the wrong type.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        Self {
            id: text("id"),
            title: text("title"),
            score: value.get("score").and_then(Value::as_f64),
            explanation: text("explanation"),
            circular_dependency: value
                .get("circular_dependency")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            task: value.get("task").cloned().unwrap_or(Value::Null),
        }
    }

    /// Title to show: the echoed title, else the title inside `task`.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or_else(|| self.task.get("title").and_then(Value::as_str))
    }
}

/// A decoded analyze response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Ranked entries in the service's order.
    pub items: Vec<RankedItem>,
    /// Dependency cycles the service detected, as lists of task ids.
    #[serde(default)]
    pub cycles: Vec<Vec<String>>,
}

impl Ranking {
    /// Decodes a successful analyze response body.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Transport`] if `sorted_tasks` is missing or
    /// is not an array.
    pub fn from_response(body: &Value) -> Result<Self, AnalyzeError> {
        let items = body
            .get("sorted_tasks")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AnalyzeError::transport("malformed response body: missing sorted_tasks")
            })?
            .iter()
            .map(RankedItem::from_value)
            .collect();
        Ok(Self { items, cycles: decode_cycles(body) })
    }
}

fn decode_cycles(body: &Value) -> Vec<Vec<String>> {
    let Some(cycles) = body.get("cycles").and_then(Value::as_array) else {
        return Vec::new();
    };
    cycles
        .iter()
        .filter_map(Value::as_array)
        .map(|cycle| cycle.iter().filter_map(Value::as_str).map(String::from).collect())
        .collect()
}

/// One entry of a suggest response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Id of the suggested task.
    #[serde(default)]
    pub id: Option<String>,
    /// Title of the suggested task.
    #[serde(default)]
    pub title: Option<String>,
    /// Priority score.
    #[serde(default)]
    pub score: Option<f64>,
    /// Why this task was suggested.
    #[serde(default)]
    pub why: Option<String>,
}

impl Suggestion {
    /// Decodes a successful suggest response body.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Transport`] if `suggestions` is missing or
    /// is not an array.
    pub fn list_from_response(body: &Value) -> Result<Vec<Self>, AnalyzeError> {
        let entries = body
            .get("suggestions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AnalyzeError::transport("malformed response body: missing suggestions")
            })?;
        Ok(entries
            .iter()
            .map(|entry| {
                let text = |key: &str| entry.get(key).and_then(Value::as_str).map(String::from);
                Self {
                    id: text("id"),
                    title: text("title"),
                    score: entry.get("score").and_then(Value::as_f64),
                    why: text("why"),
                }
            })
            .collect())
    }
}

/// Ranks task batches using a named strategy.
pub trait Prioritizer: Send + Sync {
    /// Submits a batch for full ranking.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Service`] when the service rejects the batch
    /// and [`AnalyzeError::Transport`] when no usable response arrives.
    fn analyze<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Ranking>;

    /// Asks for the top few tasks of a batch.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Prioritizer::analyze`].
    fn suggest<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Vec<Suggestion>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_response() {
        let body = json!({
            "sorted_tasks": [{
                "id": "t1",
                "title": "A",
                "score": 81.5,
                "explanation": "due soon",
                "circular_dependency": true,
                "task": {"id": "t1", "title": "A"}
            }],
            "cycles": [["t1", "t2", "t1"]]
        });
        let ranking = Ranking::from_response(&body).unwrap();
        assert_eq!(ranking.items.len(), 1);
        let item = &ranking.items[0];
        assert_eq!(item.id.as_deref(), Some("t1"));
        assert_eq!(item.score, Some(81.5));
        assert!(item.circular_dependency);
        assert_eq!(ranking.cycles, vec![vec!["t1", "t2", "t1"]]);
    }

    #[test]
    fn malformed_items_decode_blank() {
        let body = json!({"sorted_tasks": [{"score": "high"}, 7]});
        let ranking = Ranking::from_response(&body).unwrap();
        assert_eq!(ranking.items, vec![RankedItem::default(), RankedItem::default()]);
        assert!(ranking.cycles.is_empty());
    }

    #[test]
    fn missing_sorted_tasks_is_transport_error() {
        let err = Ranking::from_response(&json!({"results": []})).unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport { .. }));
    }

    #[test]
    fn display_title_falls_back_to_task() {
        let item = RankedItem::from_value(&json!({"task": {"title": "inner"}}));
        assert_eq!(item.display_title(), Some("inner"));
    }

    #[test]
    fn decodes_suggestions() {
        let body = json!({
            "suggestions": [{"id": "t2", "title": "B", "score": 90, "why": "blocks others"}],
            "cycles": []
        });
        let suggestions = Suggestion::list_from_response(&body).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].why.as_deref(), Some("blocks others"));
        assert_eq!(suggestions[0].score, Some(90.0));
    }
}
