//! Live adapter for the `Prioritizer` port over HTTP.

use reqwest::Client;
use serde_json::Value;

use crate::error::AnalyzeError;
use crate::ports::prioritizer::{Prioritizer, PrioritizerFuture, Ranking, Suggestion};
use crate::task::TaskRecord;

const ANALYZE_PATH: &str = "analyze/";
const SUGGEST_PATH: &str = "suggest/";

/// Talks to the prioritization service's REST endpoints.
///
/// Each call is a single POST with no retry and no client-side timeout.
pub struct HttpPrioritizer {
    client: Client,
    base_url: String,
}

impl HttpPrioritizer {
    /// Creates a client for the service rooted at `base_url`
    /// (e.g. `http://127.0.0.1:8000/api/tasks/`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into() }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    /// POSTs the batch and returns the parsed body of a success response.
    async fn post(
        &self,
        path: &str,
        tasks: &[TaskRecord],
        strategy: &str,
    ) -> Result<Value, AnalyzeError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, strategy, count = tasks.len(), "submitting batch");

        let response = self
            .client
            .post(&url)
            .query(&[("strategy", strategy)])
            .json(tasks)
            .send()
            .await
            .map_err(AnalyzeError::transport)?;

        let status = response.status();
        let text = response.text().await.map_err(AnalyzeError::transport)?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            AnalyzeError::transport(format!("malformed response body (status {status}): {e}"))
        })?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "service rejected batch");
            return Err(AnalyzeError::Service { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

impl Prioritizer for HttpPrioritizer {
    fn analyze<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Ranking> {
        Box::pin(async move {
            let body = self.post(ANALYZE_PATH, tasks, strategy).await?;
            Ranking::from_response(&body)
        })
    }

    fn suggest<'a>(
        &'a self,
        tasks: &'a [TaskRecord],
        strategy: &'a str,
    ) -> PrioritizerFuture<'a, Vec<Suggestion>> {
        Box::pin(async move {
            let body = self.post(SUGGEST_PATH, tasks, strategy).await?;
            Suggestion::list_from_response(&body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn bulk(value: Value) -> Vec<TaskRecord> {
        vec![TaskRecord::Bulk(value)]
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let with_slash = HttpPrioritizer::new("http://host/api/tasks/");
        let without = HttpPrioritizer::new("http://host/api/tasks");
        assert_eq!(with_slash.endpoint(ANALYZE_PATH), "http://host/api/tasks/analyze/");
        assert_eq!(without.endpoint(ANALYZE_PATH), "http://host/api/tasks/analyze/");
    }

    #[tokio::test]
    async fn posts_batch_with_encoded_strategy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze/")
            .match_query(Matcher::UrlEncoded("strategy".into(), "fast wins&more".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!([{"title": "X"}])))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sorted_tasks":[{"title":"X","score":42,"explanation":"ok","task":{"title":"X"}}],"cycles":[]}"#)
            .create_async()
            .await;

        let client = HttpPrioritizer::new(server.url());
        let ranking = client.analyze(&bulk(json!({"title": "X"})), "fast wins&more").await.unwrap();

        mock.assert_async().await;
        assert_eq!(ranking.items.len(), 1);
        assert_eq!(ranking.items[0].score, Some(42.0));
    }

    #[tokio::test]
    async fn failure_status_carries_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"detail":"strategy invalid"}"#)
            .create_async()
            .await;

        let client = HttpPrioritizer::new(server.url());
        let err = client.analyze(&bulk(json!({"title": "X"})), "bogus").await.unwrap_err();

        assert_eq!(
            err,
            AnalyzeError::Service { status: 400, body: json!({"detail": "strategy invalid"}) }
        );
        assert!(err.to_string().contains("strategy invalid"));
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("<html>Server Error</html>")
            .create_async()
            .await;

        let client = HttpPrioritizer::new(server.url());
        let err = client.analyze(&bulk(json!({"title": "X"})), "deadline").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let client = HttpPrioritizer::new("http://127.0.0.1:1/api/tasks/");
        let err = client.analyze(&bulk(json!({"title": "X"})), "deadline").await.unwrap_err();
        assert!(err.to_string().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn suggest_uses_suggest_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/suggest/")
            .match_query(Matcher::UrlEncoded("strategy".into(), "smart_balance".into()))
            .with_status(200)
            .with_body(r#"{"suggestions":[{"id":"t1","title":"A","score":77.1,"why":"quick win"}],"cycles":[]}"#)
            .create_async()
            .await;

        let client = HttpPrioritizer::new(server.url());
        let tasks = bulk(json!({"id": "t1", "title": "A"}));
        let suggestions = client.suggest(&tasks, "smart_balance").await.unwrap();

        mock.assert_async().await;
        assert_eq!(suggestions[0].title.as_deref(), Some("A"));
    }
}
