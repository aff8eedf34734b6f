//! `taskrank analyze` command.

use std::io::Write;

use super::{read_bulk, write_err};
use crate::cli::BatchArgs;
use crate::context::ServiceContext;
use crate::pipeline::{AnalyzeOutcome, Workbench};
use crate::task::TaskForm;

/// Execute the `analyze` command.
///
/// Adds every `--task` to a fresh local store, merges it after the bulk
/// input, submits the batch and prints the ranking.
///
/// # Errors
///
/// Returns the user-facing message of whatever aborted the pipeline.
pub async fn run(
    ctx: &ServiceContext,
    args: &BatchArgs,
    out: &mut impl Write,
) -> Result<(), String> {
    let mut bench = Workbench::new(ctx);
    for line in &args.tasks {
        bench.add_task(&TaskForm::parse_line(line)?);
    }
    let bulk = read_bulk(args.bulk.as_deref())?;

    match bench.analyze(&bulk, &args.strategy).await.map_err(|e| e.to_string())? {
        AnalyzeOutcome::Rendered { count: 0, .. } => {
            writeln!(out, "The service returned no ranked tasks.").map_err(write_err)
        }
        AnalyzeOutcome::Rendered { .. } => bench.view().write_to(out).map_err(write_err),
        AnalyzeOutcome::Stale { seq, latest } => {
            Err(format!("Analyze #{seq} was superseded by #{latest}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn args(tasks: &[&str], bulk: Option<std::path::PathBuf>) -> BatchArgs {
        BatchArgs {
            bulk,
            tasks: tasks.iter().map(ToString::to_string).collect(),
            strategy: "deadline".into(),
        }
    }

    #[tokio::test]
    async fn prints_ranked_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze/")
            .match_query(Matcher::UrlEncoded("strategy".into(), "deadline".into()))
            .match_body(Matcher::PartialJson(json!([{"title": "Write report", "importance": 8}])))
            .with_status(200)
            .with_body(
                json!({
                    "sorted_tasks": [{
                        "title": "Write report",
                        "score": 72,
                        "explanation": "important",
                        "task": {"title": "Write report"}
                    }],
                    "cycles": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ctx = ServiceContext::live(&server.url());
        let mut out = Vec::new();
        run(&ctx, &args(&["Write report;hours=2;importance=8"], None), &mut out).await.unwrap();

        mock.assert_async().await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[HIGH]   Write report  (score: 72)"));
        assert!(text.contains("important"));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let ctx = ServiceContext::live(&server.url());
        let mut out = Vec::new();
        let err = run(&ctx, &args(&[], None), &mut out).await.unwrap_err();

        assert_eq!(err, "No tasks to analyze");
        assert!(out.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn service_error_renders_nothing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"detail":"strategy invalid"}"#)
            .create_async()
            .await;

        let ctx = ServiceContext::live(&server.url());
        let mut out = Vec::new();
        let err = run(&ctx, &args(&["X"], None), &mut out).await.unwrap_err();

        assert!(err.contains("strategy invalid"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_task_form_is_rejected() {
        let ctx = ServiceContext::live("http://127.0.0.1:1/");
        let mut out = Vec::new();
        let err = run(&ctx, &args(&["hours=2"], None), &mut out).await.unwrap_err();
        assert!(err.contains("title is required"));
    }
}
