//! End-to-end pipeline tests against a mock service, plus a record-replay
//! round trip through [`ServiceContext`].
//!
//! 1. Run the analyze pipeline against a mock server and check the merged
//!    batch, the rendered view, and error handling.
//! 2. Record a session against the mock server.
//! 3. Replay the cassette with no server and assert identical outputs.

use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

use taskrank::cassette::session::RecordingSession;
use taskrank::context::ServiceContext;
use taskrank::error::AnalyzeError;
use taskrank::pipeline::{AnalyzeOutcome, Workbench};
use taskrank::render::Tier;
use taskrank::task::TaskForm;

fn ranking_body() -> String {
    json!({
        "sorted_tasks": [
            {"id": "t1", "title": "Fix login", "score": 85, "explanation": "Overdue", "circular_dependency": false, "task": {"id": "t1"}},
            {"title": "Write report", "score": 40.5, "explanation": "Due soon\nQuick win", "task": {}},
            {"id": "t3", "title": "Refactor", "score": 12, "explanation": "", "circular_dependency": true, "task": {}}
        ],
        "cycles": [["t3", "t4"]]
    })
    .to_string()
}

fn form(title: &str, hours: &str, importance: &str) -> TaskForm {
    TaskForm {
        title: title.into(),
        estimated_hours: Some(hours.into()),
        importance: Some(importance.into()),
        ..TaskForm::default()
    }
}

#[tokio::test]
async fn bulk_then_local_tasks_are_ranked_and_tiered() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze/")
        .match_query(Matcher::UrlEncoded("strategy".into(), "smart_balance".into()))
        .match_body(Matcher::PartialJson(json!([
            {"id": "t1", "title": "Fix login"},
            {"title": "Write report", "estimated_hours": 2.0, "importance": 8, "due_date": null}
        ])))
        .with_status(200)
        .with_body(ranking_body())
        .create_async()
        .await;

    let ctx = ServiceContext::live(&server.url());
    let mut bench = Workbench::new(&ctx);
    bench.add_task(&form("Write report", "2", "8"));

    let bulk = r#"[{"id":"t1","title":"Fix login"}]"#;
    let outcome = bench.analyze(bulk, "smart_balance").await.unwrap();
    mock.assert_async().await;
    assert!(matches!(outcome, AnalyzeOutcome::Rendered { count: 3, .. }));

    let view = bench.view();
    let tiers: Vec<Tier> = view.blocks().iter().map(|b| b.tier).collect();
    assert_eq!(tiers, vec![Tier::High, Tier::Medium, Tier::Low]);
    assert!(view.blocks()[2].circular_dependency);
    assert_eq!(view.cycles(), &[vec!["t3".to_string(), "t4".to_string()]]);
}

#[tokio::test]
async fn non_array_bulk_is_rejected_before_any_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let ctx = ServiceContext::live(&server.url());
    let mut bench = Workbench::new(&ctx);
    bench.add_task(&form("Local", "1", "5"));

    let err = bench.analyze(r#"{"title":"X"}"#, "smart_balance").await.unwrap_err();
    assert_eq!(err, AnalyzeError::Shape);
    assert_eq!(err.to_string(), "Bulk JSON must be an array");
    mock.assert_async().await;
}

#[tokio::test]
async fn service_error_keeps_previous_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/analyze/")
        .match_query(Matcher::UrlEncoded("strategy".into(), "smart_balance".into()))
        .with_status(200)
        .with_body(ranking_body())
        .create_async()
        .await;
    server
        .mock("POST", "/analyze/")
        .match_query(Matcher::UrlEncoded("strategy".into(), "bogus".into()))
        .with_status(400)
        .with_body(r#"{"error":"unknown strategy"}"#)
        .create_async()
        .await;

    let ctx = ServiceContext::live(&server.url());
    let mut bench = Workbench::new(&ctx);
    bench.add_task(&form("Write report", "2", "8"));

    bench.analyze("", "smart_balance").await.unwrap();
    let err = bench.analyze("", "bogus").await.unwrap_err();

    assert!(matches!(err, AnalyzeError::Service { status: 400, .. }));
    assert!(err.to_string().contains("unknown strategy"));
    assert_eq!(bench.view().blocks().len(), 3);
}

#[tokio::test]
async fn record_then_replay_produces_identical_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let cassette_path = dir.path().join("roundtrip.cassette.yaml");

    // --- Phase 1: record against the mock service ---
    let (recorded_id, recorded_blocks, recorded_err) = {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(ranking_body())
            .create_async()
            .await;
        server
            .mock("POST", "/suggest/")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail":"boom"}"#)
            .create_async()
            .await;

        let session = RecordingSession::new(&cassette_path, &server.url());
        let ctx = ServiceContext::recording(&server.url(), &session);
        let outputs = {
            let mut bench = Workbench::new(&ctx);
            let id = bench.add_task(&form("Write report", "2", "8")).id.clone();
            bench.analyze("", "deadline").await.unwrap();
            let err = bench.suggest("", "deadline").await.unwrap_err();
            let blocks = bench.view().blocks().to_vec();
            (id, blocks, err)
        };
        drop(ctx);
        assert_eq!(session.finish().unwrap(), cassette_path);
        outputs
    };

    // --- Phase 2: replay with no service at all, twice ---
    for _ in 0..2 {
        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        let mut bench = Workbench::new(&ctx);
        let id = bench.add_task(&form("Write report", "2", "8")).id.clone();
        bench.analyze("", "deadline").await.unwrap();
        let err = bench.suggest("", "deadline").await.unwrap_err();

        assert_eq!(id, recorded_id, "id replay mismatch");
        assert_eq!(bench.view().blocks(), recorded_blocks.as_slice(), "ranking replay mismatch");
        assert_eq!(err, recorded_err, "error replay mismatch");
    }
}
