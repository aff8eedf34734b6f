//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::id_gen::ClockIdGenerator;
use crate::adapters::live::prioritizer::HttpPrioritizer;
use crate::adapters::recording::{RecordingClock, RecordingPrioritizer};
use crate::adapters::replaying::{ReplayingClock, ReplayingPrioritizer};
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::{Config, ServiceMode};
use crate::ports::id_gen::IdGenerator;
use crate::ports::prioritizer::Prioritizer;

/// Bundles the port trait objects the pipeline depends on.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Id allocation for form-entered tasks.
    pub id_gen: Box<dyn IdGenerator>,
    /// The prioritization service.
    pub prioritizer: Box<dyn Prioritizer>,
}

impl ServiceContext {
    /// Creates a live context talking to the service at `service_url`.
    #[must_use]
    pub fn live(service_url: &str) -> Self {
        Self {
            id_gen: Box::new(ClockIdGenerator::new(Box::new(LiveClock))),
            prioritizer: Box::new(HttpPrioritizer::new(service_url)),
        }
    }

    /// Creates a live context that also records every clock reading and
    /// service call into `session`.
    #[must_use]
    pub fn recording(service_url: &str, session: &RecordingSession) -> Self {
        let clock = RecordingClock::new(Box::new(LiveClock), session.recorder());
        let prioritizer = RecordingPrioritizer::new(
            Box::new(HttpPrioritizer::new(service_url)),
            session.recorder(),
        );
        Self {
            id_gen: Box::new(ClockIdGenerator::new(Box::new(clock))),
            prioritizer: Box::new(prioritizer),
        }
    }

    /// Creates a context that serves everything from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = CassetteReplayer::load(path)?;
        // Clock and service get independent cursors over the same cassette.
        let clock = ReplayingClock::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));
        let prioritizer =
            ReplayingPrioritizer::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));
        Ok(Self {
            id_gen: Box::new(ClockIdGenerator::new(Box::new(clock))),
            prioritizer: Box::new(prioritizer),
        })
    }

    /// Builds the context selected by `config`.
    ///
    /// In record mode the returned session must be finished after the
    /// context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_config(config: &Config) -> Result<(Self, Option<RecordingSession>), String> {
        let url = config.service_url.as_str();
        match &config.mode {
            ServiceMode::Live => Ok((Self::live(url), None)),
            ServiceMode::Record(path) => {
                let session = RecordingSession::new(path, url);
                Ok((Self::recording(url, &session), Some(session)))
            }
            ServiceMode::Replay(path) => Ok((Self::replaying(path)?, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::task::TaskRecord;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replaying_context_serves_clock_and_service() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.cassette.yaml");
        let cassette = Cassette {
            name: "ctx".into(),
            recorded_at: Utc::now(),
            service_url: "http://svc/".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "clock".into(),
                    method: "now".into(),
                    input: json!(null),
                    output: json!("2025-03-15T14:30:00Z"),
                },
                Interaction {
                    seq: 1,
                    port: "prioritizer".into(),
                    method: "analyze".into(),
                    input: json!({}),
                    output: json!({"Ok": {"items": [{"title": "A"}], "cycles": []}}),
                },
            ],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.id_gen.generate_id(), "local_1742049000000");

        let batch = vec![TaskRecord::Bulk(json!({"title": "A"}))];
        let ranking = ctx.prioritizer.analyze(&batch, "deadline").await.unwrap();
        assert_eq!(ranking.items[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn from_config_returns_session_only_when_recording() {
        let dir = tempfile::tempdir().unwrap();
        let live = Config::new("http://127.0.0.1:8000/api/tasks/", None, None).unwrap();
        assert!(ServiceContext::from_config(&live).unwrap().1.is_none());

        let record = Config::new(
            "http://127.0.0.1:8000/api/tasks/",
            Some(dir.path().join("rec.yaml")),
            None,
        )
        .unwrap();
        let (ctx, session) = ServiceContext::from_config(&record).unwrap();
        drop(ctx);
        let written = session.unwrap().finish().unwrap();
        assert!(written.exists());
    }

    #[test]
    fn missing_replay_cassette_is_an_error() {
        let config =
            Config::new("http://127.0.0.1:8000/", None, Some("/nonexistent/c.yaml".into()))
                .unwrap();
        assert!(ServiceContext::from_config(&config).is_err());
    }
}
