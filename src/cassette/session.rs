//! Recording session wrapping the shared cassette recorder.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::recorder::CassetteRecorder;

/// Owns the recorder that recording adapters write into.
///
/// Adapters hold clones of the inner `Arc`; they must all be dropped before
/// [`RecordingSession::finish`] can write the cassette.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Starts a session that will write to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, service_url: &str) -> Self {
        let recorder = CassetteRecorder::new(path, "taskrank-session", service_url);
        Self { recorder: Arc::new(Mutex::new(recorder)) }
    }

    /// Handle for a recording adapter.
    #[must_use]
    pub fn recorder(&self) -> Arc<Mutex<CassetteRecorder>> {
        Arc::clone(&self.recorder)
    }

    /// Writes the cassette and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds the recorder, or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapters still hold the cassette recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("Cassette recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_writes_after_handles_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");
        let session = RecordingSession::new(&path, "http://svc/");

        {
            let handle = session.recorder();
            handle.lock().unwrap().record("clock", "now", json!(null), json!("t"));
        }

        assert_eq!(session.finish().unwrap(), path);
        assert!(path.exists());
    }

    #[test]
    fn finish_fails_while_handle_alive() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path().join("x.yaml"), "http://svc/");
        let _held = session.recorder();
        assert!(session.finish().is_err());
    }
}
