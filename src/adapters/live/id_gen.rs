//! Live adapter for the `IdGenerator` port.

use std::sync::Mutex;

use crate::ports::{Clock, IdGenerator};
use crate::task::LOCAL_ID_PREFIX;

/// Generates `local_<unix-millis>` ids from a clock.
///
/// Two tasks added within the same millisecond would otherwise collide, so
/// the generator never goes backwards: a repeated or earlier timestamp is
/// bumped to one past the last id handed out.
pub struct ClockIdGenerator {
    clock: Box<dyn Clock>,
    last: Mutex<Option<i64>>,
}

impl ClockIdGenerator {
    /// Creates a generator reading time from `clock`.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock, last: Mutex::new(None) }
    }
}

impl IdGenerator for ClockIdGenerator {
    fn generate_id(&self) -> String {
        let now = self.clock.now().timestamp_millis();
        let mut last = self.last.lock().expect("id generator lock poisoned");
        let millis = match *last {
            Some(previous) if now <= previous => previous + 1,
            _ => now,
        };
        *last = Some(millis);
        format!("{LOCAL_ID_PREFIX}{millis}")
    }
}
