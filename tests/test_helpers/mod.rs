//! Clock shared by the integration test binaries.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when a test advances it.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SteppedClock {
    /// Creates a clock fixed at 2024-05-01T09:00:00Z.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid fixed timestamp");
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, step: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for SteppedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
