//! Time source adapters.

use crate::ports::outbound::TimeSource;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Wall-clock time source.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable time source for tests.
///
/// Clones share one underlying instant, so a test can keep a handle and
/// advance the clock after the service has taken ownership of its copy.
#[derive(Clone)]
pub struct FixedTimeSource {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedTimeSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
