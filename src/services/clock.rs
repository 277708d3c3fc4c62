//! Wall-clock source backed by the system time

use chrono::{DateTime, Utc};

use crate::timer::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
