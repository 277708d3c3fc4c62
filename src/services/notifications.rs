//! Pending background notifications, held in memory for the host to deliver

use std::sync::Mutex;

use tracing::{debug, info};

use crate::timer::{NotificationSink, ScheduledEvent};

/// Outbox of boundary notifications the host should fire while the engine
/// is not executing. Exposed read-only over the status API.
#[derive(Debug, Default)]
pub struct NotificationOutbox {
    pending: Mutex<Vec<ScheduledEvent>>,
}

impl NotificationOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of pending events in firing order.
    pub fn pending(&self) -> Result<Vec<ScheduledEvent>, String> {
        self.pending
            .lock()
            .map(|pending| pending.clone())
            .map_err(|e| format!("Failed to lock notification outbox: {}", e))
    }
}

impl NotificationSink for NotificationOutbox {
    fn schedule(&self, events: &[ScheduledEvent]) -> Result<(), String> {
        let mut pending = self.pending.lock()
            .map_err(|e| format!("Failed to lock notification outbox: {}", e))?;

        for event in events {
            if pending.iter().any(|p| p.identifier == event.identifier) {
                return Err(format!("Notification {} is already scheduled", event.identifier));
            }
        }

        for event in events {
            debug!("Scheduled '{}' at {} (+{}s)", event.label, event.at, event.offset_seconds);
        }
        pending.extend_from_slice(events);
        pending.sort_by_key(|event| event.at);
        info!("{} background notifications pending", pending.len());
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), String> {
        let mut pending = self.pending.lock()
            .map_err(|e| format!("Failed to lock notification outbox: {}", e))?;

        if !pending.is_empty() {
            info!("Cancelled {} pending notifications", pending.len());
        }
        pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::timer::Phase;

    fn event(id: &str, offset: i64) -> ScheduledEvent {
        ScheduledEvent {
            identifier: id.to_string(),
            at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset),
            offset_seconds: offset as u64,
            phase: Phase::Round,
            round: 1,
            label: "Round 1".to_string(),
        }
    }

    #[test]
    fn schedule_then_cancel() {
        let outbox = NotificationOutbox::new();
        outbox.schedule(&[event("b", 20), event("a", 10)]).unwrap();

        let ids: Vec<_> = outbox.pending().unwrap().into_iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec!["a", "b"]);

        outbox.cancel_all().unwrap();
        assert!(outbox.pending().unwrap().is_empty());
    }

    #[test]
    fn refuses_duplicates() {
        let outbox = NotificationOutbox::new();
        outbox.schedule(&[event("a", 10)]).unwrap();
        assert!(outbox.schedule(&[event("a", 10)]).is_err());
        assert_eq!(outbox.pending().unwrap().len(), 1);
    }
}
