//! Ticker handle that forwards start/cancel to the tick driver task

use tokio::sync::mpsc;
use tracing::warn;

use crate::timer::Ticker;

/// Commands understood by [`tick_driver_task`](crate::tasks::tick_driver_task).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCommand {
    Start,
    Cancel,
}

/// Engine-side [`Ticker`] that never blocks: commands are queued for the driver.
#[derive(Debug, Clone)]
pub struct ChannelTicker {
    tx: mpsc::UnboundedSender<TickCommand>,
}

impl ChannelTicker {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, command: TickCommand) {
        if let Err(e) = self.tx.send(command) {
            warn!("Tick driver is gone, dropping {:?}: {}", command, e);
        }
    }
}

impl Ticker for ChannelTicker {
    fn start(&self) {
        self.send(TickCommand::Start);
    }

    fn cancel(&self) {
        self.send(TickCommand::Cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_commands_in_order() {
        let (ticker, mut rx) = ChannelTicker::new();
        ticker.start();
        ticker.cancel();

        assert_eq!(rx.try_recv().unwrap(), TickCommand::Start);
        assert_eq!(rx.try_recv().unwrap(), TickCommand::Cancel);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_driver_is_not_fatal() {
        let (ticker, rx) = ChannelTicker::new();
        drop(rx);
        ticker.start();
    }
}
