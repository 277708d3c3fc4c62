//! 1 Hz tick driver background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{services::TickCommand, state::AppState};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks the engine once per second while it asks to be ticked.
///
/// A `Start` replaces the running interval, so there is never more than one
/// tick source. Runs until every ticker handle is dropped.
pub async fn tick_driver_task(state: Arc<AppState>, mut commands: mpsc::UnboundedReceiver<TickCommand>) {
    info!("Starting tick driver task");

    let mut ticking: Option<Interval> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(TickCommand::Start) => {
                        debug!("Tick source (re)started");
                        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                        // Gaps are reconciled by resync, not by a burst of ticks.
                        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                        ticking = Some(interval);
                    }
                    Some(TickCommand::Cancel) => {
                        debug!("Tick source cancelled");
                        ticking = None;
                    }
                    None => {
                        info!("All tickers dropped, stopping tick driver");
                        break;
                    }
                }
            }

            _ = next_tick(&mut ticking) => {
                if let Err(e) = state.tick() {
                    error!("Failed to tick timer: {}", e);
                }
            }
        }
    }
}

async fn next_tick(ticking: &mut Option<Interval>) {
    match ticking {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
