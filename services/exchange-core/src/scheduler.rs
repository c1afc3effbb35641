//! Interval scheduling
//!
//! Spawns two loops over a shared [`Exchange`]: a matching loop that runs
//! a pass per company every interval, and a day loop that advances the
//! simulated calendar (financial ticks plus quarter-end actions). A cycle
//! that fails is logged and the loop keeps going; shutdown is signalled
//! through a watch channel and joins both tasks.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::exchange::Exchange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Wall-clock gap between matching passes
    pub matching_interval: Duration,
    /// Wall-clock length of one simulated day
    pub day_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            matching_interval: Duration::from_secs(2),
            day_interval: Duration::from_secs(30),
        }
    }
}

pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal both loops to stop and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

pub fn spawn(exchange: Exchange, config: SchedulerConfig) -> SchedulerHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let matching = tokio::spawn(matching_loop(
        exchange.clone(),
        config.matching_interval,
        shutdown_rx.clone(),
    ));
    let days = tokio::spawn(day_loop(exchange, config.day_interval, shutdown_rx));
    info!(
        matching_interval_ms = config.matching_interval.as_millis() as u64,
        day_interval_ms = config.day_interval.as_millis() as u64,
        "scheduler started"
    );
    SchedulerHandle {
        shutdown: shutdown_tx,
        tasks: vec![matching, days],
    }
}

async fn matching_loop(exchange: Exchange, every: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                for company_id in exchange.company_ids().await {
                    if let Err(error) = exchange.run_matching(company_id).await {
                        error!(company_id = %company_id, %error, "matching pass failed");
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    debug!("matching loop stopped");
}

async fn day_loop(exchange: Exchange, every: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the immediate first tick would advance the calendar at startup
    interval.tick().await;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let date = exchange.advance_day().await;
                debug!(%date, "simulated day advanced");
            }
            _ = shutdown.changed() => break,
        }
    }
    debug!("day loop stopped");
}
