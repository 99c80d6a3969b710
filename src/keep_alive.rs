//! Background keep-alive loop.
//!
//! One loop per session, started after the first successful login when the
//! account asks for it. A failed tick is logged and retried on the next one;
//! the loop never re-authenticates. It ends when the session is shut down or
//! dropped.

use crate::error::Result;
use crate::session::{Session, WeakSession};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveState {
    Idle,
    Running,
    Stopped,
}

/// Outcome of the most recent keep-alive tick.
#[derive(Debug, Clone)]
pub struct KeepAliveReport {
    pub at: DateTime<Utc>,
    pub result: Result<()>,
}

impl KeepAliveReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Tick counters, updated together after every tick.
#[derive(Debug, Clone, Default)]
pub struct KeepAliveStats {
    pub ticks: u64,
    pub consecutive_failures: u32,
    pub last_report: Option<KeepAliveReport>,
}

/// Shared view of the loop, readable from the session while the task runs.
#[derive(Clone)]
pub struct KeepAliveMonitor {
    state: Arc<RwLock<KeepAliveState>>,
    stats: Arc<RwLock<KeepAliveStats>>,
}

impl KeepAliveMonitor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(KeepAliveState::Idle)),
            stats: Arc::new(RwLock::new(KeepAliveStats::default())),
        }
    }

    pub async fn get_state(&self) -> KeepAliveState {
        *self.state.read().await
    }

    pub async fn set_state(&self, new_state: KeepAliveState) {
        *self.state.write().await = new_state;
    }

    pub async fn is_running(&self) -> bool {
        matches!(*self.state.read().await, KeepAliveState::Running)
    }

    /// Consistent snapshot of all counters.
    pub async fn stats(&self) -> KeepAliveStats {
        self.stats.read().await.clone()
    }

    pub async fn last_report(&self) -> Option<KeepAliveReport> {
        self.stats.read().await.last_report.clone()
    }

    pub async fn ticks(&self) -> u64 {
        self.stats.read().await.ticks
    }

    pub async fn consecutive_failures(&self) -> u32 {
        self.stats.read().await.consecutive_failures
    }

    /// Record a tick and return the failure streak it leaves behind.
    pub async fn record(&self, result: Result<()>) -> u32 {
        let mut stats = self.stats.write().await;
        stats.ticks += 1;
        match &result {
            Ok(()) => stats.consecutive_failures = 0,
            Err(_) => stats.consecutive_failures += 1,
        }
        stats.last_report = Some(KeepAliveReport {
            at: Utc::now(),
            result,
        });
        stats.consecutive_failures
    }
}

impl Default for KeepAliveMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the loop. The task holds only a weak reference to the session.
pub(crate) async fn start(
    session: WeakSession,
    period: Duration,
    monitor: KeepAliveMonitor,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    monitor.set_state(KeepAliveState::Running).await;
    info!(?period, "Keep-alive loop started");

    tokio::spawn(async move {
        run(session, period, &monitor, &cancel).await;

        monitor.set_state(KeepAliveState::Stopped).await;
        info!("Keep-alive loop stopped");
    })
}

async fn run(
    session: WeakSession,
    period: Duration,
    monitor: &KeepAliveMonitor,
    cancel: &CancellationToken,
) {
    // The token was just issued, so the first tick is one full period out.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let Some(session) = session.upgrade() else {
            debug!("Session dropped, ending keep-alive loop");
            return;
        };

        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = session.keep_alive() => result,
        };
        tick_finished(&session, monitor, result).await;
    }
}

async fn tick_finished(session: &Session, monitor: &KeepAliveMonitor, result: Result<()>) {
    let username = &session.account().username;
    let failures = monitor.record(result.clone()).await;

    match result {
        Ok(()) => debug!(%username, "Keep-alive succeeded"),
        Err(err) => warn!(
            %username,
            error = %err,
            failures,
            "Keep-alive failed, retrying next tick"
        ),
    }
}
