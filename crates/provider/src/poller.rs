use crate::isard::{StatusRef, StatusSource};
use isard_common::prelude::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Statuses after which a desktop is not expected to change any more.
///
pub const TERMINAL_STATUSES: [&str; 3] = ["stopped", "shutdown", "failed"];

/// Status reported for an entity the API no longer knows about.
///
pub const NOT_FOUND_STATUS: &str = "not_found";

/// Status reported when the API returns an entity without one. Not terminal.
///
pub const UNKNOWN_STATUS: &str = "unknown";

/// Shortest accepted poll interval.
///
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What the poller does when the entity disappears while waiting.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundPolicy {
    /// Keep polling until the deadline, treating `not_found` as transient.
    #[default]
    KeepPolling,
    /// Treat a vanished entity as stopped.
    Terminal,
}

/// Polling cadence and policy.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub not_found: NotFoundPolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            not_found: NotFoundPolicy::default(),
        }
    }
}

/// Case-insensitive membership test against [`TERMINAL_STATUSES`].
///
pub fn is_terminal(status: &str, policy: NotFoundPolicy) -> bool {
    if policy == NotFoundPolicy::Terminal && status.eq_ignore_ascii_case(NOT_FOUND_STATUS) {
        return true;
    }
    TERMINAL_STATUSES
        .iter()
        .any(|terminal| status.eq_ignore_ascii_case(terminal))
}

/// Blocks until the entity reaches a terminal status or the deadline passes.
///
/// The status is checked once right away, so an already settled entity
/// returns without sleeping. After that it is polled every
/// `settings.interval`, raised to [`MIN_INTERVAL`] when shorter.
///
/// # Arguments
///
/// * `source`: Where statuses are read from.
/// * `entity`: Entity to watch.
/// * `timeout`: Total wait budget.
/// * `settings`: Poll interval and `not_found` policy.
///
/// # Returns
///
/// An empty `Result` once a terminal status is seen, [`Error::Timeout`] when
/// the budget runs out, or [`Error::StatusQuery`] when a poll fails.
///
#[tracing::instrument(level = "trace", target = "poller", skip(source, entity, settings), fields(entity = %entity))]
pub async fn wait_until_stopped<S>(
    source: &S,
    entity: &StatusRef,
    timeout: Duration,
    settings: PollSettings,
) -> Result<()>
where
    S: StatusSource + ?Sized,
{
    let start = Instant::now();
    let deadline = start + timeout;

    if query(source, entity, settings.not_found).await? {
        return Ok(());
    }

    // A zero period would make `interval_at` panic.
    let period = settings.interval.max(MIN_INTERVAL);
    let mut ticker = tokio::time::interval_at(start + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = tokio::time::sleep_until(deadline) => {
                let elapsed = start.elapsed();
                tracing::warn!(target: "poller", elapsed = ?elapsed, "Gave up waiting for terminal status");
                return Err(Error::Timeout(elapsed.as_secs_f32()));
            }
            _ = ticker.tick() => {
                if query(source, entity, settings.not_found).await? {
                    return Ok(());
                }
            }
        }
    }
}

/// Reads the current status once and reports whether it is terminal.
///
async fn query<S>(source: &S, entity: &StatusRef, policy: NotFoundPolicy) -> Result<bool>
where
    S: StatusSource + ?Sized,
{
    let status = source
        .status(entity)
        .await
        .map_err(|error| Error::StatusQuery(Box::new(error)))?;

    let terminal = is_terminal(&status, policy);
    tracing::debug!(target: "poller", %status, terminal, "Status observed");
    Ok(terminal)
}
