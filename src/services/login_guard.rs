//! Login attempt guard
//!
//! Tracks, per identity key (an email address), the number of consecutive
//! failed login attempts inside a sliding time window. The guard only keeps
//! the books; the authentication flow decides what an attempt count means
//! (see `UserService::login`).
//!
//! The window is "time since the last attempt", not a fixed calendar bucket:
//! a registration arriving more than one window after the previous one starts
//! a fresh burst at count 1. A periodic sweep reclaims records whose age has
//! reached the window, so stale entries never outlive one window past their
//! last activity.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::config::ThrottleConfig;

/// Throttling state for one identity key
#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    /// Attempts registered since the window last reset; at least 1
    chances: u32,
    /// When the most recent attempt was registered
    last_attempt_at: Instant,
}

/// Login attempt guard.
///
/// All access to the registry goes through these operations; the map itself
/// is behind an async lock, so the guard is safe to share between request
/// handlers and the background sweep task.
pub struct LoginAttemptGuard {
    records: RwLock<HashMap<String, AttemptRecord>>,
    window: Duration,
    case_insensitive_keys: bool,
}

impl LoginAttemptGuard {
    /// Create a new guard with the given sliding window
    pub fn new(window: Duration, case_insensitive_keys: bool) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            window,
            case_insensitive_keys,
        }
    }

    /// Create a guard from throttle configuration
    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.window(), config.case_insensitive_keys)
    }

    /// The configured sliding window
    pub fn window(&self) -> Duration {
        self.window
    }

    fn normalize(&self, key: &str) -> String {
        if self.case_insensitive_keys {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }

    /// Record a failed attempt for `key`.
    ///
    /// First attempt for a key creates its record at count 1. A subsequent
    /// attempt increments the count, unless the gap since the previous
    /// attempt exceeds the window, in which case the count restarts at 1.
    /// The record's timestamp is always moved to now.
    pub async fn register_attempt(&self, key: &str) {
        let key = self.normalize(key);
        let now = Instant::now();

        let mut records = self.records.write().await;
        match records.get_mut(&key) {
            Some(record) => {
                if now.duration_since(record.last_attempt_at) > self.window {
                    record.chances = 1;
                } else {
                    record.chances += 1;
                }
                record.last_attempt_at = now;
            }
            None => {
                records.insert(
                    key,
                    AttemptRecord {
                        chances: 1,
                        last_attempt_at: now,
                    },
                );
            }
        }
    }

    /// The current attempt count for `key`, or 0 if no record exists.
    ///
    /// Pure read: never mutates state and never expires records, so a stale
    /// count stays visible until the next sweep or registration.
    pub async fn attempt_count(&self, key: &str) -> u32 {
        let key = self.normalize(key);
        let records = self.records.read().await;
        records.get(&key).map(|record| record.chances).unwrap_or(0)
    }

    /// Delete any record for `key`. No-op if none exists.
    ///
    /// Called by the authentication flow after a successful login.
    pub async fn reset(&self, key: &str) {
        let key = self.normalize(key);
        let mut records = self.records.write().await;
        records.remove(&key);
    }

    /// Delete every record whose age has reached the window.
    ///
    /// Returns the number of records reclaimed. The age check runs under the
    /// write lock, so a record refreshed by a concurrent `register_attempt`
    /// is seen with its new timestamp and survives.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now.duration_since(record.last_attempt_at) < self.window);
        before - records.len()
    }
}

/// Handle for the background sweep task; dropping it leaves the task
/// running, call [`SweeperHandle::stop`] during shutdown.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweep task to stop and wait for it to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!("Sweep task did not shut down cleanly: {}", e);
        }
    }
}

/// Start the recurring sweep for the given guard.
///
/// Runs once per window so entries never persist more than one window past
/// their last activity. One pass failing (the task being cancelled mid-await
/// aside, a pass cannot currently fail) must never stop the loop; the tick
/// interval keeps firing regardless.
pub fn start_sweeper(guard: Arc<LoginAttemptGuard>) -> SweeperHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let period = guard.window();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let reclaimed = guard.sweep().await;
                    if reclaimed > 0 {
                        tracing::debug!(reclaimed, "Reclaimed stale login attempt records");
                    }
                }
                _ = shutdown_rx.changed() => {
                    tracing::debug!("Login attempt sweeper stopping");
                    break;
                }
            }
        }
    });

    SweeperHandle { shutdown, handle }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// N registrations with no intervening decay always count N,
        /// regardless of key contents.
        #[test]
        fn property_count_matches_registrations(
            key in "[a-zA-Z0-9@._-]{1,40}",
            n in 1u32..20
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let guard = LoginAttemptGuard::new(Duration::from_secs(3600), false);
                for _ in 0..n {
                    guard.register_attempt(&key).await;
                }
                prop_assert_eq!(guard.attempt_count(&key).await, n);

                guard.reset(&key).await;
                prop_assert_eq!(guard.attempt_count(&key).await, 0);
                Ok(())
            })?;
        }
    }
}
