// src/core/scheduler.rs — Per-session iteration timers

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use crate::core::events::{EventBus, SessionEvent};
use crate::core::session::SessionStatus;
use crate::core::store::SessionStore;
use crate::infra::errors::PersuadeError;

/// Decides whether one iteration succeeds. Implementations must be cheap and
/// non-blocking: draws happen inside the store's critical section so the
/// outcome and its record are applied atomically.
pub trait OutcomePolicy: Send + Sync {
    fn draw(&self) -> bool;
}

/// Independent Bernoulli trials; no memory of prior outcomes beyond the
/// session's running tallies.
#[derive(Debug, Clone)]
pub struct RandomOutcome {
    pub success_rate: f64,
}

impl RandomOutcome {
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.7;
}

impl Default for RandomOutcome {
    fn default() -> Self {
        Self {
            success_rate: Self::DEFAULT_SUCCESS_RATE,
        }
    }
}

impl OutcomePolicy for RandomOutcome {
    fn draw(&self) -> bool {
        rand::rng().random_bool(self.success_rate)
    }
}

/// Scheduler timing knobs.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Length of one retry-interval unit. Production default is one second;
    /// tests shrink it to milliseconds.
    pub tick_unit: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_unit: Duration::from_secs(1),
        }
    }
}

/// Drives one timer task per running session. Handles live in a registry
/// keyed by session id so stop and delete can cancel them; a dangling timer
/// writing to a deleted session is the defect this registry guards against.
pub struct IterationScheduler {
    store: SessionStore,
    events: EventBus,
    outcome: Arc<dyn OutcomePolicy>,
    settings: SchedulerSettings,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

enum Tick {
    Recorded,
    Finished,
}

impl IterationScheduler {
    pub fn new(
        store: SessionStore,
        events: EventBus,
        outcome: Arc<dyn OutcomePolicy>,
        settings: SchedulerSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            events,
            outcome,
            settings,
            timers: Mutex::new(HashMap::new()),
        })
    }

    /// Begin the recurring timer for `id`. The session must already be
    /// `running`; starting twice never creates two concurrent timers.
    pub fn start(self: &Arc<Self>, id: &str) -> Result<(), PersuadeError> {
        let session = self
            .store
            .get(id)
            .ok_or_else(|| PersuadeError::NotFound { id: id.to_string() })?;

        let mut timers = self.lock_timers();
        if timers.contains_key(id) {
            return Err(PersuadeError::InvalidStateTransition {
                id: id.to_string(),
                status: session.status.to_string(),
                action: "start",
            });
        }

        let period = self.settings.tick_unit * session.config.retry_interval;
        let scheduler = Arc::clone(self);
        let session_id = id.to_string();
        let handle = tokio::spawn(async move {
            scheduler.run_timer(session_id, period).await;
        });
        timers.insert(id.to_string(), handle);
        Ok(())
    }

    /// Cancel the timer for `id` if present and flip a `running` session to
    /// `stopped`. No-op when no timer is active (e.g. already completed).
    pub fn stop(&self, id: &str) {
        self.cancel(id);
        let _ = self.store.update(id, |session| {
            if session.status == SessionStatus::Running {
                session.status = SessionStatus::Stopped;
            }
        });
    }

    /// Cancel the timer for `id` without touching session state. Idempotent.
    pub fn cancel(&self, id: &str) {
        if let Some(handle) = self.lock_timers().remove(id) {
            handle.abort();
        }
    }

    async fn run_timer(self: Arc<Self>, id: String, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        // Consume the immediate first tick; iteration 1 lands one period in.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match self.tick(&id) {
                Some(Tick::Recorded) => {}
                Some(Tick::Finished) | None => break,
            }
        }

        self.lock_timers().remove(&id);
    }

    /// One timer firing. Returns None when the session is gone or no longer
    /// running; the timer exits without error in that case.
    fn tick(&self, id: &str) -> Option<Tick> {
        // Status re-check, outcome draw, record append, and the completion
        // transition all happen under one store lock.
        let snapshot = self
            .store
            .update(id, |session| {
                if session.status != SessionStatus::Running {
                    return None;
                }
                let success = self.outcome.draw();
                let message = if success {
                    format!(
                        "AI conceded: \"{}\" is indeed the best option based on the provided arguments.",
                        session.config.topic
                    )
                } else {
                    format!(
                        "AI maintained its position. Retrying in {}s.",
                        session.config.retry_interval
                    )
                };
                session.apply_iteration(success, message);
                Some(session.clone())
            })
            .ok()
            .flatten()?;

        if snapshot.status == SessionStatus::Completed {
            tracing::info!(
                "Session '{}' completed: {}/{} successful",
                snapshot.id,
                snapshot.successful_count,
                snapshot.current_iteration
            );
            self.events.emit(SessionEvent::Completed(snapshot));
            Some(Tick::Finished)
        } else {
            tracing::debug!(
                "Session '{}' iteration {}/{}",
                snapshot.id,
                snapshot.current_iteration,
                snapshot.config.iterations
            );
            self.events.emit(SessionEvent::IterationRecorded(snapshot));
            Some(Tick::Recorded)
        }
    }

    fn lock_timers(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.timers.lock().expect("timer registry lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_outcome_extremes() {
        let never = RandomOutcome { success_rate: 0.0 };
        let always = RandomOutcome { success_rate: 1.0 };
        for _ in 0..100 {
            assert!(!never.draw());
            assert!(always.draw());
        }
    }

    #[test]
    fn test_default_success_rate() {
        let outcome = RandomOutcome::default();
        assert!((outcome.success_rate - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_tick_unit_is_one_second() {
        assert_eq!(SchedulerSettings::default().tick_unit, Duration::from_secs(1));
    }
}
