// src/core/controller.rs — Session lifecycle orchestration

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::core::cost;
use crate::core::events::{EventBus, SessionEvent};
use crate::core::scheduler::{IterationScheduler, OutcomePolicy, RandomOutcome, SchedulerSettings};
use crate::core::session::{Session, SessionConfig, SessionStatus};
use crate::core::store::SessionStore;
use crate::infra::errors::PersuadeError;
use crate::provider::ProviderCatalog;

/// Bounds on user-supplied session configuration.
pub const MAX_ITERATIONS: u32 = 100;
pub const MAX_RETRY_INTERVAL: u32 = 60;

/// Front door for the engine: validates and orchestrates session
/// create/start/stop/delete, wiring the scheduler to the store. Every
/// operation either fully succeeds (with an observable event) or fully fails
/// with zero state change.
pub struct SessionController {
    catalog: Arc<ProviderCatalog>,
    store: SessionStore,
    scheduler: Arc<IterationScheduler>,
    events: EventBus,
}

impl SessionController {
    pub fn new(catalog: Arc<ProviderCatalog>) -> Self {
        Self::with_policy(
            catalog,
            Arc::new(RandomOutcome::default()),
            SchedulerSettings::default(),
        )
    }

    /// Full constructor: inject the outcome policy (deterministic in tests)
    /// and scheduler timing.
    pub fn with_policy(
        catalog: Arc<ProviderCatalog>,
        outcome: Arc<dyn OutcomePolicy>,
        settings: SchedulerSettings,
    ) -> Self {
        let store = SessionStore::new();
        let events = EventBus::new(1024);
        let scheduler = IterationScheduler::new(store.clone(), events.clone(), outcome, settings);
        Self {
            catalog,
            store,
            scheduler,
            events,
        }
    }

    /// Subscribe to session mutation events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Validate, price, and insert a new idle session.
    pub fn create_session(&self, config: SessionConfig) -> Result<Session, PersuadeError> {
        validate_config(&config)?;
        self.catalog.require_model(&config.provider, &config.model)?;

        let projected_cost =
            cost::estimate_cost(&self.catalog, &config.provider, config.iterations)?;
        let session = Session::new(config, projected_cost);
        self.store.insert(session.clone());
        tracing::info!(
            "Created session '{}' ({}) targeting {}/{}",
            session.config.training_name,
            session.id,
            session.config.provider,
            session.config.model
        );
        self.events.emit(SessionEvent::Created(session.clone()));
        Ok(session)
    }

    /// Flip an idle session to running and register its timer.
    pub fn start_session(&self, id: &str) -> Result<Session, PersuadeError> {
        let snapshot = self.store.update(id, |session| {
            if session.status != SessionStatus::Idle {
                return Err(PersuadeError::InvalidStateTransition {
                    id: session.id.clone(),
                    status: session.status.to_string(),
                    action: "start",
                });
            }
            session.mark_started(Utc::now());
            Ok(session.clone())
        })??;

        if let Err(e) = self.scheduler.start(id) {
            // Roll back so a failed start leaves no half-started session.
            let _ = self.store.update(id, |session| {
                session.status = SessionStatus::Idle;
                session.started_at = None;
            });
            return Err(e);
        }

        tracing::info!("Started session '{}'", id);
        self.events.emit(SessionEvent::Started(snapshot.clone()));
        Ok(snapshot)
    }

    /// Stop a running session. No-op (returns the current snapshot) when the
    /// session is not running.
    pub fn stop_session(&self, id: &str) -> Result<Session, PersuadeError> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| PersuadeError::NotFound { id: id.to_string() })?;
        if current.status != SessionStatus::Running {
            return Ok(current);
        }

        self.scheduler.stop(id);
        let snapshot = self
            .store
            .get(id)
            .ok_or_else(|| PersuadeError::NotFound { id: id.to_string() })?;
        if snapshot.status == SessionStatus::Stopped {
            tracing::info!(
                "Stopped session '{}' after {} iteration(s)",
                id,
                snapshot.current_iteration
            );
            self.events.emit(SessionEvent::Stopped(snapshot.clone()));
        }
        Ok(snapshot)
    }

    /// Cancel any timer and remove the session, regardless of status.
    pub fn delete_session(&self, id: &str) -> Result<Session, PersuadeError> {
        // Timer first: after this no tick can observe the session.
        self.scheduler.cancel(id);
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| PersuadeError::NotFound { id: id.to_string() })?;
        tracing::info!(
            "Deleted session '{}' ({})",
            removed.config.training_name,
            id
        );
        self.events.emit(SessionEvent::Deleted { id: id.to_string() });
        Ok(removed)
    }

    pub fn get_session(&self, id: &str) -> Result<Session, PersuadeError> {
        self.store
            .get(id)
            .ok_or_else(|| PersuadeError::NotFound { id: id.to_string() })
    }

    /// All sessions in creation order.
    pub fn list_sessions(&self) -> Vec<Session> {
        self.store.list()
    }

    /// Projected cost for a hypothetical session.
    pub fn estimate(&self, provider: &str, iterations: u32) -> Result<f64, PersuadeError> {
        cost::estimate_cost(&self.catalog, provider, iterations)
    }
}

fn validate_config(config: &SessionConfig) -> Result<(), PersuadeError> {
    let mut problems = Vec::new();
    if config.training_name.trim().is_empty() {
        problems.push("training_name must not be empty");
    }
    if config.topic.trim().is_empty() {
        problems.push("topic must not be empty");
    }
    if config.prompt.trim().is_empty() {
        problems.push("prompt must not be empty");
    }
    if config.iterations == 0 || config.iterations > MAX_ITERATIONS {
        problems.push("iterations must be between 1 and 100");
    }
    if config.retry_interval == 0 || config.retry_interval > MAX_RETRY_INTERVAL {
        problems.push("retry_interval must be between 1 and 60");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PersuadeError::Validation(problems.join("; ")))
    }
}
