// src/core/session.rs — Session entity and lifecycle state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session configuration, fixed at creation time. Only runtime state on
/// [`Session`] mutates afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub training_name: String,
    pub provider: String,
    pub model: String,
    pub topic: String,
    pub prompt: String,
    /// Total planned iterations.
    pub iterations: u32,
    /// Tick period in scheduler units (seconds by default).
    pub retry_interval: u32,
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Stopped,
    Completed,
}

impl SessionStatus {
    /// Stopped and completed sessions accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Stopped | SessionStatus::Completed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Stopped => "stopped",
            SessionStatus::Completed => "completed",
        })
    }
}

/// One simulated persuasion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based, strictly monotonic within a session.
    pub iteration: u32,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub config: SessionConfig,
    /// Computed once at creation; never recomputed as iterations run.
    pub projected_cost: f64,
    pub status: SessionStatus,
    pub current_iteration: u32,
    pub successful_count: u32,
    pub log: Vec<IterationRecord>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(config: SessionConfig, projected_cost: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            projected_cost,
            status: SessionStatus::Idle,
            current_iteration: 0,
            successful_count: 0,
            log: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Fraction of iterations so far where the provider conceded.
    pub fn success_rate(&self) -> f64 {
        if self.current_iteration == 0 {
            return 0.0;
        }
        self.successful_count as f64 / self.current_iteration as f64
    }

    pub fn latest_record(&self) -> Option<&IterationRecord> {
        self.log.last()
    }

    pub(crate) fn mark_started(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Running;
        self.started_at = Some(now);
    }

    /// Append one iteration outcome, keeping `log.len() == current_iteration`,
    /// and flip to completed when the planned total is reached.
    pub(crate) fn apply_iteration(&mut self, success: bool, message: String) {
        debug_assert_eq!(self.status, SessionStatus::Running);

        self.current_iteration += 1;
        if success {
            self.successful_count += 1;
        }
        self.log.push(IterationRecord {
            iteration: self.current_iteration,
            timestamp: Utc::now(),
            success,
            message,
        });

        if self.current_iteration >= self.config.iterations {
            self.status = SessionStatus::Completed;
            self.completed_at = Some(Utc::now());
        }
    }
}
