// src/cli/run.rs — Batch session runner

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::core::controller::SessionController;
use crate::core::events::SessionEvent;
use crate::core::scheduler::{RandomOutcome, SchedulerSettings};
use crate::core::session::SessionConfig;
use crate::infra::config::Config;
use crate::provider::ProviderCatalog;

/// Batch file shape: one `[[session]]` table per session.
#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default)]
    session: Vec<SessionConfig>,
}

/// Create and start every session in `file`, then stream events until all
/// sessions reach a terminal state. Ctrl-C stops the stragglers gracefully.
pub async fn run_sessions(
    file: &str,
    config: &Config,
    catalog: Arc<ProviderCatalog>,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)?;
    let batch: SessionFile = toml::from_str(&content)?;
    if batch.session.is_empty() {
        anyhow::bail!("No [[session]] entries in {file}");
    }

    let controller = SessionController::with_policy(
        catalog,
        Arc::new(RandomOutcome {
            success_rate: config.outcome.success_rate,
        }),
        SchedulerSettings {
            tick_unit: Duration::from_millis(config.scheduler.tick_unit_ms),
        },
    );

    // Subscribe before starting so no event is missed.
    let mut events = controller.subscribe();

    let mut pending = 0usize;
    for session_config in batch.session {
        let session = controller.create_session(session_config)?;
        println!(
            "{}  {} ({} iterations, projected ${:.4})",
            session.id,
            session.config.training_name,
            session.config.iterations,
            session.projected_cost
        );
        controller.start_session(&session.id)?;
        pending += 1;
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while pending > 0 {
        tokio::select! {
            event = events.recv() => match event {
                Ok(SessionEvent::IterationRecorded(s)) => {
                    if let Some(record) = s.latest_record() {
                        println!(
                            "[{}] {}/{} {}",
                            s.config.training_name,
                            record.iteration,
                            s.config.iterations,
                            record.message
                        );
                    }
                }
                Ok(SessionEvent::Completed(s)) => {
                    println!(
                        "[{}] completed: {}/{} successful ({:.0}%)",
                        s.config.training_name,
                        s.successful_count,
                        s.current_iteration,
                        s.success_rate() * 100.0
                    );
                    pending -= 1;
                }
                Ok(SessionEvent::Stopped(s)) => {
                    println!(
                        "[{}] stopped at iteration {}",
                        s.config.training_name, s.current_iteration
                    );
                    pending -= 1;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Event stream lagged, {n} events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => {
                println!("\nStopping running sessions...");
                for session in controller.list_sessions() {
                    if !session.status.is_terminal() {
                        let _ = controller.stop_session(&session.id);
                    }
                }
                break;
            }
        }
    }

    print_summary(&controller);
    Ok(())
}

fn print_summary(controller: &SessionController) {
    println!();
    println!(
        "{:<24} {:<10} {:>9} {:>8} {:>10}",
        "name", "status", "progress", "success", "cost"
    );
    for s in controller.list_sessions() {
        println!(
            "{:<24} {:<10} {:>4}/{:<4} {:>7.0}% {:>10}",
            s.config.training_name,
            s.status,
            s.current_iteration,
            s.config.iterations,
            s.success_rate() * 100.0,
            format!("${:.4}", s.projected_cost),
        );
    }
}
