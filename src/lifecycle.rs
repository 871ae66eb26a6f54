//! Process lifecycle: one task multiplexing every timer and the shutdown signal.
//!
//! Everything that used to be separate goroutines in the source design — a flush
//! timer, a sample timer, a midnight rotation/reset timer, and signal handling — is
//! modeled here as a single `tokio::select!` loop instead of independent tasks racing
//! each other over shared state. Only this task ever rotates logs or resets the
//! hit-ratio counter.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval};

use crate::app::App;

/// How often the hit-ratio counter is sampled and written to the daily log.
const SAMPLE_PERIOD: Duration = Duration::from_secs(10);

pub async fn run(app: Arc<App>, shutdown_tx: watch::Sender<bool>) {
    let mut sample_timer = interval(SAMPLE_PERIOD);
    sample_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut flush_timer = interval(Duration::from_secs(app.kvs_config.flush_time_secs.max(1)));
    flush_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut reset_deadline = next_local_midnight();

    loop {
        tokio::select! {
            _ = shutdown_signal() => {
                break;
            }
            _ = sample_timer.tick() => {
                let pct = app.telemetry.sample();
                app.logger.daily_line(&format!("redis:{pct}%")).await;
            }
            _ = flush_timer.tick() => {
                app.logger.flush_all().await;
            }
            _ = tokio::time::sleep_until(reset_deadline) => {
                app.logger.daily_line("--- daily reset ---").await;
                app.telemetry.reset();
                app.logger.rotate().await;
                reset_deadline = next_local_midnight();
            }
        }
    }

    app.logger.daily_line("server close! Bye Bye").await;
    app.logger.flush_all().await;
    let _ = shutdown_tx.send(true);
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn next_local_midnight() -> Instant {
    let now = Local::now();
    let tomorrow = (now + chrono::Duration::days(1)).date_naive();
    let midnight = Local
        .from_local_datetime(&tomorrow.and_hms_opt(0, 0, 0).expect("valid midnight"))
        .single()
        .unwrap_or_else(|| now + chrono::Duration::days(1));
    let wait = (midnight - now).to_std().unwrap_or(Duration::from_secs(1));
    Instant::now() + wait
}
