use std::sync::Arc;
use std::time::Instant;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::commands::WatchArgs;
use crate::cli::resolve_config;
use crate::errors::ConsoleError;
use crate::events::ConsoleEvent;
use crate::gateway::{Gateway, HttpGateway};
use crate::render::notify::{render_notice, NotificationSink, NoticeKind};
use crate::render::summary::{format_panels, render_summary, SummaryPanels};
use crate::scheduler::RefreshScheduler;
use crate::tracker::{LifecycleTracker, TrackerOptions};

/// The live dashboard session: a refresh scheduler keeps the summary
/// current, the lifecycle tracker follows an assessment run when one is
/// started, and both report back over one event channel.
pub async fn handle_watch(args: WatchArgs) -> Result<(), ConsoleError> {
    let config = resolve_config(&args.connection).await?;
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.base_url));

    println!(
        "{} v{} (build {})",
        style("AEGIS Console").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP"),
    );
    println!("  watching {} (Ctrl-C to exit)", config.base_url);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ConsoleEvent>();
    let tracker = LifecycleTracker::new(
        Arc::clone(&gateway),
        event_tx.clone(),
        TrackerOptions::from_config(&config),
    );
    let session_cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::new(
        Arc::clone(&gateway),
        event_tx.clone(),
        config.refresh_interval(),
    );
    let scheduler_handle = scheduler.spawn(session_cancel.clone());

    let mut sink = NotificationSink::new(config.notification_ttl());
    let mut panels: Option<SummaryPanels> = None;
    let mut spinner: Option<ProgressBar> = None;

    if args.assess {
        // Failures surface through the event stream like any other.
        let _ = tracker.start().await;
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                handle_event(
                    event,
                    &config.organization,
                    config.max_inline_recommendations,
                    &mut panels,
                    &mut sink,
                    &mut spinner,
                );
                sink.sweep(Instant::now());
            }
        }
    }

    debug!("watch session shutting down");
    session_cancel.cancel();
    tracker.cancel_tracking().await;
    let _ = scheduler_handle.await;
    Ok(())
}

fn handle_event(
    event: ConsoleEvent,
    organization: &str,
    max_inline: usize,
    panels: &mut Option<SummaryPanels>,
    sink: &mut NotificationSink,
    spinner: &mut Option<ProgressBar>,
) {
    match event {
        ConsoleEvent::SummaryFetched(doc) => {
            // Whole-panel swap: the view never mixes two documents.
            let next = render_summary(&doc, max_inline);
            print_line(spinner, &format_panels(&next, organization));
            *panels = Some(next);
        }
        ConsoleEvent::RefreshFailed { error } => {
            notify(sink, spinner, NoticeKind::Error, format!("Summary refresh failed: {error}"));
        }
        ConsoleEvent::ControlLocked => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner:.cyan} {msg}")
                    .unwrap(),
            );
            bar.set_message("Assessment in progress...");
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            *spinner = Some(bar);
        }
        ConsoleEvent::ControlReleased => {
            if let Some(bar) = spinner.take() {
                bar.finish_and_clear();
            }
        }
        ConsoleEvent::RunStarted { run_id } => {
            notify(sink, spinner, NoticeKind::Success, format!("Assessment {run_id} started"));
        }
        ConsoleEvent::StartFailed { error } => {
            notify(sink, spinner, NoticeKind::Error, format!("Failed to start assessment: {error}"));
        }
        ConsoleEvent::PollTransportError { run_id, error } => {
            debug!(run_id = %run_id, error = %error, "transient poll failure");
        }
        ConsoleEvent::RunCompleted { run_id } => {
            // The refreshed summary follows as its own SummaryFetched event.
            notify(sink, spinner, NoticeKind::Success, format!("Assessment {run_id} completed"));
        }
        ConsoleEvent::RunFailed { run_id, error } => {
            notify(sink, spinner, NoticeKind::Error, format!("Assessment {run_id} failed: {error}"));
        }
    }
}

fn notify(
    sink: &mut NotificationSink,
    spinner: &Option<ProgressBar>,
    kind: NoticeKind,
    message: String,
) {
    print_line(spinner, &render_notice(kind, &message));
    sink.push(kind, message);
}

/// Print without tearing an active spinner line.
fn print_line(spinner: &Option<ProgressBar>, text: &str) {
    match spinner {
        Some(bar) => bar.println(text),
        None => println!("{text}"),
    }
}
