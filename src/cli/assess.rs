use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::cli::commands::AssessArgs;
use crate::cli::resolve_config;
use crate::errors::ConsoleError;
use crate::events::ConsoleEvent;
use crate::gateway::{Gateway, HttpGateway};
use crate::render::notify::{render_notice, NoticeKind};
use crate::render::summary::{format_panels, render_summary};
use crate::tracker::{LifecycleTracker, TrackerOptions};
use crate::utils::formatting::format_duration;

/// One-shot run: start an assessment, follow it to its terminal status,
/// then show the refreshed summary. Exits non-zero when the run fails.
pub async fn handle_assess(args: AssessArgs) -> Result<(), ConsoleError> {
    let config = resolve_config(&args.connection).await?;
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.base_url));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ConsoleEvent>();
    let tracker = LifecycleTracker::new(
        Arc::clone(&gateway),
        event_tx,
        TrackerOptions::from_config(&config),
    );

    let started = Instant::now();
    tracker.start().await?;

    let mut spinner: Option<ProgressBar> = None;
    while let Some(event) = event_rx.recv().await {
        match event {
            ConsoleEvent::ControlLocked => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("  {spinner:.cyan} {msg}")
                        .unwrap(),
                );
                bar.set_message("Starting assessment...");
                bar.enable_steady_tick(std::time::Duration::from_millis(120));
                spinner = Some(bar);
            }
            ConsoleEvent::RunStarted { run_id } => {
                if let Some(bar) = &spinner {
                    bar.set_message(format!("Assessment {run_id} running..."));
                    bar.println(render_notice(
                        NoticeKind::Success,
                        &format!("Assessment {run_id} started"),
                    ));
                }
            }
            ConsoleEvent::PollTransportError { error, .. } => {
                if let Some(bar) = &spinner {
                    bar.set_message(format!("Poll failed ({error}), retrying..."));
                }
            }
            ConsoleEvent::ControlReleased => {
                if let Some(bar) = spinner.take() {
                    bar.finish_and_clear();
                }
            }
            ConsoleEvent::RunCompleted { run_id } => {
                println!(
                    "{}",
                    render_notice(
                        NoticeKind::Success,
                        &format!(
                            "Assessment {run_id} completed in {}",
                            format_duration(started.elapsed())
                        ),
                    )
                );
            }
            ConsoleEvent::RunFailed { run_id, error } => {
                println!(
                    "{}",
                    render_notice(NoticeKind::Error, &format!("Assessment {run_id} failed: {error}"))
                );
                return Err(ConsoleError::Api(error));
            }
            ConsoleEvent::SummaryFetched(doc) => {
                let panels = render_summary(&doc, config.max_inline_recommendations);
                print!("{}", format_panels(&panels, &config.organization));
                return Ok(());
            }
            ConsoleEvent::RefreshFailed { error } => {
                println!(
                    "{}",
                    render_notice(
                        NoticeKind::Error,
                        &format!("Assessment finished but summary refresh failed: {error}"),
                    )
                );
                return Ok(());
            }
            ConsoleEvent::StartFailed { .. } => {}
        }
    }
    Ok(())
}
