//! Application runner that wires the pipeline together.
//!
//! Builds the engine, handles start/stop signaling (Enter to start when
//! configured, Ctrl-C to stop), and routes transcriptions to the output sink.

use crate::config::Config;
use crate::controller::{Controller, ControllerEvent, ControllerState};
use crate::engine::Engine;
use crate::output::OutputSink;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Run the pipeline until interrupted. Returns Ok on clean shutdown.
pub async fn run(config: Config) -> Result<()> {
    let mut engine = Engine::new(config.clone())?;
    initialize_engine(&mut engine).await?;

    let (event_tx, mut event_rx) = broadcast::channel(16);
    let controller = Arc::new(Controller::new(event_tx, config.output.wait_for_enter));

    // Interrupt signal stops the pipeline from any state.
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping");
                controller.stop().await;
            }
        });
    }

    tokio::spawn(async move {
        while let Ok(ControllerEvent::StateChanged(state)) = event_rx.recv().await {
            debug!(state = ?state, "Controller state changed");
        }
    });

    let cancel = controller.cancel_token();

    if controller.state().await == ControllerState::WaitingForStart {
        eprintln!("Press Enter to start listening (Ctrl-C to quit)...");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = lines.next_line() => {
                let _ = controller.begin_listening().await;
            }
        }
    }

    if controller.state().await != ControllerState::Listening {
        info!("Stopped before listening began");
        return Ok(());
    }

    let mut sink = OutputSink::new(config.output.destination);
    let result = engine
        .run_loop(cancel, |text| {
            if let Err(e) = sink.deliver(text) {
                warn!(error = %e, "Failed to deliver transcription");
            }
        })
        .await;

    controller.stop().await;
    info!("Stopped");
    result
}

/// Initialize the engine, showing a progress bar on stderr if the model has
/// to be downloaded first.
async fn initialize_engine(engine: &mut Engine) -> Result<()> {
    let progress = ProgressBar::hidden();
    progress.set_style(ProgressStyle::with_template(
        "{msg} [{bar:40}] {bytes}/{total_bytes} ({eta})",
    )?);
    progress.set_message("Downloading model");

    engine
        .initialize(|downloaded, total| {
            if progress.is_hidden() {
                progress.set_draw_target(ProgressDrawTarget::stderr());
            }
            progress.set_length(total);
            progress.set_position(downloaded);
        })
        .await?;

    progress.finish_and_clear();
    Ok(())
}
