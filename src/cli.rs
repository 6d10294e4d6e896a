use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analytics::load_metrics;
use crate::camera::backend::{CameraBackend, NullBackend};
use crate::camera::dummy::DummyBackend;
use crate::camera::error::CameraError;
use crate::config::{ConfigError, ConsoleConfig};
use crate::dispatch::capture::{
    CaptureError, CaptureSnapshot, RetrainOutcome, SAMPLES_PER_RECORDING,
};
use crate::events::EventSink;
use crate::gesture::{GestureName, ValidationError};
use crate::landmarks::detector::{DetectorConfig, DetectorFactory, HandDetector};
use crate::landmarks::dummy::DummyDetector;
use crate::library::{DeleteOutcome, GestureLibrary};
use crate::service::api::GestureApi;
use crate::service::client::ServiceClient;
use crate::service::error::ServiceError;
use crate::views::capture::CaptureView;
use crate::views::live::LiveView;
use crate::views::ViewContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Control surface for the gesture recognition service")]
pub struct Cli {
    /// JSON settings file; missing means defaults
    #[arg(long, env = "GESTURE_CONFIG", default_value = "gesture-console.json")]
    pub config: PathBuf,

    /// Base URL of the recognition service, overriding the settings file
    #[arg(long, env = "GESTURE_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Log filter, e.g. `debug` or `gesture_console=trace`; overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the camera feed live for a while
    Live {
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
    /// Record a set of training samples for a gesture
    Capture {
        #[arg(long)]
        label: String,
        /// Seconds to wait for a hand before giving up
        #[arg(long, default_value_t = 10)]
        arm_timeout: u64,
        /// Seconds allowed for the whole recording once it starts
        #[arg(long, default_value_t = 60)]
        record_timeout: u64,
        /// Ask the service to retrain once the samples are in
        #[arg(long)]
        retrain: bool,
    },
    /// List recognizable gestures
    Gestures,
    /// Delete a gesture and its samples
    Delete { name: String },
    /// Ask the service to retrain its model
    Retrain,
    /// Show model performance
    Metrics,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("{0}")]
    Refused(String),
    #[error("timed out {0}")]
    TimedOut(String),
    #[error("serialisation: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings file, then flags and environment on top.
pub fn resolve_config(cli: &Cli) -> Result<ConsoleConfig, AppError> {
    let mut config = ConsoleConfig::load(&cli.config)?;
    if let Some(url) = &cli.service_url {
        config.service_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Real camera integrations are not built in; `DUMMY_CAMERA=1` selects the
/// simulated one.
fn camera_backend() -> Arc<dyn CameraBackend> {
    if DummyBackend::is_enabled() {
        info!("using simulated camera");
        Arc::new(DummyBackend::new())
    } else {
        Arc::new(NullBackend)
    }
}

fn detector_factory() -> DetectorFactory {
    Arc::new(|config: &DetectorConfig| {
        Box::new(DummyDetector::new(config)) as Box<dyn HandDetector>
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn event_printer() -> EventSink {
    Arc::new(|event| match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("could not print event: {e}"),
    })
}

pub fn execute(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let api: Arc<dyn GestureApi> = Arc::new(ServiceClient::new(
        &config.service_url,
        config.request_timeout(),
    )?);
    let ctx = ViewContext {
        backend: camera_backend(),
        detectors: detector_factory(),
        api: Arc::clone(&api),
        runtime: runtime.handle().clone(),
        events: event_printer(),
        config,
    };

    runtime.block_on(async move {
        match cli.command {
            Command::Live { seconds } => run_live(&ctx, seconds).await,
            Command::Capture {
                label,
                arm_timeout,
                record_timeout,
                retrain,
            } => {
                let timeouts = CaptureTimeouts {
                    arm: Duration::from_secs(arm_timeout),
                    record: Duration::from_secs(record_timeout),
                };
                run_capture(&ctx, &label, timeouts, retrain).await
            }
            Command::Gestures => {
                let library = GestureLibrary::new(api);
                print_json(&library.refresh().await)
            }
            Command::Delete { name } => {
                let library = GestureLibrary::new(api);
                match library.delete(&name).await {
                    DeleteOutcome::Refused { message } => Err(AppError::Refused(message)),
                    outcome => {
                        info!(gesture = %name, ?outcome, "delete finished");
                        Ok(())
                    }
                }
            }
            Command::Retrain => {
                print_json(&RetrainOutcome::from_reply(api.train_now().await))
            }
            Command::Metrics => match load_metrics(api.as_ref()).await {
                Some(summary) => print_json(&summary),
                None => {
                    println!("No training data available.");
                    Ok(())
                }
            },
        }
    })
}

async fn run_live(ctx: &ViewContext, seconds: u64) -> Result<(), AppError> {
    let mut view = LiveView::mount(ctx);
    view.toggle()?;
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    view.toggle()?;
    view.settled().await;
    if let Some(stats) = view.feed_stats() {
        print_json(&stats)?;
    }
    print_json(&view.snapshot())?;
    view.unmount();
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct CaptureTimeouts {
    arm: Duration,
    record: Duration,
}

/// Poll the view until `done` holds. A lost camera fails the wait even when
/// `done` already holds, since losing the camera also ends the recording.
async fn wait_until(
    view: &CaptureView,
    timeout: Duration,
    what: &str,
    done: impl Fn(&CaptureSnapshot) -> bool,
) -> Result<(), AppError> {
    let deadline = Instant::now() + timeout;
    loop {
        if !view.camera_open() {
            return Err(CameraError::Stream(format!("camera went offline while {what}")).into());
        }
        if done(&view.snapshot()) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AppError::TimedOut(what.to_string()));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

async fn run_capture(
    ctx: &ViewContext,
    label: &str,
    timeouts: CaptureTimeouts,
    retrain: bool,
) -> Result<(), AppError> {
    let label = GestureName::parse(label)?;
    let mut view = CaptureView::mount(ctx, label);
    view.open_camera()?;

    wait_until(&view, timeouts.arm, "waiting for a hand", |s| s.armed).await?;
    view.start_recording()?;
    wait_until(&view, timeouts.record, "recording", |s| !s.recording).await?;
    view.settled().await;

    let snapshot = view.snapshot();
    print_json(&snapshot)?;
    if snapshot.frames_accepted < SAMPLES_PER_RECORDING {
        return Err(AppError::Refused(format!(
            "recording stopped after {} of {SAMPLES_PER_RECORDING} samples",
            snapshot.frames_accepted
        )));
    }

    if retrain {
        print_json(&view.request_retrain().await)?;
    }
    view.unmount();
    Ok(())
}

impl AppError {
    /// Text for the terminal, without raw payloads where a plainer one exists.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(e) => e.user_message().to_string(),
            Self::Camera(e) => e.user_message().to_string(),
            Self::Capture(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}
