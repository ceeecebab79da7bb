use std::{
    sync::{mpsc, Arc, RwLock},
    thread,
    time::{Instant, SystemTime},
};

use crate::{
    cv::{Matrix, CV},
    image::Image,
    model::Model,
    monitor::{AlertKind, AlertState, FrameObservation, Monitor},
    setting::Config,
    sync::Worker,
    upload::CaptureSink,
};

type SharedTexture = Arc<RwLock<Option<eframe::egui::TextureHandle>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProctorStatus {
    Initializing,
    Running,
    /// The camera feed itself is down. Deliberately not an alert channel:
    /// a dead feed must not read as the candidate looking away.
    FeedUnavailable,
    Error(String),
}

enum Control {
    Terminate,
}

/// Owns the tick loop thread: samples the feed once per tick, runs the
/// detector, advances the monitor, and hands confirmed captures to the
/// upload worker. Dropping it terminates the loop and cancels every
/// outstanding confirmation.
pub struct Proctor {
    status: Arc<RwLock<ProctorStatus>>,
    alert: Arc<RwLock<AlertState>>,
    control: mpsc::Sender<Control>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Proctor {
    #[tracing::instrument(name = "Starting proctor", skip_all)]
    pub fn start(config: &Config, texture: SharedTexture) -> Self {
        let status = Arc::new(RwLock::new(ProctorStatus::Initializing));
        let alert = Arc::new(RwLock::new(AlertState::default()));
        let (control, control_rx) = mpsc::channel();

        let thread = {
            let config = config.clone();
            let (status, alert) = (Arc::clone(&status), Arc::clone(&alert));
            thread::Builder::new()
                .name("proctor_tick_loop".into())
                .spawn(move || run_loop(config, control_rx, status, alert, texture))
                .unwrap_or_else(|err| panic!("Failed to spawn proctor thread: {}", err))
        };

        Self {
            status,
            alert,
            control,
            thread: Some(thread),
        }
    }

    pub fn status(&self) -> ProctorStatus {
        match self.status.read() {
            Ok(status) => status.clone(),
            Err(err) => ProctorStatus::Error(err.to_string()),
        }
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert.read().map(|alert| *alert).unwrap_or_default()
    }
}

impl Drop for Proctor {
    fn drop(&mut self) {
        tracing::info!("Sending terminate message to proctor tick loop");
        let _ = self.control.send(Control::Terminate);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_loop(
    config: Config,
    control: mpsc::Receiver<Control>,
    status: Arc<RwLock<ProctorStatus>>,
    alert: Arc<RwLock<AlertState>>,
    texture: SharedTexture,
) {
    // ticking only starts once the feed is live and the model is loaded
    let mut cv = match CV::new(&config.camera) {
        Ok(cv) => cv,
        Err(err) => {
            tracing::error!(error = %err, "failed to open capture device");
            set_status(&status, ProctorStatus::Error(err.to_string()));
            return;
        }
    };
    let model = match Model::new(&config.model) {
        Ok(model) => model,
        Err(err) => {
            tracing::error!(error = %err, "failed to load detection model");
            set_status(&status, ProctorStatus::Error(err.to_string()));
            return;
        }
    };
    let sink = crate::upload::from_config(&config.upload);
    let upload_worker = Worker::new("capture_upload_worker".into());
    let mut monitor = Monitor::new(config.monitor);
    set_status(&status, ProctorStatus::Running);

    loop {
        match control.recv_timeout(config.monitor.tick_interval()) {
            Ok(Control::Terminate) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        let frame = sample_frame(&mut cv, &status, &texture);
        let observation = frame.as_ref().and_then(|frame| match model.detect(frame) {
            Ok(faces) => Some(FrameObservation::from(faces.as_slice())),
            Err(err) => {
                // observation unavailable, not "no face": channel state is
                // preserved for this tick
                tracing::warn!(error = %err, "detector failed, skipping signal update");
                None
            }
        });

        let fired = monitor.tick(observation.as_ref(), now);
        if let Ok(mut guard) = alert.write() {
            *guard = monitor.alert_state();
        }
        for kind in fired {
            dispatch_capture(kind, frame.as_ref(), &mut cv, &sink, &upload_worker);
        }
    }

    monitor.reset();
    tracing::info!("Proctor tick loop stopped");
}

fn set_status(status: &Arc<RwLock<ProctorStatus>>, next: ProctorStatus) {
    if let Ok(mut guard) = status.write() {
        if *guard != next {
            tracing::info!(status = ?next, "proctor status changed");
            *guard = next;
        }
    }
}

fn sample_frame(
    cv: &mut CV,
    status: &Arc<RwLock<ProctorStatus>>,
    texture: &SharedTexture,
) -> Option<Matrix> {
    if !cv.is_ready() {
        set_status(status, ProctorStatus::FeedUnavailable);
        return None;
    }
    match cv.get_frame() {
        Ok(frame) => {
            if let Ok(mut guard) = texture.write() {
                if let Some(handle) = guard.as_mut() {
                    handle.set(eframe::egui::ImageData::from(&frame), Default::default());
                }
            }
            set_status(status, ProctorStatus::Running);
            Some(frame)
        }
        Err(err) => {
            tracing::warn!(error = %err, "frame source unavailable, skipping tick");
            set_status(status, ProctorStatus::FeedUnavailable);
            None
        }
    }
}

fn dispatch_capture(
    kind: AlertKind,
    frame: Option<&Matrix>,
    cv: &mut CV,
    sink: &Arc<dyn CaptureSink>,
    worker: &Worker,
) {
    let snapshot = match frame {
        Some(frame) => frame.clone(),
        // confirmation came due on a tick with no sampled frame; try once
        None => match cv.get_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(?kind, error = %err, "no frame available for capture");
                return;
            }
        },
    };

    let sink = Arc::clone(sink);
    let taken_at = SystemTime::now();
    let sent = worker.send(move || {
        let result = Image::from(&snapshot)
            .encode_jpeg()
            .and_then(|bytes| sink.upload(&bytes, "image/jpeg", taken_at));
        match result {
            Ok(_) => tracing::info!(?kind, "capture dispatched"),
            Err(err) => tracing::warn!(?kind, error = %err, "capture failed"),
        }
    });
    if let Err(err) = sent {
        tracing::warn!(?kind, error = %err, "capture worker unavailable");
    }
}
