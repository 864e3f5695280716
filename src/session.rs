//! Presentation session scope
//!
//! Composes the device registry, stream manager, countdown timer, and voice
//! controller into one session whose resources are guaranteed to be
//! released on every exit path: explicit close, drop, or device change.

use crate::config::PodiumConfig;
use crate::devices::DeviceRegistry;
use crate::errors::SessionError;
use crate::platform::MediaPlatform;
use crate::stream::StreamManager;
use crate::timer::CountdownTimer;
use crate::types::{CaptureDevice, TimerState, VoiceConnectionState};
use crate::voice::{VoiceService, VoiceSessionController};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Snapshot of a session's state
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: f64,
    pub active_device: Option<String>,
    pub timer: TimerState,
    pub voice_state: VoiceConnectionState,
}

/// One live presentation session
///
/// Owns exactly one of each controller. Closing stops the timer, ends an
/// open voice session, and releases the capture stream; close is idempotent
/// and also runs on drop.
pub struct PresentationSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    registry: Mutex<DeviceRegistry>,
    streams: StreamManager,
    timer: CountdownTimer,
    voice: VoiceSessionController,
    closed: AtomicBool,
}

impl PresentationSession {
    /// Open a session: enumerate devices and, when configured, acquire the
    /// default device's stream.
    ///
    /// Enumeration and acquisition failures are surfaced through the error
    /// signal rather than failing the open; the user can reselect a device
    /// or retry from the session view.
    pub async fn open(
        platform: Arc<dyn MediaPlatform>,
        voice: Arc<dyn VoiceService>,
        config: &PodiumConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        log::info!("Opening presentation session {}", id);

        let mut registry = DeviceRegistry::new(platform.clone());
        let streams = StreamManager::new(platform, config.session.with_audio);
        let timer = CountdownTimer::new();
        let voice = VoiceSessionController::new(voice);

        if let Err(e) = registry.refresh().await {
            log::warn!("Device enumeration failed during open: {}", e);
        }

        if config.timer.default_duration_secs > 0 {
            // Timer is freshly created and not running; this cannot fail.
            let _ = timer.set_duration(config.timer.default_duration_secs);
        }

        if config.session.auto_acquire && !registry.selected_id().is_empty() {
            if let Err(e) = streams.acquire(registry.selected_id()).await {
                log::warn!("Initial stream acquisition failed: {}", e);
            }
        }

        Self {
            id,
            started_at: Utc::now(),
            registry: Mutex::new(registry),
            streams,
            timer,
            voice,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Select a device and re-acquire the stream, releasing the prior one.
    ///
    /// On acquisition failure the selection stays at the failed device and
    /// the previously active stream remains attached as last-known-safe.
    pub async fn select_device(&self, device_id: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        {
            let mut registry = self.registry.lock().await;
            registry.select(device_id);
        }
        self.streams.acquire(device_id).await
    }

    /// Re-enumerate devices through the registry.
    pub async fn refresh_devices(&self) -> Result<Vec<CaptureDevice>, SessionError> {
        self.ensure_open()?;
        let mut registry = self.registry.lock().await;
        registry.refresh().await
    }

    pub async fn devices(&self) -> Vec<CaptureDevice> {
        self.registry.lock().await.devices().to_vec()
    }

    pub async fn selected_device_id(&self) -> String {
        self.registry.lock().await.selected_id().to_string()
    }

    /// User-visible message from the most recent device or stream failure.
    pub async fn error_message(&self) -> Option<String> {
        if let Some(msg) = self.streams.last_error() {
            return Some(msg);
        }
        self.registry.lock().await.last_error().map(str::to_string)
    }

    pub fn streams(&self) -> &StreamManager {
        &self.streams
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn voice(&self) -> &VoiceSessionController {
        &self.voice
    }

    pub async fn stats(&self) -> SessionStats {
        let uptime = Utc::now().signed_duration_since(self.started_at);
        SessionStats {
            session_id: self.id,
            started_at: self.started_at,
            uptime_secs: uptime.num_milliseconds() as f64 / 1000.0,
            active_device: self.streams.active_device_id(),
            timer: self.timer.state(),
            voice_state: self.voice.ready_state(),
        }
    }

    /// Tear the session down. Idempotent; also runs on drop.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        log::info!("Closing presentation session {}", self.id);

        self.timer.stop();
        if self.voice.ready_state() == VoiceConnectionState::Open {
            self.voice.toggle();
        }
        self.streams.release();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::InvalidState(
                "session is closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for PresentationSession {
    fn drop(&mut self) {
        self.close();
    }
}
