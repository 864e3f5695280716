//! Media stream manager
//!
//! Owns acquisition and release of the combined audio+video capture stream
//! for the selected device. At most one live stream is ever exposed to the
//! output sink; every transition into a new active stream releases the old
//! one first.

use crate::errors::SessionError;
use crate::platform::{MediaPlatform, MediaStream};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Observable snapshot of the manager's state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamStatus {
    /// Device id of the currently attached stream, if any
    pub active_device: Option<String>,
}

struct StreamInner {
    active: Option<MediaStream>,
    /// Bumped on every acquire and release. An acquisition that settles
    /// under a stale generation has been superseded and must release its
    /// stream instead of attaching it.
    generation: u64,
    last_error: Option<String>,
}

/// Acquires and releases capture streams for selected devices
///
/// State machine: NoStream, then Active(id) after a successful acquire,
/// then Active(id') after a later acquire for a different device, back to
/// NoStream on release or drop. Rapid successive device changes are safe:
/// a superseded acquisition releases its stream as soon as it settles.
pub struct StreamManager {
    platform: Arc<dyn MediaPlatform>,
    with_audio: bool,
    inner: Mutex<StreamInner>,
    status_tx: watch::Sender<StreamStatus>,
}

impl StreamManager {
    pub fn new(platform: Arc<dyn MediaPlatform>, with_audio: bool) -> Self {
        let (status_tx, _) = watch::channel(StreamStatus::default());
        Self {
            platform,
            with_audio,
            inner: Mutex::new(StreamInner {
                active: None,
                generation: 0,
                last_error: None,
            }),
            status_tx,
        }
    }

    /// Acquire a stream for `device_id`, releasing any previous stream.
    ///
    /// An empty id is a no-op (nothing selected yet). On failure for a new
    /// device the previously active stream stays attached as the
    /// last-known-safe state and the error signal is set.
    pub async fn acquire(&self, device_id: &str) -> Result<(), SessionError> {
        if device_id.is_empty() {
            log::debug!("No device selected, skipping acquisition");
            return Ok(());
        }

        let my_generation = {
            let mut inner = self.inner.lock().expect("lock poisoned");
            inner.generation += 1;
            inner.generation
        };

        log::info!("Acquiring stream for device: {}", device_id);
        let result = self.platform.open_stream(device_id, self.with_audio).await;

        let mut inner = self.inner.lock().expect("lock poisoned");
        if inner.generation != my_generation {
            // A newer acquire or a release happened while we were waiting.
            if let Ok(stream) = result {
                stream.stop_tracks();
                log::debug!("Released superseded stream for device: {}", device_id);
            }
            return Ok(());
        }

        match result {
            Ok(stream) => {
                if let Some(old) = inner.active.take() {
                    old.stop_tracks();
                    log::debug!("Released previous stream for device: {}", old.device_id());
                }
                log::info!("Stream {} active for device: {}", stream.id(), device_id);
                inner.active = Some(stream);
                inner.last_error = None;
                let _ = self.status_tx.send(StreamStatus {
                    active_device: Some(device_id.to_string()),
                });
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to acquire stream for {}: {}", device_id, e);
                inner.last_error = Some("Unable to access webcam and/or microphone.".to_string());
                Err(e)
            }
        }
    }

    /// Release the active stream. Idempotent.
    ///
    /// Also invalidates any acquisition still in flight, so a stream that
    /// settles after release is stopped instead of attached.
    pub fn release(&self) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.generation += 1;
        if let Some(stream) = inner.active.take() {
            stream.stop_tracks();
            log::info!("Released stream for device: {}", stream.device_id());
            let _ = self.status_tx.send(StreamStatus::default());
        }
    }

    /// Handle to the currently attached stream, for the output sink.
    pub fn active(&self) -> Option<MediaStream> {
        self.inner.lock().expect("lock poisoned").active.clone()
    }

    pub fn active_device_id(&self) -> Option<String> {
        let inner = self.inner.lock().expect("lock poisoned");
        inner.active.as_ref().map(|s| s.device_id().to_string())
    }

    /// User-visible message from the most recent failed acquisition, if any.
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().expect("lock poisoned").last_error.clone()
    }

    /// Subscribe to state changes. The rendering layer is a pure consumer.
    pub fn subscribe(&self) -> watch::Receiver<StreamStatus> {
        self.status_tx.subscribe()
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.release();
    }
}
