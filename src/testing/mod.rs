//! Testing utilities for podium
//!
//! Scripted doubles for the two external collaborators, so controllers can
//! be exercised without camera hardware or a live voice service. Used by
//! the crate's own tests and available to downstream integration tests.

use crate::errors::SessionError;
use crate::platform::{MediaPlatform, MediaStream};
use crate::types::{CaptureDevice, DeviceKind, VoiceConnectionState};
use crate::voice::VoiceService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted platform media boundary
///
/// Streams handed out are recorded (sharing track liveness), so tests can
/// assert exactly which streams were released and when.
pub struct MockMediaPlatform {
    devices: Mutex<Vec<CaptureDevice>>,
    enumeration_denied: Mutex<Option<String>>,
    open_delays: Mutex<HashMap<String, Duration>>,
    open_denied: Mutex<HashMap<String, String>>,
    opened: Mutex<Vec<MediaStream>>,
    open_count: AtomicUsize,
}

impl MockMediaPlatform {
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(Vec::new()),
            enumeration_denied: Mutex::new(None),
            open_delays: Mutex::new(HashMap::new()),
            open_denied: Mutex::new(HashMap::new()),
            opened: Mutex::new(Vec::new()),
            open_count: AtomicUsize::new(0),
        }
    }

    pub fn add_device(&self, device: CaptureDevice) {
        self.devices.lock().expect("lock poisoned").push(device);
    }

    pub fn add_video_device(&self, id: &str, label: &str) {
        self.add_device(CaptureDevice::new(id, label, DeviceKind::VideoInput));
    }

    /// Make enumeration fail with the given platform message.
    pub fn deny_enumeration(&self, message: &str) {
        *self.enumeration_denied.lock().expect("lock poisoned") = Some(message.to_string());
    }

    pub fn allow_enumeration(&self) {
        *self.enumeration_denied.lock().expect("lock poisoned") = None;
    }

    /// Delay stream acquisition for one device, to model an in-flight
    /// acquisition being superseded.
    pub fn delay_open(&self, device_id: &str, delay: Duration) {
        self.open_delays
            .lock()
            .expect("lock poisoned")
            .insert(device_id.to_string(), delay);
    }

    /// Make acquisition fail for one device, e.g. a revoked permission.
    pub fn deny_open(&self, device_id: &str, message: &str) {
        self.open_denied
            .lock()
            .expect("lock poisoned")
            .insert(device_id.to_string(), message.to_string());
    }

    /// Total number of open_stream calls observed.
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    /// Every stream handed out for a device, release state included.
    pub fn streams_for(&self, device_id: &str) -> Vec<MediaStream> {
        self.opened
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|s| s.device_id() == device_id)
            .cloned()
            .collect()
    }

    /// Streams handed out that have not been released yet.
    pub fn live_stream_count(&self) -> usize {
        self.opened
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|s| s.is_live())
            .count()
    }
}

impl Default for MockMediaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaPlatform for MockMediaPlatform {
    async fn enumerate_devices(&self) -> Result<Vec<CaptureDevice>, SessionError> {
        if let Some(message) = self.enumeration_denied.lock().expect("lock poisoned").clone() {
            return Err(SessionError::DeviceAccess(message));
        }
        Ok(self.devices.lock().expect("lock poisoned").clone())
    }

    async fn open_stream(
        &self,
        device_id: &str,
        with_audio: bool,
    ) -> Result<MediaStream, SessionError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .open_delays
            .lock()
            .expect("lock poisoned")
            .get(device_id)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self
            .open_denied
            .lock()
            .expect("lock poisoned")
            .get(device_id)
            .cloned()
        {
            return Err(SessionError::StreamAcquisition(message));
        }

        let known = self
            .devices
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|d| d.id == device_id);
        if !known {
            return Err(SessionError::StreamAcquisition(format!(
                "unknown device: {}",
                device_id
            )));
        }

        let stream = MediaStream::new(device_id, with_audio);
        self.opened
            .lock()
            .expect("lock poisoned")
            .push(stream.clone());
        Ok(stream)
    }
}

/// Scripted voice-conversation service
///
/// Connect transitions through CONNECTING and settles to OPEN, or to CLOSED
/// when scripted to fail. State can also be forced directly.
pub struct MockVoiceService {
    state: Mutex<VoiceConnectionState>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    connect_delay: Mutex<Option<Duration>>,
    fail_next: Mutex<Option<String>>,
}

impl MockVoiceService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(VoiceConnectionState::Idle),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            connect_delay: Mutex::new(None),
            fail_next: Mutex::new(None),
        }
    }

    pub fn set_ready_state(&self, state: VoiceConnectionState) {
        *self.state.lock().expect("lock poisoned") = state;
    }

    /// Hold connect in the CONNECTING state for the given duration.
    pub fn delay_connect(&self, delay: Duration) {
        *self.connect_delay.lock().expect("lock poisoned") = Some(delay);
    }

    /// Make the next connect attempt fail and settle to CLOSED.
    pub fn fail_next_connect(&self, message: &str) {
        *self.fail_next.lock().expect("lock poisoned") = Some(message.to_string());
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockVoiceService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceService for MockVoiceService {
    async fn connect(&self) -> Result<(), SessionError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().expect("lock poisoned") = VoiceConnectionState::Connecting;

        let delay = *self.connect_delay.lock().expect("lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.fail_next.lock().expect("lock poisoned").take() {
            *self.state.lock().expect("lock poisoned") = VoiceConnectionState::Closed;
            return Err(SessionError::Connection(message));
        }

        *self.state.lock().expect("lock poisoned") = VoiceConnectionState::Open;
        Ok(())
    }

    fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().expect("lock poisoned") = VoiceConnectionState::Closed;
    }

    fn ready_state(&self) -> VoiceConnectionState {
        *self.state.lock().expect("lock poisoned")
    }
}
