//! Voice session controller
//!
//! Wraps the external voice-conversation service behind a single toggle.
//! The service owns its readiness state; this controller only reads it and
//! issues connect/disconnect requests.

use crate::errors::SessionError;
use crate::types::VoiceConnectionState;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// External voice-conversation service boundary
#[async_trait]
pub trait VoiceService: Send + Sync {
    /// Open the voice connection. Completes asynchronously; on failure the
    /// service settles back to a non-open state on its own.
    async fn connect(&self) -> Result<(), SessionError>;

    /// Close the voice connection. Fire-and-forget.
    fn disconnect(&self);

    /// Current readiness as reported by the service.
    fn ready_state(&self) -> VoiceConnectionState;
}

/// Which control the UI should present for the voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceAffordance {
    StartSession,
    EndSession,
}

impl std::fmt::Display for VoiceAffordance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceAffordance::StartSession => write!(f, "Start Session"),
            VoiceAffordance::EndSession => write!(f, "End Session"),
        }
    }
}

/// Toggles the voice connection based on the externally reported state
///
/// While a connect is in flight, further toggles are no-ops; two rapid
/// toggles from idle issue exactly one connect request. Connect failures
/// are logged and absorbed, never retried automatically.
pub struct VoiceSessionController {
    service: Arc<dyn VoiceService>,
    connect_in_flight: Arc<AtomicBool>,
}

impl VoiceSessionController {
    pub fn new(service: Arc<dyn VoiceService>) -> Self {
        Self {
            service,
            connect_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Connect when not open, disconnect when open.
    pub fn toggle(&self) {
        match self.service.ready_state() {
            VoiceConnectionState::Open => {
                log::info!("Voice session open, disconnecting");
                self.service.disconnect();
            }
            VoiceConnectionState::Connecting => {
                log::debug!("Connect already in flight, ignoring toggle");
            }
            VoiceConnectionState::Idle | VoiceConnectionState::Closed => {
                // The service may still report idle for a moment after we
                // issue connect; the local flag closes that window.
                if self
                    .connect_in_flight
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    log::debug!("Connect already in flight, ignoring toggle");
                    return;
                }

                log::info!("Starting voice session");
                let service = self.service.clone();
                let in_flight = self.connect_in_flight.clone();
                tokio::spawn(async move {
                    if let Err(e) = service.connect().await {
                        // The service settles to a non-open state itself.
                        log::warn!("Voice connect failed: {}", e);
                    }
                    in_flight.store(false, Ordering::SeqCst);
                });
            }
        }
    }

    pub fn ready_state(&self) -> VoiceConnectionState {
        self.service.ready_state()
    }

    /// OPEN maps to the end-session control, everything else to start.
    pub fn affordance(&self) -> VoiceAffordance {
        match self.service.ready_state() {
            VoiceConnectionState::Open => VoiceAffordance::EndSession,
            _ => VoiceAffordance::StartSession,
        }
    }
}
