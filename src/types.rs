//! Core data types shared across the session controllers.

use serde::{Deserialize, Serialize};

/// Kind of media device reported by the platform boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// A capture device as enumerated by the platform
///
/// Immutable once obtained. The list a device came from may go stale;
/// callers re-enumerate on demand rather than mutating entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDevice {
    /// Opaque platform identifier
    pub id: String,
    /// Human-readable label shown in device pickers
    pub label: String,
    /// Device kind; the registry only keeps video inputs
    pub kind: DeviceKind,
}

impl CaptureDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    /// Label with a fallback for platforms that return empty labels
    /// before capture permission is granted.
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("Camera {}", self.id)
        } else {
            self.label.clone()
        }
    }
}

/// Readiness of the external voice-conversation service
///
/// Owned and reported by the service; this crate only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceConnectionState {
    Idle,
    Connecting,
    Open,
    Closed,
}

impl std::fmt::Display for VoiceConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceConnectionState::Idle => write!(f, "idle"),
            VoiceConnectionState::Connecting => write!(f, "connecting"),
            VoiceConnectionState::Open => write!(f, "open"),
            VoiceConnectionState::Closed => write!(f, "closed"),
        }
    }
}

/// Countdown timer snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whole seconds left on the countdown
    pub remaining_secs: u32,
    /// True while the 1 Hz tick task is decrementing
    pub running: bool,
}

impl TimerState {
    pub fn stopped(remaining_secs: u32) -> Self {
        Self {
            remaining_secs,
            running: false,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::stopped(0)
    }
}

/// A request handed to the routing collaborator on successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Target view identifier, e.g. "main"
    pub target: String,
    /// Query parameters in serialization order
    pub query: Vec<(String, String)>,
}

impl NavigationRequest {
    /// Look up a query parameter by key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_fallback() {
        let unnamed = CaptureDevice::new("cam7", "", DeviceKind::VideoInput);
        assert_eq!(unnamed.display_label(), "Camera cam7");

        let named = CaptureDevice::new("cam7", "FaceTime HD", DeviceKind::VideoInput);
        assert_eq!(named.display_label(), "FaceTime HD");
    }

    #[test]
    fn test_voice_state_display() {
        assert_eq!(VoiceConnectionState::Open.to_string(), "open");
        assert_eq!(VoiceConnectionState::Connecting.to_string(), "connecting");
    }

    #[test]
    fn test_navigation_query_lookup() {
        let req = NavigationRequest {
            target: "main".to_string(),
            query: vec![("scenarios".to_string(), "Introduction".to_string())],
        };
        assert_eq!(req.query_value("scenarios"), Some("Introduction"));
        assert_eq!(req.query_value("missing"), None);
    }

    #[test]
    fn test_timer_state_default_is_stopped_zero() {
        let state = TimerState::default();
        assert_eq!(state.remaining_secs, 0);
        assert!(!state.running);
    }
}
