//! Podium: session control for live presentation capture
//!
//! This crate provides the session-control core of a live-presentation
//! voice-coaching application: device selection, capture stream lifecycle,
//! a countdown timer, and the voice-connection toggle.
//!
//! # Features
//! - Capture device enumeration with a default selection
//! - Safe stream acquisition across rapid device changes and teardown
//! - 1 Hz countdown timer with start/stop semantics
//! - Voice session toggle guarded against duplicate connects
//! - Scenario selection producing a navigation request for the router
//!
//! # Usage
//! ```rust,ignore
//! use podium::{PodiumConfig, PresentationSession};
//!
//! let config = PodiumConfig::load_from_file("podium.toml")?;
//! let session = PresentationSession::open(platform, voice, &config).await;
//! session.select_device("cam1").await?;
//! session.timer().set_duration(300)?;
//! session.timer().start()?;
//! ```
pub mod config;
pub mod devices;
pub mod errors;
pub mod platform;
pub mod selection;
pub mod session;
pub mod stream;
pub mod timer;
pub mod types;
pub mod voice;

// Testing utilities - scripted collaborator doubles for offline testing
pub mod testing;

// Re-exports for convenience
pub use config::PodiumConfig;
pub use errors::SessionError;
pub use devices::DeviceRegistry;
pub use platform::{MediaPlatform, MediaStream, StreamTrack, TrackKind};
pub use selection::SessionSelection;
pub use session::{PresentationSession, SessionStats};
pub use stream::{StreamManager, StreamStatus};
pub use timer::CountdownTimer;
pub use types::{
    CaptureDevice, DeviceKind, NavigationRequest, TimerState, VoiceConnectionState,
};
pub use voice::{VoiceAffordance, VoiceService, VoiceSessionController};

/// Initialize logging for the session core
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "podium=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "podium");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }
}
