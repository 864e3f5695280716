//! Platform media boundary
//!
//! The host platform owns device enumeration and stream acquisition. This
//! crate talks to it through [`MediaPlatform`] so the session controllers
//! stay testable without camera hardware.

use crate::errors::SessionError;
use crate::types::CaptureDevice;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Kind of track carried by a media stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// A single track within an acquired stream
///
/// Tracks are stopped at most once; repeated stops are no-ops. Clones share
/// the same liveness flag, which lets tests observe release from outside.
#[derive(Debug, Clone)]
pub struct StreamTrack {
    kind: TrackKind,
    live: Arc<AtomicBool>,
}

impl StreamTrack {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

/// An exclusively-owned capture stream bound to one device id
///
/// At most one live stream exists per stream manager. Releasing stops every
/// track; the handle itself carries no platform resources beyond them.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: Uuid,
    device_id: String,
    tracks: Vec<StreamTrack>,
}

impl MediaStream {
    /// Build a stream with one video track and, optionally, one audio track.
    pub fn new(device_id: impl Into<String>, with_audio: bool) -> Self {
        let mut tracks = vec![StreamTrack::new(TrackKind::Video)];
        if with_audio {
            tracks.push(StreamTrack::new(TrackKind::Audio));
        }
        Self {
            id: Uuid::new_v4(),
            device_id: device_id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn tracks(&self) -> &[StreamTrack] {
        &self.tracks
    }

    /// True while at least one track is still live.
    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track. Idempotent.
    pub fn stop_tracks(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// Host capabilities required by the session core
///
/// Both operations suspend pending a platform response and may be denied by
/// the user. Implementations must not start capture during enumeration.
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// Enumerate attached media devices of every kind.
    async fn enumerate_devices(&self) -> Result<Vec<CaptureDevice>, SessionError>;

    /// Open a capture stream for the given device id, with audio when asked.
    async fn open_stream(
        &self,
        device_id: &str,
        with_audio: bool,
    ) -> Result<MediaStream, SessionError>;
}
