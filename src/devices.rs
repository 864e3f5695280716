//! Capture device registry
//!
//! Enumerates video input devices through the platform boundary and tracks
//! the user's selection. Enumeration never starts capture; acquiring a
//! stream for the selected device is the stream manager's job.

use crate::errors::SessionError;
use crate::platform::MediaPlatform;
use crate::types::{CaptureDevice, DeviceKind};
use std::sync::Arc;

/// Registry of video input devices plus the current selection
///
/// The device list is refreshed only on demand and may go stale between
/// refreshes. An empty `selected_id` means no selection has been made yet.
pub struct DeviceRegistry {
    platform: Arc<dyn MediaPlatform>,
    devices: Vec<CaptureDevice>,
    selected: String,
    last_error: Option<String>,
}

impl DeviceRegistry {
    pub fn new(platform: Arc<dyn MediaPlatform>) -> Self {
        Self {
            platform,
            devices: Vec::new(),
            selected: String::new(),
            last_error: None,
        }
    }

    /// Re-enumerate video input devices.
    ///
    /// On the first successful non-empty enumeration the first device
    /// becomes the default selection. On failure the previous list and
    /// selection are kept and the error signal is set.
    pub async fn refresh(&mut self) -> Result<Vec<CaptureDevice>, SessionError> {
        match self.platform.enumerate_devices().await {
            Ok(all) => {
                self.devices = all
                    .into_iter()
                    .filter(|d| d.kind == DeviceKind::VideoInput)
                    .collect();
                log::info!("Found {} video input devices", self.devices.len());
                for device in &self.devices {
                    log::debug!("Device: {} ({})", device.id, device.display_label());
                }

                if self.selected.is_empty() {
                    if let Some(first) = self.devices.first() {
                        self.selected = first.id.clone();
                        log::info!("Defaulting selection to first device: {}", self.selected);
                    }
                }

                self.last_error = None;
                Ok(self.devices.clone())
            }
            Err(e) => {
                log::error!("Failed to enumerate devices: {}", e);
                self.last_error = Some("Unable to access media devices.".to_string());
                Err(e)
            }
        }
    }

    /// Select a device by id.
    ///
    /// Any id is accepted, including ids absent from the last enumeration.
    /// An invalid id surfaces as a stream acquisition failure later.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        log::debug!("Device selected: {}", id);
        self.selected = id;
    }

    pub fn selected_id(&self) -> &str {
        &self.selected
    }

    pub fn devices(&self) -> &[CaptureDevice] {
        &self.devices
    }

    /// User-visible message from the most recent failed refresh, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockMediaPlatform;

    fn platform_with_cams(ids: &[&str]) -> Arc<MockMediaPlatform> {
        let platform = MockMediaPlatform::new();
        for id in ids {
            platform.add_video_device(id, &format!("Camera {}", id));
        }
        Arc::new(platform)
    }

    #[tokio::test]
    async fn test_refresh_defaults_to_first_device() {
        let platform = platform_with_cams(&["camA", "camB"]);
        let mut registry = DeviceRegistry::new(platform);

        let devices = registry.refresh().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(registry.selected_id(), "camA");
    }

    #[tokio::test]
    async fn test_refresh_keeps_existing_selection() {
        let platform = platform_with_cams(&["camA", "camB"]);
        let mut registry = DeviceRegistry::new(platform);

        registry.select("camB");
        registry.refresh().await.unwrap();
        assert_eq!(registry.selected_id(), "camB");
    }

    #[tokio::test]
    async fn test_refresh_filters_non_video_devices() {
        let platform = MockMediaPlatform::new();
        platform.add_video_device("camA", "Camera A");
        platform.add_device(CaptureDevice::new("mic0", "Mic", DeviceKind::AudioInput));
        let mut registry = DeviceRegistry::new(Arc::new(platform));

        let devices = registry.refresh().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "camA");
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_error_signal() {
        let platform = MockMediaPlatform::new();
        platform.deny_enumeration("permission denied");
        let mut registry = DeviceRegistry::new(Arc::new(platform));

        let result = registry.refresh().await;
        assert!(matches!(result, Err(SessionError::DeviceAccess(_))));
        assert_eq!(registry.last_error(), Some("Unable to access media devices."));
        assert_eq!(registry.selected_id(), "");
    }

    #[tokio::test]
    async fn test_error_signal_cleared_on_success() {
        let platform = platform_with_cams(&["camA"]);
        platform.deny_enumeration("transient failure");
        let mut registry = DeviceRegistry::new(platform.clone());

        assert!(registry.refresh().await.is_err());
        assert!(registry.last_error().is_some());

        platform.allow_enumeration();
        registry.refresh().await.unwrap();
        assert!(registry.last_error().is_none());
    }

    #[tokio::test]
    async fn test_empty_enumeration_leaves_no_selection() {
        let platform = Arc::new(MockMediaPlatform::new());
        let mut registry = DeviceRegistry::new(platform);

        let devices = registry.refresh().await.unwrap();
        assert!(devices.is_empty());
        assert_eq!(registry.selected_id(), "");
    }
}
