/// Photo acquisition module
///
/// This module handles:
/// - Loading user-selected photo files and building previews
/// - Live camera capture with guaranteed device release
/// - The platform webcam backend (behind the `native-camera` feature)

pub mod camera;
pub mod photo;

#[cfg(feature = "native-camera")]
pub mod native;

use std::sync::Arc;

use camera::{CaptureDevice, CaptureError, VideoStream};

/// Device used when no camera backend is compiled in
pub struct UnavailableDevice;

impl CaptureDevice for UnavailableDevice {
    fn open(&self) -> Result<Box<dyn VideoStream>, CaptureError> {
        Err(CaptureError::NoDevice)
    }
}

/// The capture device the app should use on this build
pub fn default_device() -> Arc<dyn CaptureDevice> {
    #[cfg(feature = "native-camera")]
    {
        Arc::new(native::NativeCamera::new(0))
    }

    #[cfg(not(feature = "native-camera"))]
    {
        Arc::new(UnavailableDevice)
    }
}
