/// Live camera capture
///
/// The camera flow is an explicit state machine:
///
/// ```text
/// Idle ──open──▶ Requesting ──ok──▶ Live ──capture──▶ Captured
///   ▲                │                │
///   │              error            cancel / frame error
///   │                ▼                ▼
///   └──dismiss──── Error ◀──────── (Idle or Error)
/// ```
///
/// Whatever path leaves `Live`, the stream's tracks are stopped exactly
/// once through `release()`, so the device is never left locked.
use image::RgbaImage;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task;
use tracing::{info, warn};

use super::photo::{photo_from_frame, LoadedPhoto};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera access was denied")]
    PermissionDenied,

    #[error("No camera available")]
    NoDevice,

    #[error("Camera stream failed: {0}")]
    Stream(String),

    #[error("Could not encode the captured frame: {0}")]
    Encode(String),

    #[error("The camera is not live")]
    NotLive,
}

/// An exclusively held video stream
pub trait VideoStream: Send {
    /// Grab the most recent frame
    fn frame(&mut self) -> Result<RgbaImage, CaptureError>;

    /// Stop every track and release the underlying device
    fn stop_tracks(&mut self);
}

/// Something that can hand out video streams (a webcam, a test fake)
pub trait CaptureDevice: Send + Sync {
    /// Acquire an exclusive stream. May block on a permission prompt.
    fn open(&self) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// A stream in transit from the acquisition task to the session.
///
/// Messages must be `Clone`, so the stream travels in a shared slot
/// that the receiver empties exactly once.
#[derive(Clone)]
pub struct StreamHandle(Arc<Mutex<Option<Box<dyn VideoStream>>>>);

impl StreamHandle {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        Self(Arc::new(Mutex::new(Some(stream))))
    }

    /// Take the stream out of the slot. Later calls return `None`.
    pub fn take(&self) -> Option<Box<dyn VideoStream>> {
        match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Acquire a stream off the UI thread
pub async fn request_stream(device: Arc<dyn CaptureDevice>) -> Result<StreamHandle, CaptureError> {
    task::spawn_blocking(move || device.open().map(StreamHandle::new))
        .await
        .map_err(|e| CaptureError::Stream(format!("Task join error: {}", e)))?
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Requesting,
    Live,
    Captured,
    Error(String),
}

/// Owns the camera state and, while live, the stream itself
pub struct CameraSession {
    state: CameraState,
    stream: Option<Box<dyn VideoStream>>,
    /// Last frame shown in the live preview
    last_frame: Option<RgbaImage>,
}

impl Default for CameraSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSession {
    pub fn new() -> Self {
        Self {
            state: CameraState::Idle,
            stream: None,
            last_frame: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == CameraState::Live
    }

    /// Whether the camera overlay should be shown
    pub fn is_open(&self) -> bool {
        matches!(self.state, CameraState::Requesting | CameraState::Live)
    }

    /// Move to `Requesting`. Returns false if a request or stream is
    /// already active, in which case no new acquisition should start.
    pub fn begin_request(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        info!("📷 Requesting camera access");
        self.last_frame = None;
        self.state = CameraState::Requesting;
        true
    }

    /// Handle the outcome of an acquisition.
    ///
    /// A stream that arrives after the request was cancelled is
    /// released immediately.
    pub fn stream_ready(&mut self, result: Result<StreamHandle, CaptureError>) {
        let stream = result.map(|handle| handle.take());

        if self.state != CameraState::Requesting {
            if let Ok(Some(mut late)) = stream {
                info!("📷 Releasing camera stream that arrived after cancel");
                late.stop_tracks();
            }
            return;
        }

        match stream {
            Ok(Some(stream)) => {
                info!("📷 Camera live");
                self.stream = Some(stream);
                self.state = CameraState::Live;
            }
            Ok(None) => {
                self.fail(CaptureError::Stream("stream was already taken".to_string()));
            }
            Err(e) => {
                warn!("⚠️  Could not access the camera: {}", e);
                self.fail(e);
            }
        }
    }

    /// Refresh the live preview frame. A failing stream moves to `Error`.
    pub fn poll_frame(&mut self) -> Option<&RgbaImage> {
        let stream = self.stream.as_mut()?;
        match stream.frame() {
            Ok(frame) => {
                self.last_frame = Some(frame);
                self.last_frame.as_ref()
            }
            Err(e) => {
                warn!("⚠️  Camera frame failed: {}", e);
                self.fail(e);
                None
            }
        }
    }

    /// Freeze the current frame into a `photo.png` asset and release the
    /// device. The caller installs the returned photo.
    pub fn capture(&mut self, preview_size: u32) -> Result<LoadedPhoto, CaptureError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(CaptureError::NotLive);
        };

        let frame = match stream.frame() {
            Ok(frame) => frame,
            Err(e) => match self.last_frame.take() {
                Some(frame) => frame,
                None => {
                    self.fail(e.clone());
                    return Err(e);
                }
            },
        };

        let result = photo_from_frame(frame, preview_size)
            .map_err(|e| CaptureError::Encode(e.to_string()));
        self.release();

        match result {
            Ok(photo) => {
                info!("📸 Captured camera frame ({} bytes)", photo.asset.bytes.len());
                self.state = CameraState::Captured;
                self.last_frame = None;
                Ok(photo)
            }
            Err(e) => {
                self.state = CameraState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Abandon the camera without touching the photo
    pub fn cancel(&mut self) {
        info!("📷 Camera cancelled");
        self.release();
        self.last_frame = None;
        self.state = CameraState::Idle;
    }

    /// Clear an error so the camera can be opened again
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, CameraState::Error(_)) {
            self.state = CameraState::Idle;
        }
    }

    fn fail(&mut self, error: CaptureError) {
        self.release();
        self.last_frame = None;
        self.state = CameraState::Error(error.to_string());
    }

    /// Stop all tracks of the held stream, if any
    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            info!("📷 Camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("state", &self.state)
            .field("holding_stream", &self.stream.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counters shared between a fake device and the test
    #[derive(Default)]
    pub struct Tracks {
        pub opened: AtomicUsize,
        pub stopped: AtomicUsize,
    }

    impl Tracks {
        pub fn stopped(&self) -> usize {
            self.stopped.load(Ordering::SeqCst)
        }

        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }
    }

    pub struct FakeStream {
        tracks: Arc<Tracks>,
        fail_frames: bool,
    }

    impl VideoStream for FakeStream {
        fn frame(&mut self) -> Result<RgbaImage, CaptureError> {
            if self.fail_frames {
                return Err(CaptureError::Stream("unplugged".to_string()));
            }
            Ok(RgbaImage::from_pixel(8, 6, Rgba([90, 160, 220, 255])))
        }

        fn stop_tracks(&mut self) {
            self.tracks.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct FakeDevice {
        pub tracks: Arc<Tracks>,
        pub refuse: Option<CaptureError>,
        pub fail_frames: bool,
    }

    impl FakeDevice {
        pub fn working() -> Self {
            Self {
                tracks: Arc::new(Tracks::default()),
                refuse: None,
                fail_frames: false,
            }
        }

        pub fn refusing(error: CaptureError) -> Self {
            Self {
                refuse: Some(error),
                ..Self::working()
            }
        }
    }

    impl CaptureDevice for FakeDevice {
        fn open(&self) -> Result<Box<dyn VideoStream>, CaptureError> {
            if let Some(e) = &self.refuse {
                return Err(e.clone());
            }
            self.tracks.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                tracks: self.tracks.clone(),
                fail_frames: self.fail_frames,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeDevice;
    use super::*;

    async fn live_session(device: Arc<FakeDevice>) -> CameraSession {
        let mut camera = CameraSession::new();
        assert!(camera.begin_request());
        camera.stream_ready(request_stream(device).await);
        camera
    }

    #[tokio::test]
    async fn test_capture_stops_tracks() {
        let device = Arc::new(FakeDevice::working());
        let mut camera = live_session(device.clone()).await;
        assert!(camera.is_live());
        assert!(camera.poll_frame().is_some());

        let photo = camera.capture(64).unwrap();
        assert_eq!(photo.asset.file_name, "photo.png");
        assert_eq!(photo.asset.mime_type, "image/png");
        assert_eq!(camera.state(), &CameraState::Captured);
        assert_eq!(device.tracks.stopped(), 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_tracks() {
        let device = Arc::new(FakeDevice::working());
        let mut camera = live_session(device.clone()).await;

        camera.cancel();
        assert_eq!(camera.state(), &CameraState::Idle);
        assert_eq!(device.tracks.stopped(), 1);
        assert_eq!(camera.capture(64), Err(CaptureError::NotLive));
    }

    #[tokio::test]
    async fn test_denied_access_reports_error() {
        let device = Arc::new(FakeDevice::refusing(CaptureError::PermissionDenied));
        let mut camera = live_session(device.clone()).await;

        assert_eq!(
            camera.state(),
            &CameraState::Error("Camera access was denied".to_string())
        );
        assert_eq!(device.tracks.opened(), 0);

        camera.dismiss_error();
        assert!(camera.begin_request());
    }

    #[tokio::test]
    async fn test_stream_after_cancel_is_released() {
        let device = Arc::new(FakeDevice::working());
        let mut camera = CameraSession::new();
        assert!(camera.begin_request());
        camera.cancel();

        camera.stream_ready(request_stream(device.clone()).await);
        assert_eq!(camera.state(), &CameraState::Idle);
        assert_eq!(device.tracks.opened(), 1);
        assert_eq!(device.tracks.stopped(), 1);
    }

    #[tokio::test]
    async fn test_frame_failure_releases_device() {
        let device = Arc::new(FakeDevice {
            fail_frames: true,
            ..FakeDevice::working()
        });
        let mut camera = live_session(device.clone()).await;

        assert!(camera.poll_frame().is_none());
        assert!(matches!(camera.state(), CameraState::Error(_)));
        assert_eq!(device.tracks.stopped(), 1);
    }

    #[tokio::test]
    async fn test_second_request_while_live_is_refused() {
        let device = Arc::new(FakeDevice::working());
        let mut camera = live_session(device.clone()).await;
        assert!(!camera.begin_request());
        assert!(camera.is_live());
    }

    #[tokio::test]
    async fn test_drop_releases_live_stream() {
        let device = Arc::new(FakeDevice::working());
        let camera = live_session(device.clone()).await;
        drop(camera);
        assert_eq!(device.tracks.stopped(), 1);
    }

    #[test]
    fn test_stream_handle_takes_once() {
        let device = FakeDevice::working();
        let handle = StreamHandle::new(device.open().unwrap());
        let copy = handle.clone();
        assert!(handle.take().is_some());
        assert!(copy.take().is_none());
    }
}
