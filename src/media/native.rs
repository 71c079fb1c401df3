/// Webcam backend built on nokhwa
///
/// nokhwa's camera handle is not `Send` on every platform, so each stream
/// owns a dedicated thread that holds the camera and answers frame
/// requests over a channel. Stopping the stream (or dropping it) ends the
/// thread, which closes the device.
use image::{DynamicImage, RgbImage, RgbaImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};
use std::sync::mpsc;
use std::thread;
use tracing::{info, warn};

use super::camera::{CaptureDevice, CaptureError, VideoStream};

pub struct NativeCamera {
    index: u32,
}

impl NativeCamera {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

enum Command {
    Frame(mpsc::Sender<Result<RgbaImage, CaptureError>>),
    Stop,
}

impl CaptureDevice for NativeCamera {
    fn open(&self) -> Result<Box<dyn VideoStream>, CaptureError> {
        let (commands, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        let index = self.index;

        thread::Builder::new()
            .name("camera".to_string())
            .spawn(move || run_camera(index, command_rx, ready_tx))
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| CaptureError::Stream("camera thread exited".to_string()))??;

        Ok(Box::new(NativeStream {
            commands,
            stopped: false,
        }))
    }
}

struct NativeStream {
    commands: mpsc::Sender<Command>,
    stopped: bool,
}

impl VideoStream for NativeStream {
    fn frame(&mut self) -> Result<RgbaImage, CaptureError> {
        if self.stopped {
            return Err(CaptureError::NotLive);
        }
        let (reply, response) = mpsc::channel();
        self.commands
            .send(Command::Frame(reply))
            .map_err(|_| CaptureError::Stream("camera thread exited".to_string()))?;
        response
            .recv()
            .map_err(|_| CaptureError::Stream("camera thread exited".to_string()))?
    }

    fn stop_tracks(&mut self) {
        if !self.stopped {
            self.stopped = true;
            let _ = self.commands.send(Command::Stop);
        }
    }
}

impl Drop for NativeStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

fn run_camera(
    index: u32,
    commands: mpsc::Receiver<Command>,
    ready: mpsc::Sender<Result<(), CaptureError>>,
) {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

    let mut camera = match Camera::new(CameraIndex::Index(index), requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(open_error(e)));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(open_error(e)));
        return;
    }

    info!("📷 Opened camera {}", index);
    let _ = ready.send(Ok(()));

    // A closed channel means the stream handle was dropped
    while let Ok(command) = commands.recv() {
        match command {
            Command::Frame(reply) => {
                let _ = reply.send(grab_frame(&mut camera));
            }
            Command::Stop => break,
        }
    }

    if let Err(e) = camera.stop_stream() {
        warn!("⚠️  Failed to stop camera stream: {}", e);
    }
}

fn grab_frame(camera: &mut Camera) -> Result<RgbaImage, CaptureError> {
    let buffer = camera
        .frame()
        .map_err(|e| CaptureError::Stream(e.to_string()))?;
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| CaptureError::Stream(e.to_string()))?;

    // Rebuild through raw bytes so nokhwa's image version never leaks out
    let (width, height) = (decoded.width(), decoded.height());
    let rgb = RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| CaptureError::Stream("frame size mismatch".to_string()))?;

    Ok(DynamicImage::ImageRgb8(rgb).to_rgba8())
}

fn open_error(error: NokhwaError) -> CaptureError {
    let message = error.to_string();
    if message.to_lowercase().contains("permission") {
        CaptureError::PermissionDenied
    } else {
        warn!("⚠️  Camera open failed: {}", message);
        CaptureError::NoDevice
    }
}
