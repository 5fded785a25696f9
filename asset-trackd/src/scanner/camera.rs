use std::time::{Duration, Instant};
use image::GrayImage;
use tokio_util::sync::CancellationToken;
use crate::config::ScannerConfig;
use super::{decode_luma, ScanError, ScanOutcome};

/// A stream of frames from a capture device.
pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the device stops delivering frames
    fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError> {
        (**self).next_frame()
    }
}

/// Opens the capture device for one scan. Runs on the blocking thread that
/// owns the scan, so the returned source never crosses threads.
pub type OpenCamera =
    dyn Fn(&ScannerConfig) -> Result<Box<dyn FrameSource>, ScanError> + Send + Sync;

/// Pull frames until one decodes, the stream ends, `cancel` fires or `timeout`
/// elapses. The source is consumed, so the device is released on every exit.
pub fn scan_frames<S: FrameSource>(
    mut source: S,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<ScanOutcome, ScanError> {
    // Too large to represent means no deadline
    let deadline = Instant::now().checked_add(timeout);
    let mut frames = 0u64;

    let outcome = loop {
        if cancel.is_cancelled() {
            break ScanOutcome::Cancelled;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break ScanOutcome::TimedOut;
        }

        match source.next_frame()? {
            Some(frame) => {
                frames += 1;
                if let Some(payload) = decode_luma(&frame) {
                    break ScanOutcome::Decoded(payload);
                }
            }
            None => break ScanOutcome::NoDetection,
        }
    };

    tracing::debug!("Scan finished after {} frames: {:?}", frames, outcome);
    Ok(outcome)
}

/// Blocking entry point for a live scan: open a camera with `open` and scan it.
/// Call from a blocking thread; the camera never leaves it.
pub fn scan_camera(
    open: &OpenCamera,
    config: &ScannerConfig,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, ScanError> {
    let camera = open(config)?;
    scan_frames(camera, cancel, Duration::from_secs(config.timeout_secs))
}

/// The configured capture device
#[cfg(feature = "camera")]
pub fn open_camera(config: &ScannerConfig) -> Result<Box<dyn FrameSource>, ScanError> {
    let camera = device::CameraSource::open(config.camera_index)?;
    Ok(Box::new(camera))
}

#[cfg(not(feature = "camera"))]
pub fn open_camera(config: &ScannerConfig) -> Result<Box<dyn FrameSource>, ScanError> {
    tracing::warn!(
        "Live scan requested for camera {} but camera support is not compiled in",
        config.camera_index
    );
    Err(ScanError::CameraUnavailable)
}

#[cfg(feature = "camera")]
mod device {
    use image::{GrayImage, Luma};
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;
    use super::{FrameSource, ScanError};

    pub struct CameraSource {
        camera: Camera,
    }

    impl CameraSource {
        pub fn open(index: u32) -> Result<Self, ScanError> {
            let format =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera = Camera::new(CameraIndex::Index(index), format)
                .map_err(|e| ScanError::Camera(e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| ScanError::Camera(e.to_string()))?;

            tracing::info!("Opened camera {}", index);
            Ok(Self { camera })
        }
    }

    impl FrameSource for CameraSource {
        fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError> {
            let buffer = match self.camera.frame() {
                Ok(buffer) => buffer,
                Err(e) => {
                    tracing::warn!("Camera read failed: {}", e);
                    return Ok(None);
                }
            };
            let rgb = buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| ScanError::Camera(e.to_string()))?;

            // ITU-R BT.601 luma
            let (width, height) = rgb.dimensions();
            Ok(Some(GrayImage::from_fn(width, height, |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
                Luma([luma as u8])
            })))
        }
    }

    impl Drop for CameraSource {
        fn drop(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                tracing::warn!("Failed to stop camera stream: {}", e);
            }
            tracing::info!("Released camera");
        }
    }
}
