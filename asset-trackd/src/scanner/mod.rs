//! QR detection for uploaded images and live camera frames.
//!
//! Decoding itself is delegated to `rqrr`; this module only adapts inputs to
//! greyscale frames and drives the camera loop.

pub mod camera;
pub mod decode;

use thiserror::Error;

pub use camera::{open_camera, scan_camera, OpenCamera};
pub use decode::{decode_image_bytes, decode_luma};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("no camera available")]
    CameraUnavailable,

    #[cfg_attr(not(feature = "camera"), allow(dead_code))]
    #[error("camera error: {0}")]
    Camera(String),
}

/// How a live scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First QR payload seen, trimmed
    Decoded(String),
    /// The frame stream ended without a readable code
    NoDetection,
    Cancelled,
    TimedOut,
}
