//! Image acquisition from a camera stream or a user-supplied file
//!
//! Both paths end in a single [`EncodedImage`](crate::domain::EncodedImage) per scan attempt.
//! Camera streams are exclusively owned by [`CameraCapture`] and released on every exit path.

pub mod camera;
pub mod file;
pub mod snapshot;

pub use crate::domain::FacingMode;
pub use camera::{CameraCapture, CameraDevice, StreamHandle, VideoStream, encode_jpeg};
pub use file::FileSource;
pub use snapshot::SnapshotCamera;
