use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by the one-shot control operations.
///
/// Per-frame failures inside the pipeline and stream never reach this type:
/// they degrade to passthrough or end-of-stream instead.
#[derive(Error, Debug)]
pub enum FaceSwapError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] BoxError),
    #[error("no face detected in the image")]
    NoFaceDetected,
    #[error("face detection failed: {0}")]
    Detection(String),
    #[error("failed to encode frame: {0}")]
    Encode(#[source] BoxError),
    #[error("capture device error: {0}")]
    Device(String),
}
