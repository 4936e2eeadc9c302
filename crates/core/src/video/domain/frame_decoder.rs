use crate::shared::error::BoxError;
use crate::shared::frame::Frame;

/// Turns an encoded image payload (JPEG, PNG, ...) into a pixel frame.
///
/// Implementations must return frames in the canonical RGB layout.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, BoxError>;
}
