use crate::shared::error::BoxError;
use crate::shared::frame::Frame;

/// Encodes a frame into a self-contained image payload.
///
/// Each output must be decodable on its own; streams are sequences of such
/// payloads, not a container format.
pub trait FrameEncoder: Send + Sync {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, BoxError>;

    /// MIME type of the payloads produced by [`FrameEncoder::encode`].
    fn mime_type(&self) -> &'static str;
}
