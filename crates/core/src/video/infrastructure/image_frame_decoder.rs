use crate::shared::error::BoxError;
use crate::shared::frame::{Frame, PixelLayout};
use crate::video::domain::frame_decoder::FrameDecoder;

/// Decodes in-memory image payloads with the `image` crate.
///
/// The container format is sniffed from the payload; any alpha channel or
/// palette is flattened to RGB.
pub struct ImageFrameDecoder;

impl ImageFrameDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for ImageFrameDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, BoxError> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(rgb.into_raw(), width, height, PixelLayout::Rgb, 0))
    }
}
