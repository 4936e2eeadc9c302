use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::shared::constants::DEFAULT_JPEG_QUALITY;
use crate::shared::error::BoxError;
use crate::shared::frame::{Frame, PixelLayout};
use crate::video::domain::frame_encoder::FrameEncoder;

/// Encodes frames as baseline JPEG using the `image` crate.
///
/// BGR frames are converted to RGB first; grayscale frames stay single-channel.
pub struct JpegFrameEncoder {
    quality: u8,
}

impl JpegFrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, BoxError> {
        if frame.is_empty() {
            return Err("cannot encode an empty frame".into());
        }

        let (pixels, color) = match frame.layout() {
            PixelLayout::Gray => (frame.clone(), ExtendedColorType::L8),
            PixelLayout::Rgb | PixelLayout::Bgr => {
                (frame.to_layout(PixelLayout::Rgb), ExtendedColorType::Rgb8)
            }
        };

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality).write_image(
            pixels.data(),
            frame.width(),
            frame.height(),
            color,
        )?;
        Ok(buf)
    }

    fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}
