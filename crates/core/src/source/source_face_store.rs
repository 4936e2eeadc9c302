use std::sync::{Arc, PoisonError, RwLock};

use crate::detection::domain::shared_face_detector::SharedFaceDetector;
use crate::shared::error::FaceSwapError;
use crate::shared::frame::Frame;
use crate::video::domain::frame_decoder::FrameDecoder;

/// A validated source image: the whole decoded picture, known to contain at
/// least one face.
#[derive(Debug)]
pub struct SourceFace {
    image: Frame,
    face_count: usize,
}

impl SourceFace {
    pub fn image(&self) -> &Frame {
        &self.image
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }
}

/// Holds the current source face.
///
/// The image and its validity are published together as one `Arc`, so a
/// reader sees either the previous face or the new one, never a mix.
#[derive(Default)]
pub struct SourceFaceStore {
    current: RwLock<Option<Arc<SourceFace>>>,
}

impl SourceFaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes`, checks it contains a face, and makes it the current
    /// source face. On any error the previous face stays in place.
    pub fn load(
        &self,
        bytes: &[u8],
        decoder: &dyn FrameDecoder,
        detector: &SharedFaceDetector,
    ) -> Result<Arc<SourceFace>, FaceSwapError> {
        let image = decoder.decode(bytes).map_err(FaceSwapError::Decode)?;
        let regions = detector
            .detect(&image)
            .map_err(|e| FaceSwapError::Detection(e.to_string()))?;
        if regions.is_empty() {
            log::info!(
                "Rejected source image {}x{}: no face found",
                image.width(),
                image.height()
            );
            return Err(FaceSwapError::NoFaceDetected);
        }

        let face = Arc::new(SourceFace {
            image,
            face_count: regions.len(),
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(face.clone());

        log::info!(
            "Loaded source face {}x{} ({} face(s))",
            face.image.width(),
            face.image.height(),
            face.face_count
        );
        Ok(face)
    }

    pub fn current(&self) -> Option<Arc<SourceFace>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
