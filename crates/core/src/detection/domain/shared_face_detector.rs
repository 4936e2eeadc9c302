use std::sync::{Mutex, PoisonError};

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// One detector shared by every caller in the process.
///
/// Detection calls are serialized through a mutex; a poisoned lock is
/// recovered since the detector holds no state that a panic can tear.
pub struct SharedFaceDetector {
    inner: Mutex<Box<dyn FaceDetector>>,
}

impl SharedFaceDetector {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            inner: Mutex::new(detector),
        }
    }

    pub fn detect(&self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mut detector = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        detector.detect(frame)
    }
}
