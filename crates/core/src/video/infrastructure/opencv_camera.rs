use opencv::core::{Mat, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::shared::error::BoxError;
use crate::shared::frame::{Frame, PixelLayout};
use crate::video::domain::capture_device::{CaptureDevice, CaptureSource};

/// Opens a local camera by index through OpenCV's `VideoCapture`.
pub struct OpencvCameraSource {
    index: i32,
}

impl OpencvCameraSource {
    pub fn new(index: i32) -> Self {
        Self { index }
    }
}

impl CaptureSource for OpencvCameraSource {
    fn open(&self) -> Result<Box<dyn CaptureDevice>, BoxError> {
        log::info!("Opening camera {}", self.index);
        let mut capture = VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(format!("camera {} could not be opened", self.index).into());
        }
        // Keep at most one queued frame so reads return the newest image.
        if let Err(e) = capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0) {
            log::debug!("Camera {} ignored buffer size hint: {e}", self.index);
        }
        Ok(Box::new(OpencvCamera {
            capture,
            next_index: 0,
        }))
    }
}

/// An open OpenCV camera. Frames leave this adapter in RGB order.
pub struct OpencvCamera {
    capture: VideoCapture,
    next_index: usize,
}

impl CaptureDevice for OpencvCamera {
    fn read(&mut self) -> Result<Option<Frame>, BoxError> {
        let mut mat = Mat::default();
        if !self.capture.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }
        let frame = bgr_mat_to_frame(&mat, self.next_index)?;
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release camera: {e}");
        }
    }
}

/// Copies an 8-bit BGR `Mat` into an RGB frame.
fn bgr_mat_to_frame(mat: &Mat, index: usize) -> Result<Frame, BoxError> {
    if mat.typ() != CV_8UC3 {
        return Err(format!("unsupported camera pixel type {}", mat.typ()).into());
    }
    let continuous;
    let mat = if mat.is_continuous() {
        mat
    } else {
        continuous = mat.try_clone()?;
        &continuous
    };
    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let bgr = Frame::new(mat.data_bytes()?.to_vec(), width, height, PixelLayout::Bgr, index);
    Ok(bgr.to_layout(PixelLayout::Rgb))
}
