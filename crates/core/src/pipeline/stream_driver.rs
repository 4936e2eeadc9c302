use std::iter::FusedIterator;
use std::sync::{Arc, Mutex, PoisonError};

use crate::pipeline::frame_pipeline::FramePipeline;
use crate::shared::error::FaceSwapError;
use crate::shared::frame::Frame;
use crate::video::domain::capture_device::{CaptureDevice, CaptureSource};
use crate::video::domain::frame_encoder::FrameEncoder;

/// Owns the live capture session.
///
/// Start, stop and reads all go through one mutex, so a frame is never read
/// from a device that another thread has already released.
pub struct StreamDriver {
    source: Box<dyn CaptureSource>,
    session: Mutex<Option<Box<dyn CaptureDevice>>>,
}

impl StreamDriver {
    pub fn new(source: Box<dyn CaptureSource>) -> Self {
        Self {
            source,
            session: Mutex::new(None),
        }
    }

    /// Opens the capture device. Does nothing if a session is already open.
    pub fn start(&self) -> Result<(), FaceSwapError> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.is_some() {
            return Ok(());
        }
        let device = self
            .source
            .open()
            .map_err(|e| FaceSwapError::Device(e.to_string()))?;
        *session = Some(device);
        log::info!("Stream started");
        Ok(())
    }

    /// Releases the capture device. Stopping a stopped driver is a no-op.
    pub fn stop(&self) -> Result<(), FaceSwapError> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut device) = session.take() {
            device.release();
            log::info!("Stream stopped");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Reads the next frame, or `None` when stopped or when the device has
    /// nothing to give. A failed read leaves the session open.
    pub fn read_frame(&self) -> Option<Frame> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let device = session.as_mut()?;
        match device.read() {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                log::warn!("Capture device returned no frame");
                None
            }
            Err(e) => {
                log::warn!("Capture read failed: {e}");
                None
            }
        }
    }
}

impl Drop for StreamDriver {
    fn drop(&mut self) {
        let session = self
            .session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(mut device) = session.take() {
            device.release();
        }
    }
}

/// One processed, encoded frame of a live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// Pull-based live stream: each `next()` reads one frame, runs it through
/// the pipeline and encodes it.
///
/// The first missing frame or encode failure ends the stream for good; call
/// [`StreamDriver::start`] and create a new stream to resume.
pub struct FrameStream {
    driver: Arc<StreamDriver>,
    pipeline: Arc<FramePipeline>,
    encoder: Arc<dyn FrameEncoder>,
    finished: bool,
}

impl FrameStream {
    pub fn new(
        driver: Arc<StreamDriver>,
        pipeline: Arc<FramePipeline>,
        encoder: Arc<dyn FrameEncoder>,
    ) -> Self {
        Self {
            driver,
            pipeline,
            encoder,
            finished: false,
        }
    }
}

impl Iterator for FrameStream {
    type Item = EncodedFrame;

    fn next(&mut self) -> Option<EncodedFrame> {
        if self.finished {
            return None;
        }
        let Some(frame) = self.driver.read_frame() else {
            self.finished = true;
            log::info!("Stream ended");
            return None;
        };

        let index = frame.index();
        let processed = self.pipeline.process(frame);
        match self.encoder.encode(&processed.frame) {
            Ok(bytes) => Some(EncodedFrame { index, bytes }),
            Err(e) => {
                log::warn!("Failed to encode frame {index}, ending stream: {e}");
                self.finished = true;
                None
            }
        }
    }
}

impl FusedIterator for FrameStream {}
