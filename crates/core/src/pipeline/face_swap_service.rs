use std::sync::Arc;

use crate::compositing::domain::face_compositor::FaceCompositor;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::shared_face_detector::SharedFaceDetector;
use crate::pipeline::frame_pipeline::FramePipeline;
use crate::pipeline::infrastructure::threaded_stream_worker::StreamWorker;
use crate::pipeline::stream_driver::{FrameStream, StreamDriver};
use crate::shared::error::FaceSwapError;
use crate::shared::frame::Frame;
use crate::source::source_face_store::{SourceFace, SourceFaceStore};
use crate::video::domain::capture_device::CaptureSource;
use crate::video::domain::frame_decoder::FrameDecoder;
use crate::video::domain::frame_encoder::FrameEncoder;

/// Control surface for face swapping: source face management, one-shot frame
/// processing and the live stream.
///
/// All methods take `&self`; share the service across threads with `Arc`.
pub struct FaceSwapService {
    decoder: Box<dyn FrameDecoder>,
    encoder: Arc<dyn FrameEncoder>,
    detector: Arc<SharedFaceDetector>,
    source: Arc<SourceFaceStore>,
    pipeline: Arc<FramePipeline>,
    driver: Arc<StreamDriver>,
}

impl FaceSwapService {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        compositor: Box<dyn FaceCompositor>,
        decoder: Box<dyn FrameDecoder>,
        encoder: Box<dyn FrameEncoder>,
        capture: Box<dyn CaptureSource>,
        dedup_iou: Option<f64>,
    ) -> Self {
        let detector = Arc::new(SharedFaceDetector::new(detector));
        let source = Arc::new(SourceFaceStore::new());
        let pipeline = Arc::new(FramePipeline::new(
            detector.clone(),
            compositor,
            source.clone(),
            dedup_iou,
        ));
        Self {
            decoder,
            encoder: Arc::from(encoder),
            detector,
            source,
            pipeline,
            driver: Arc::new(StreamDriver::new(capture)),
        }
    }

    pub fn load_source_face(&self, bytes: &[u8]) -> Result<Arc<SourceFace>, FaceSwapError> {
        self.source.load(bytes, &*self.decoder, &self.detector)
    }

    pub fn clear_source_face(&self) {
        self.source.clear();
    }

    pub fn has_source_face(&self) -> bool {
        self.source.current().is_some()
    }

    /// Decodes an image, swaps faces and returns the result in the encoder's
    /// format. Pipeline failures fall back to the unmodified image.
    pub fn process_frame(&self, bytes: &[u8]) -> Result<Vec<u8>, FaceSwapError> {
        let frame = self.decoder.decode(bytes).map_err(FaceSwapError::Decode)?;
        let processed = self.process(frame);
        self.encoder
            .encode(&processed)
            .map_err(FaceSwapError::Encode)
    }

    pub fn process(&self, frame: Frame) -> Frame {
        self.pipeline.process(frame).frame
    }

    pub fn start_stream(&self) -> Result<(), FaceSwapError> {
        self.driver.start()
    }

    pub fn stop_stream(&self) -> Result<(), FaceSwapError> {
        self.driver.stop()
    }

    pub fn is_streaming(&self) -> bool {
        self.driver.is_running()
    }

    /// A pull-based stream over the current session. Ends at once if the
    /// stream has not been started.
    pub fn stream(&self) -> FrameStream {
        FrameStream::new(
            self.driver.clone(),
            self.pipeline.clone(),
            self.encoder.clone(),
        )
    }

    /// Runs [`stream`](Self::stream) on a dedicated thread.
    pub fn spawn_stream(&self) -> StreamWorker {
        StreamWorker::spawn(self.stream())
    }

    pub fn mime_type(&self) -> &'static str {
        self.encoder.mime_type()
    }
}
