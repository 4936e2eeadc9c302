use std::path::Path;

use crate::compositing::infrastructure::seamless_compositor::SeamlessCompositor;
use crate::detection::infrastructure::haar_cascade_detector::HaarCascadeDetector;
use crate::pipeline::face_swap_service::FaceSwapService;
use crate::shared::config::FaceSwapConfig;
use crate::video::infrastructure::image_frame_decoder::ImageFrameDecoder;
use crate::video::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;
use crate::video::infrastructure::opencv_camera::OpencvCameraSource;

/// Wires the OpenCV-backed service: Haar cascade detection, seamless
/// compositing, `image`-crate codecs and a local camera.
///
/// The camera is not opened until the stream is started.
pub fn create_service(
    cascade_path: &Path,
    config: &FaceSwapConfig,
) -> Result<FaceSwapService, Box<dyn std::error::Error>> {
    let detector = HaarCascadeDetector::new(cascade_path, config.detection.clone())?;
    log::info!(
        "Face swap service ready (camera={}, jpeg_quality={}, dedup_iou={:?})",
        config.camera_index,
        config.jpeg_quality,
        config.detection.dedup_iou
    );
    Ok(FaceSwapService::new(
        Box::new(detector),
        Box::new(SeamlessCompositor::new()),
        Box::new(ImageFrameDecoder::new()),
        Box::new(JpegFrameEncoder::new(config.jpeg_quality)),
        Box::new(OpencvCameraSource::new(config.camera_index)),
        config.detection.dedup_iou,
    ))
}
