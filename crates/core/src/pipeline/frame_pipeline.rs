use std::sync::Arc;
use std::time::Instant;

use crate::compositing::domain::face_compositor::FaceCompositor;
use crate::detection::domain::shared_face_detector::SharedFaceDetector;
use crate::pipeline::region_filter::filter_regions;
use crate::shared::frame::Frame;
use crate::source::source_face_store::SourceFaceStore;

/// Result of running one frame through the pipeline.
#[derive(Debug)]
pub struct ProcessedFrame {
    pub frame: Frame,
    pub regions_swapped: usize,
    /// True when the input came back untouched because there was no source
    /// face or a stage failed.
    pub passthrough: bool,
}

impl ProcessedFrame {
    fn passthrough(frame: Frame) -> Self {
        Self {
            frame,
            regions_swapped: 0,
            passthrough: true,
        }
    }
}

/// Per-frame orchestration: detect → filter → composite every region.
///
/// Never fails. A frame that cannot be processed is returned as it came in,
/// so a live feed keeps flowing even when detection or blending breaks.
pub struct FramePipeline {
    detector: Arc<SharedFaceDetector>,
    compositor: Box<dyn FaceCompositor>,
    source: Arc<SourceFaceStore>,
    dedup_iou: Option<f64>,
}

impl FramePipeline {
    pub fn new(
        detector: Arc<SharedFaceDetector>,
        compositor: Box<dyn FaceCompositor>,
        source: Arc<SourceFaceStore>,
        dedup_iou: Option<f64>,
    ) -> Self {
        Self {
            detector,
            compositor,
            source,
            dedup_iou,
        }
    }

    pub fn process(&self, frame: Frame) -> ProcessedFrame {
        let Some(source) = self.source.current() else {
            return ProcessedFrame::passthrough(frame);
        };

        let t0 = Instant::now();
        let regions = match self.detector.detect(&frame) {
            Ok(raw) => filter_regions(&raw, self.dedup_iou),
            Err(e) => {
                log::warn!("Detection failed on frame {}, passing through: {e}", frame.index());
                return ProcessedFrame::passthrough(frame);
            }
        };
        let detect_ms = t0.elapsed().as_secs_f64() * 1000.0;

        if regions.is_empty() {
            log::debug!("frame {}: no faces (detect {detect_ms:.1}ms)", frame.index());
            return ProcessedFrame {
                frame,
                regions_swapped: 0,
                passthrough: false,
            };
        }

        let t1 = Instant::now();
        let mut working = frame.clone();
        for region in &regions {
            if let Err(e) = self
                .compositor
                .composite(&mut working, region, source.image())
            {
                log::warn!(
                    "Compositing failed on frame {} at {region:?}, passing through: {e}",
                    frame.index()
                );
                return ProcessedFrame::passthrough(frame);
            }
        }
        log::debug!(
            "frame {}: {} face(s) (detect {detect_ms:.1}ms, composite {:.1}ms)",
            frame.index(),
            regions.len(),
            t1.elapsed().as_secs_f64() * 1000.0
        );

        ProcessedFrame {
            frame: working,
            regions_swapped: regions.len(),
            passthrough: false,
        }
    }
}
