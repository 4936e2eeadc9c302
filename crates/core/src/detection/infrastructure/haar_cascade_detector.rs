use std::path::Path;

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::config::DetectionConfig;
use crate::shared::frame::{Frame, PixelLayout};
use crate::shared::opencv_mat::frame_to_mat;
use crate::shared::region::Region;

/// Frontal-face detector backed by an OpenCV Haar cascade.
///
/// Converts each frame to a grayscale plane and runs the classifier's
/// multi-scale sliding-window scan. Region order is whatever the classifier
/// reports; it is not sorted and not stable across frames.
pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    config: DetectionConfig,
}

impl HaarCascadeDetector {
    /// Loads a cascade XML file (e.g. `haarcascade_frontalface_default.xml`).
    ///
    /// Rejects scan parameters the classifier would refuse on every frame:
    /// `scale_factor` must exceed 1.0 and `min_neighbors` must not be negative.
    pub fn new(
        cascade_path: &Path,
        config: DetectionConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        validate(&config)?;
        let path = cascade_path
            .to_str()
            .ok_or("cascade path is not valid UTF-8")?;
        let classifier = CascadeClassifier::new(path)?;
        if classifier.empty()? {
            return Err(format!("failed to load cascade from {}", cascade_path.display()).into());
        }
        log::debug!(
            "Loaded cascade {} (scale_factor={}, min_neighbors={})",
            cascade_path.display(),
            config.scale_factor,
            config.min_neighbors
        );
        Ok(Self { classifier, config })
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        let gray = gray_mat(frame)?;
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            self.config.scale_factor,
            self.config.min_neighbors,
            0,
            square_size(self.config.min_face_size),
            square_size(self.config.max_face_size),
        )?;

        Ok(faces
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

fn validate(config: &DetectionConfig) -> Result<(), String> {
    if config.scale_factor.is_nan() || config.scale_factor <= 1.0 {
        return Err(format!(
            "scale factor must be greater than 1.0, got {}",
            config.scale_factor
        ));
    }
    if config.min_neighbors < 0 {
        return Err(format!(
            "min neighbors must not be negative, got {}",
            config.min_neighbors
        ));
    }
    Ok(())
}

fn gray_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mat = frame_to_mat(frame)?;
    let code = match frame.layout() {
        PixelLayout::Gray => return Ok(mat),
        PixelLayout::Rgb => imgproc::COLOR_RGB2GRAY,
        PixelLayout::Bgr => imgproc::COLOR_BGR2GRAY,
    };
    let mut gray = Mat::default();
    // Default `dst_cn` and algorithm hint.
    imgproc::cvt_color_def(&mat, &mut gray, code)?;
    Ok(gray)
}

/// `Size::default()` (0x0) tells the classifier to use its own bound.
fn square_size(edge: Option<u32>) -> Size {
    edge.map_or_else(Size::default, |e| Size::new(e as i32, e as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_with_missing_cascade_returns_error() {
        let result = HaarCascadeDetector::new(
            Path::new("/nonexistent/haarcascade_frontalface_default.xml"),
            DetectionConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_with_invalid_cascade_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, "<opencv_storage></opencv_storage>").unwrap();
        assert!(HaarCascadeDetector::new(&path, DetectionConfig::default()).is_err());
    }

    #[rstest]
    #[case::scale_factor_one(1.0, 4)]
    #[case::scale_factor_below_one(0.9, 4)]
    #[case::scale_factor_nan(f64::NAN, 4)]
    #[case::negative_min_neighbors(1.1, -1)]
    fn test_new_rejects_invalid_scan_parameters(
        #[case] scale_factor: f64,
        #[case] min_neighbors: i32,
    ) {
        // The path is never read: parameters are checked before the cascade loads.
        let config = DetectionConfig {
            scale_factor,
            min_neighbors,
            ..DetectionConfig::default()
        };
        let err = HaarCascadeDetector::new(Path::new("/nonexistent/cascade.xml"), config)
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(
            message.contains("scale factor") || message.contains("min neighbors"),
            "{message}"
        );
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&DetectionConfig::default()).is_ok());
    }

    #[rstest]
    #[case::bgr(PixelLayout::Bgr, [0, 0, 255])]
    #[case::rgb(PixelLayout::Rgb, [255, 0, 0])]
    fn test_gray_mat_converts_by_layout(#[case] layout: PixelLayout, #[case] pixel: [u8; 3]) {
        // Pure red weighs 0.299 in BT.601 luma whichever order it is stored in.
        let frame = Frame::filled(6, 4, layout, &pixel);
        let mat = gray_mat(&frame).unwrap();
        assert_eq!((mat.rows(), mat.cols(), mat.channels()), (4, 6, 1));
        assert!(mat.data_bytes().unwrap().iter().all(|&v| v == 76));
    }

    #[test]
    fn test_gray_mat_passes_gray_frames_through() {
        let frame = Frame::filled(3, 3, PixelLayout::Gray, &[17]);
        let mat = gray_mat(&frame).unwrap();
        assert_eq!(mat.channels(), 1);
        assert!(mat.data_bytes().unwrap().iter().all(|&v| v == 17));
    }

    #[test]
    fn test_square_size() {
        assert_eq!(square_size(None), Size::new(0, 0));
        assert_eq!(square_size(Some(30)), Size::new(30, 30));
    }
}
