use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_JPEG_QUALITY, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

/// Cascade scan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest face edge in pixels; `None` keeps the classifier default.
    pub min_face_size: Option<u32>,
    pub max_face_size: Option<u32>,
    /// Drop detections overlapping an earlier one by more than this IoU.
    /// `None` keeps every raw detection.
    pub dedup_iou: Option<f64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_face_size: None,
            max_face_size: None,
            dedup_iou: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceSwapConfig {
    pub detection: DetectionConfig,
    pub camera_index: i32,
    pub jpeg_quality: u8,
}

impl Default for FaceSwapConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            camera_index: DEFAULT_CAMERA_INDEX,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FaceSwapConfig {
    /// Reads a JSON config file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_cascade_parameters() {
        let config = FaceSwapConfig::default();
        assert_relative_eq!(config.detection.scale_factor, 1.1);
        assert_eq!(config.detection.min_neighbors, 4);
        assert!(config.detection.min_face_size.is_none());
        assert!(config.detection.dedup_iou.is_none());
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.jpeg_quality, 95);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FaceSwapConfig =
            serde_json::from_str(r#"{"detection": {"min_neighbors": 6}, "jpeg_quality": 80}"#)
                .unwrap();
        assert_eq!(config.detection.min_neighbors, 6);
        assert_relative_eq!(config.detection.scale_factor, 1.1);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.camera_index, 0);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faceswap.json");
        fs::write(&path, r#"{"camera_index": 2, "detection": {"dedup_iou": 0.3}}"#).unwrap();

        let config = FaceSwapConfig::from_json_file(&path).unwrap();
        assert_eq!(config.camera_index, 2);
        assert_eq!(config.detection.dedup_iou, Some(0.3));
    }

    #[test]
    fn test_from_json_file_missing_returns_error() {
        assert!(FaceSwapConfig::from_json_file(Path::new("/nonexistent/faceswap.json")).is_err());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let mut config = FaceSwapConfig::default();
        config.detection.max_face_size = Some(300);
        let json = serde_json::to_string(&config).unwrap();
        let back: FaceSwapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
