pub const CASCADE_MODEL_NAME: &str = "haarcascade_frontalface_default.xml";
pub const CASCADE_MODEL_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml";

/// Pyramid step between cascade scan scales.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;

/// Overlapping raw hits required before a candidate counts as a face.
pub const DEFAULT_MIN_NEIGHBORS: i32 = 4;

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Diagnostic outline drawn around every swapped region (RGB order).
pub const OUTLINE_COLOR_RGB: [u8; 3] = [0, 255, 0];
pub const OUTLINE_THICKNESS: u32 = 2;

pub const MJPEG_BOUNDARY: &str = "frame";
pub const MJPEG_MIME_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";
