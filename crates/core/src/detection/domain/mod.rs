pub mod face_detector;
pub mod shared_face_detector;
