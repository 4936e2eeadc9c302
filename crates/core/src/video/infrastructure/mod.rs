pub mod image_frame_decoder;
pub mod jpeg_frame_encoder;
pub mod mjpeg_writer;
pub mod opencv_camera;
