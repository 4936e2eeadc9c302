pub mod capture_device;
pub mod frame_decoder;
pub mod frame_encoder;
