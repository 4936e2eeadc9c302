pub mod face_swap_service;
pub mod frame_pipeline;
pub mod infrastructure;
pub mod region_filter;
pub mod stream_driver;
