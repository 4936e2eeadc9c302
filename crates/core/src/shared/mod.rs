pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod model_resolver;
pub mod opencv_mat;
pub mod region;
