//! Live face swapping: detect faces in camera or uploaded frames and blend a
//! stored source face over each of them.

pub mod compositing;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod source;
pub mod video;
