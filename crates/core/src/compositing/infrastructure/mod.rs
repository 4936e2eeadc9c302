mod pixel_ops;
pub mod seamless_compositor;
