pub mod face_compositor;
