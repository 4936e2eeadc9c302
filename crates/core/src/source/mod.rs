pub mod source_face_store;
