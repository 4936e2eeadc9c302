pub mod service_factory;
pub mod threaded_stream_worker;
