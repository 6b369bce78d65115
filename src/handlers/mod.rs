pub mod event_handler;
pub mod thread_create;
