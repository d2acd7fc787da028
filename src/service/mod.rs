//! Business logic layer

pub mod dispatch;

pub use dispatch::DispatchService;
