//! Domain types

pub mod dispatch;
pub mod email;

pub use dispatch::*;
pub use email::*;
