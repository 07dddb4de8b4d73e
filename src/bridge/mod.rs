//! Bridge module - RPC boundary to the backend process

pub mod commands;
pub mod events;
pub mod http;

pub use commands::BackendCommand;
pub use http::{HttpBridge, ReconnectPolicy};
