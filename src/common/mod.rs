//! Shared types, errors and capability traits

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
