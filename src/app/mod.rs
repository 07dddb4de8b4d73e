//! Application layer: command gateway, user-action controller and view rows

pub mod controller;
pub mod gateway;
pub mod views;

pub use controller::Controller;
pub use gateway::CommandGateway;
pub use views::{Highlight, RecommendationRow};
