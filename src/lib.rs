//! bicho_tracker Library
//!
//! Front-end coordination layer for a jogo do bicho results tracker: it
//! talks to a backend process over a narrow RPC bridge, guards duplicate
//! fetches, follows backend progress events and renders through a
//! toolkit-agnostic shell.

pub mod app;
pub mod bridge;
pub mod common;
pub mod config;
pub mod session;
pub mod shell;

// Re-export commonly used types
pub use app::{CommandGateway, Controller, Highlight, RecommendationRow};
pub use bridge::{BackendCommand, HttpBridge, ReconnectPolicy};
pub use common::errors::{AppError, Result};
pub use common::traits::{Bridge, FileFilter, SaveDialog, UiShell};
pub use common::types::{
    BettingHouse, DatabaseInfo, Group, HouseSelection, LossSequenceRecommendation, Notice,
    NoticeKind,
};
pub use config::types::AppConfig;
pub use session::{InFlightSet, LoadingIndicator, ProgressListener, SessionContext};
