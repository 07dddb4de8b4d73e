//! Capability traits at the seams of the coordination layer

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::errors::Result;
use super::types::{BettingHouse, Group, Notice};
use crate::app::views::RecommendationRow;

/// Narrow RPC boundary to the backend process
///
/// The backend owns all ingestion, persistence and statistics; this layer
/// only issues named commands and listens to pushed events.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Issue a command and wait for it to settle
    ///
    /// # Arguments
    /// * `command` - Backend command name, e.g. `get_group`
    /// * `args` - JSON object with the command's named arguments
    async fn invoke(&self, command: &str, args: Value) -> Result<Value>;

    /// Subscribe to an event channel pushed by the backend
    ///
    /// The returned receiver yields every payload published on `event`
    /// until the bridge shuts down.
    async fn listen(&self, event: &str) -> Result<mpsc::Receiver<Value>>;
}

/// Presentation capabilities used by the controller
///
/// Implementations render however they like; the coordination logic never
/// touches a concrete toolkit.
pub trait UiShell: Send + Sync {
    /// Fill the house selector
    fn populate_houses(&self, houses: &[BettingHouse]);

    /// Show the table header: row count and last-update label
    fn show_database_info(&self, total_rows: i64, last_update: &str);

    /// Replace the group table
    fn render_groups(&self, groups: &[Group]);

    /// Replace the recommendation table
    fn render_recommendations(&self, rows: &[RecommendationRow]);

    /// Put up an indeterminate loading indicator
    fn show_loading(&self, message: &str);

    /// Remove the most recent loading indicator, if any
    fn hide_loading(&self);

    /// Switch the active indicator from spinner to determinate bar
    fn show_progress_bar(&self);

    /// Update the determinate bar
    fn set_progress(&self, percent: u8);

    /// Show a transient notice
    fn notify(&self, notice: &Notice);
}

/// File type filter offered by the save dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn csv() -> Self {
        Self {
            name: "CSV Files".to_string(),
            extensions: vec!["csv".to_string()],
        }
    }
}

/// Host-provided save-file dialog
#[cfg_attr(test, mockall::automock)]
pub trait SaveDialog: Send + Sync {
    /// Ask the user for a destination; `None` when the dialog is dismissed
    fn save_path(&self, default_name: &str, filter: &FileFilter) -> Result<Option<PathBuf>>;
}
