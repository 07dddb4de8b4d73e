//! Session coordination: in-flight guard, loading indicator, progress listener
//! and the date policy behind draw-history fetches.

pub mod context;
pub mod dates;
pub mod guard;
pub mod loading;
pub mod progress;

pub use context::SessionContext;
pub use guard::{InFlightSet, InFlightTicket, INVALID_HOUSE_MESSAGE};
pub use loading::{LoadingGuard, LoadingIndicator, ProgressOutcome};
pub use progress::{clamp_percent, ProgressListener};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use crate::app::views::RecommendationRow;
    use crate::common::traits::UiShell;
    use crate::common::types::{BettingHouse, Group, Notice};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ShellCall {
        ShowLoading(String),
        HideLoading,
        ProgressBar,
        Progress(u8),
        Other,
    }

    /// Records loading-related calls for unit tests
    #[derive(Default)]
    pub struct TestShell {
        calls: Mutex<Vec<ShellCall>>,
    }

    impl TestShell {
        pub fn calls(&self) -> Vec<ShellCall> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: ShellCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl UiShell for TestShell {
        fn populate_houses(&self, _houses: &[BettingHouse]) {
            self.push(ShellCall::Other);
        }
        fn show_database_info(&self, _total_rows: i64, _last_update: &str) {
            self.push(ShellCall::Other);
        }
        fn render_groups(&self, _groups: &[Group]) {
            self.push(ShellCall::Other);
        }
        fn render_recommendations(&self, _rows: &[RecommendationRow]) {
            self.push(ShellCall::Other);
        }
        fn show_loading(&self, message: &str) {
            self.push(ShellCall::ShowLoading(message.to_string()));
        }
        fn hide_loading(&self) {
            self.push(ShellCall::HideLoading);
        }
        fn show_progress_bar(&self) {
            self.push(ShellCall::ProgressBar);
        }
        fn set_progress(&self, percent: u8) {
            self.push(ShellCall::Progress(percent));
        }
        fn notify(&self, _notice: &Notice) {
            self.push(ShellCall::Other);
        }
    }
}
