//! Loading indicator with scoped acquisition
//!
//! [`LoadingIndicator::show`] puts an indicator up and hands back a
//! [`LoadingGuard`]; dropping the guard takes it down again. Progress events
//! can tear the indicator down early, so every hide is idempotent.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::common::traits::UiShell;

/// Default loading message
pub const DEFAULT_LOADING_MESSAGE: &str = "Carregando...";

#[derive(Debug, Default)]
struct LoadingState {
    /// Indicators currently on screen
    depth: usize,
    /// Whether the top indicator already shows a determinate bar
    progress_active: bool,
}

/// What a progress value did to the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// No indicator on screen
    Ignored,
    /// Bar updated; `switched` is true on the first update of a session
    Updated { percent: u8, switched: bool },
    /// Terminal value; the indicator was removed
    Completed { switched: bool },
}

/// Whole percent shown on the bar
pub fn display_percent(percent: f64) -> u8 {
    percent.clamp(0.0, 100.0).floor() as u8
}

pub struct LoadingIndicator {
    state: Mutex<LoadingState>,
    shell: Arc<dyn UiShell>,
}

impl LoadingIndicator {
    pub fn new(shell: Arc<dyn UiShell>) -> Self {
        Self {
            state: Mutex::new(LoadingState::default()),
            shell,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoadingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show an indeterminate indicator until the returned guard drops
    pub fn show(self: &Arc<Self>, message: &str) -> LoadingGuard {
        {
            let mut state = self.lock();
            state.depth += 1;
            state.progress_active = false;
        }
        debug!(message, "loading shown");
        self.shell.show_loading(message);

        LoadingGuard {
            indicator: Arc::clone(self),
        }
    }

    /// Remove the top indicator; a no-op when nothing is shown
    pub fn hide(&self) {
        let removed = {
            let mut state = self.lock();
            state.progress_active = false;
            if state.depth > 0 {
                state.depth -= 1;
                true
            } else {
                false
            }
        };
        if removed {
            debug!("loading hidden");
            self.shell.hide_loading();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.lock().depth > 0
    }

    pub fn is_progress_active(&self) -> bool {
        self.lock().progress_active
    }

    /// Apply a percentage already clamped to `0.0..=100.0`
    ///
    /// Only a clamped 100 is terminal; anything below is shown floored.
    pub fn apply_progress(&self, percent: f64) -> ProgressOutcome {
        let outcome = {
            let mut state = self.lock();
            if state.depth == 0 {
                return ProgressOutcome::Ignored;
            }

            let switched = !state.progress_active;
            state.progress_active = true;

            if percent >= 100.0 {
                state.depth -= 1;
                state.progress_active = false;
                ProgressOutcome::Completed { switched }
            } else {
                ProgressOutcome::Updated {
                    percent: display_percent(percent),
                    switched,
                }
            }
        };

        match outcome {
            ProgressOutcome::Updated { percent, switched } => {
                if switched {
                    self.shell.show_progress_bar();
                }
                self.shell.set_progress(percent);
            }
            ProgressOutcome::Completed { switched } => {
                if switched {
                    self.shell.show_progress_bar();
                }
                self.shell.set_progress(100);
                self.shell.hide_loading();
            }
            ProgressOutcome::Ignored => {}
        }

        outcome
    }
}

/// Keeps one loading indicator on screen for its lifetime
#[must_use = "the indicator is hidden as soon as the guard drops"]
pub struct LoadingGuard {
    indicator: Arc<LoadingIndicator>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
