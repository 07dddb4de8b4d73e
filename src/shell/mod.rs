//! Concrete UI shells

pub mod console;

pub use console::{ConsoleShell, PromptSaveDialog};
