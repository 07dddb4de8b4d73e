//! Terminal rendering of the UI capabilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::app::views::{Highlight, RecommendationRow};
use crate::common::errors::Result;
use crate::common::traits::{FileFilter, SaveDialog, UiShell};
use crate::common::types::{BettingHouse, Group, Notice, NoticeKind};

const BAR_WIDTH: usize = 30;

/// Render a determinate progress bar line
pub fn progress_line(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn notice_prefix(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "[ok]",
        NoticeKind::Danger => "[erro]",
        NoticeKind::Info => "[info]",
    }
}

/// Prints tables, notices and loading state to stdout
#[derive(Debug, Default)]
pub struct ConsoleShell {
    /// A `\r`-rewritten progress line is currently open
    progress_open: Mutex<bool>,
}

impl ConsoleShell {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_progress_line(&self) {
        let mut open = self.progress_open.lock().unwrap_or_else(|p| p.into_inner());
        if *open {
            println!();
            *open = false;
        }
    }

    fn line(&self, text: &str) {
        self.close_progress_line();
        println!("{}", text);
    }
}

impl UiShell for ConsoleShell {
    fn populate_houses(&self, houses: &[BettingHouse]) {
        self.line("Casas de apostas:");
        for house in houses {
            self.line(&format!("  {:<30} {}", house.name, house.value));
        }
    }

    fn show_database_info(&self, total_rows: i64, last_update: &str) {
        self.line(&format!("Registros: {}  |  Última atualização: {}", total_rows, last_update));
    }

    fn render_groups(&self, groups: &[Group]) {
        self.line(&format!("{:<6} {:<8} {:<6} {}", "id", "horário", "prêmio", "grupos"));
        for group in groups {
            let id = group.id.map(|id| id.to_string()).unwrap_or_default();
            self.line(&format!(
                "{:<6} {:<8} {:<6} {}",
                id,
                group.hour,
                group.place,
                group.numbers_label()
            ));
        }
    }

    fn render_recommendations(&self, rows: &[RecommendationRow]) {
        self.line(&format!("{:<4} {:<10} {:<8} {:<6} {}", "", "sequência", "horário", "prêmio", "grupos"));
        for row in rows {
            let mark = match row.highlight {
                Highlight::Green => "++",
                Highlight::Red => "--",
            };
            let rec = &row.recommendation;
            self.line(&format!(
                "{:<4} {:<10} {:<8} {:<6} {}",
                mark, rec.loss_sequence, rec.hour, rec.place, rec.group
            ));
        }
    }

    fn show_loading(&self, message: &str) {
        self.line(&format!("... {}", message));
    }

    fn hide_loading(&self) {
        self.close_progress_line();
    }

    fn show_progress_bar(&self) {
        self.close_progress_line();
    }

    fn set_progress(&self, percent: u8) {
        let mut open = self.progress_open.lock().unwrap_or_else(|p| p.into_inner());
        print!("\r{}", progress_line(percent));
        let _ = io::stdout().flush();
        *open = true;
    }

    fn notify(&self, notice: &Notice) {
        self.line(&format!("{} {}", notice_prefix(notice.kind), notice.message));
    }
}

/// Save dialog answered from the command line or an stdin prompt
#[derive(Debug, Default, Clone)]
pub struct PromptSaveDialog {
    preset: Option<PathBuf>,
}

impl PromptSaveDialog {
    /// Use `preset` instead of prompting, when given
    pub fn new(preset: Option<PathBuf>) -> Self {
        Self { preset }
    }

    /// Interpret one prompt answer; blank cancels
    pub fn parse_answer(answer: &str) -> Option<PathBuf> {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

impl SaveDialog for PromptSaveDialog {
    fn save_path(&self, default_name: &str, filter: &FileFilter) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.preset {
            return Ok(Some(path.clone()));
        }

        print!(
            "Salvar como ({}: *.{}) [sugestão: {}]: ",
            filter.name,
            filter.extensions.join(", *."),
            default_name
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(Self::parse_answer(&answer))
    }
}
