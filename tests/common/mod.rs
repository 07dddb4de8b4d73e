//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use bicho_tracker::common::channels::create_event_channel;
use bicho_tracker::{
    AppError, BettingHouse, Bridge, FileFilter, Group, NoticeKind, RecommendationRow, Result,
    SaveDialog, UiShell,
};
use bicho_tracker::{Controller, Notice};
use bicho_tracker::config::types::AppSettings;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};

/// Everything the fakes observed, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Invoke { command: String, args: Value },
    Houses(Vec<String>),
    DatabaseInfo { total_rows: i64, last_update: String },
    Groups(Vec<Option<u32>>),
    Recommendations(Vec<i32>),
    ShowLoading(String),
    HideLoading,
    ProgressBar,
    Progress(u8),
    Notice(NoticeKind, String),
}

/// Shared, ordered log of bridge calls and shell renders
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl Journal {
    pub fn push(&self, entry: Entry) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn invocations(&self, command: &str) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Invoke { command: c, args } if c == command => Some(args),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Notice(kind, message) => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    /// Number of indicators still on screen
    pub fn open_indicators(&self) -> i64 {
        self.entries().iter().fold(0, |depth, e| match e {
            Entry::ShowLoading(_) => depth + 1,
            Entry::HideLoading => depth - 1,
            _ => depth,
        })
    }
}

/// In-memory backend with scripted responses
#[derive(Default)]
pub struct FakeBridge {
    journal: Journal,
    responses: Mutex<HashMap<String, VecDeque<std::result::Result<Value, String>>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    listeners: Mutex<Vec<mpsc::Sender<Value>>>,
}

impl FakeBridge {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Default::default()
        }
    }

    /// Queue a successful result for the next call to `command`
    pub fn respond(&self, command: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(Ok(value));
    }

    /// Queue a rejection for the next call to `command`
    pub fn reject(&self, command: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Make calls to `command` wait until the returned handle is notified
    pub fn gate(&self, command: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(command.to_string(), notify.clone());
        notify
    }

    /// Push a progress event to every listener
    pub async fn emit_progress(&self, value: Value) {
        let listeners = self.listeners.lock().unwrap().clone();
        for tx in listeners {
            let _ = tx.send(value.clone()).await;
        }
    }

    /// Every emitted event has been received by its listener
    pub fn events_drained(&self) -> bool {
        self.listeners
            .lock()
            .unwrap()
            .iter()
            .all(|tx| tx.capacity() == tx.max_capacity())
    }
}

#[async_trait]
impl Bridge for FakeBridge {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        self.journal.push(Entry::Invoke {
            command: command.to_string(),
            args,
        });

        let gate = self.gates.lock().unwrap().get(command).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(AppError::RemoteCall(message)),
            None => Ok(Value::Null),
        }
    }

    async fn listen(&self, _event: &str) -> Result<mpsc::Receiver<Value>> {
        let (tx, rx) = create_event_channel();
        self.listeners.lock().unwrap().push(tx);
        Ok(rx)
    }
}

/// Shell that writes every render into the journal
pub struct RecordingShell {
    journal: Journal,
}

impl RecordingShell {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl UiShell for RecordingShell {
    fn populate_houses(&self, houses: &[BettingHouse]) {
        self.journal
            .push(Entry::Houses(houses.iter().map(|h| h.value.clone()).collect()));
    }

    fn show_database_info(&self, total_rows: i64, last_update: &str) {
        self.journal.push(Entry::DatabaseInfo {
            total_rows,
            last_update: last_update.to_string(),
        });
    }

    fn render_groups(&self, groups: &[Group]) {
        self.journal
            .push(Entry::Groups(groups.iter().map(|g| g.id).collect()));
    }

    fn render_recommendations(&self, rows: &[RecommendationRow]) {
        self.journal.push(Entry::Recommendations(
            rows.iter().map(|r| r.recommendation.loss_sequence).collect(),
        ));
    }

    fn show_loading(&self, message: &str) {
        self.journal.push(Entry::ShowLoading(message.to_string()));
    }

    fn hide_loading(&self) {
        self.journal.push(Entry::HideLoading);
    }

    fn show_progress_bar(&self) {
        self.journal.push(Entry::ProgressBar);
    }

    fn set_progress(&self, percent: u8) {
        self.journal.push(Entry::Progress(percent));
    }

    fn notify(&self, notice: &Notice) {
        self.journal
            .push(Entry::Notice(notice.kind, notice.message.clone()));
    }
}

/// Save dialog with a fixed answer
pub struct FixedDialog(pub Option<PathBuf>);

impl SaveDialog for FixedDialog {
    fn save_path(&self, _default_name: &str, _filter: &FileFilter) -> Result<Option<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// A controller wired to fakes
pub struct Harness {
    pub journal: Journal,
    pub bridge: Arc<FakeBridge>,
    pub controller: Controller,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_dialog(FixedDialog(None))
    }

    pub fn with_dialog(dialog: impl SaveDialog + 'static) -> Self {
        let journal = Journal::default();
        let bridge = Arc::new(FakeBridge::new(journal.clone()));
        let shell = Arc::new(RecordingShell::new(journal.clone()));
        let controller = Controller::new(
            bridge.clone(),
            shell,
            Arc::new(dialog),
            AppSettings::default(),
        );
        Self {
            journal,
            bridge,
            controller,
        }
    }

    /// Load the sample houses and select "Rio"
    pub async fn with_rio_selected(self) -> Self {
        self.bridge.respond("houses", json!(sample_houses_json()));
        self.controller.load_houses().await;
        self.controller.select_house("Rio").unwrap();
        self
    }
}

/// Houses the way the backend returns them: a JSON document inside a string
pub fn sample_houses_json() -> String {
    serde_json::to_string(&vec![
        BettingHouse::new("Rio", "rio"),
        BettingHouse::new("A Zebra", "zebra"),
    ])
    .unwrap()
}

pub fn sample_groups_json() -> String {
    serde_json::to_string(&vec![
        Group::new("14:00", 1, vec![3, 17]).with_id(5),
        Group::new("09:00", 2, vec![22]).with_id(6),
    ])
    .unwrap()
}

pub fn sample_loss_sequence() -> Value {
    json!([
        {"loss_sequence": 4, "hour": "09:00", "place": 2, "group": "22"},
        {"loss_sequence": 12, "hour": "14:00", "place": 1, "group": "3, 17"}
    ])
}
