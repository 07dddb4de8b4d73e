//! User-action controller
//!
//! Each public method is one user action: it puts up a loading indicator,
//! drives the gateway, renders the outcome and turns every failure into a
//! notice. Only [`Controller::update_group`] hands the error back as well.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::gateway::CommandGateway;
use super::views::{recommendation_rows, RecommendationRow};
use crate::common::errors::{AppError, Result};
use crate::common::traits::{Bridge, FileFilter, SaveDialog, UiShell};
use crate::common::types::{BettingHouse, Group, HouseSelection, Notice, NoticeKind};
use crate::config::types::AppSettings;
use crate::session::dates::{date_to_timestamp, days_since, requested_days, timestamp_to_date};
use crate::session::loading::DEFAULT_LOADING_MESSAGE;
use crate::session::{ProgressListener, SessionContext, INVALID_HOUSE_MESSAGE};

/// Header label shown when a house has no stored draws
pub const EMPTY_DATABASE_LABEL: &str = "O banco de dados está vazio";

pub struct Controller {
    gateway: CommandGateway,
    session: Arc<SessionContext>,
    shell: Arc<dyn UiShell>,
    dialog: Arc<dyn SaveDialog>,
    settings: AppSettings,
}

impl Controller {
    pub fn new(
        bridge: Arc<dyn Bridge>,
        shell: Arc<dyn UiShell>,
        dialog: Arc<dyn SaveDialog>,
        settings: AppSettings,
    ) -> Self {
        Self {
            gateway: CommandGateway::new(bridge),
            session: Arc::new(SessionContext::new(shell.clone())),
            shell,
            dialog,
            settings,
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        let notice = Notice::new(kind, message, self.settings.notice_dismiss());
        self.shell.notify(&notice);
    }

    fn success(&self, message: impl Into<String>) {
        self.notify(NoticeKind::Success, message);
    }

    fn danger(&self, message: impl Into<String>) {
        self.notify(NoticeKind::Danger, message);
    }

    /// The selected house, rejected when nothing real is selected
    fn selected_house(&self) -> Result<HouseSelection> {
        let selection = self.session.selection();
        if selection.is_valid() {
            Ok(selection)
        } else {
            Err(AppError::Validation(INVALID_HOUSE_MESSAGE.to_string()))
        }
    }

    // ========================================================================
    // Session startup
    // ========================================================================

    /// Subscribe to progress events and load the house list
    ///
    /// A backend without an event stream still works; loading indicators
    /// then stay indeterminate.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        let listener = match self.start_progress_listener().await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Progress events unavailable: {}", e);
                None
            }
        };
        self.load_houses().await;
        listener
    }

    /// Establish the session's single progress subscription
    pub async fn start_progress_listener(&self) -> Result<JoinHandle<()>> {
        let events = self.gateway.subscribe_progress().await?;
        info!("Progress listener started");
        Ok(ProgressListener::new(self.session.loading().clone()).spawn(events))
    }

    pub async fn load_houses(&self) -> Vec<BettingHouse> {
        let _loading = self.session.loading().show("Carregando casas...");
        match self.gateway.houses().await {
            Ok(houses) => {
                info!("Loaded {} betting houses", houses.len());
                self.success("Casas carregadas com sucesso.");
                self.shell.populate_houses(&houses);
                self.session.set_houses(houses.clone());
                houses
            }
            Err(e) => {
                self.danger(format!("Erro ao obter as casas: {}", e));
                Vec::new()
            }
        }
    }

    /// Select a loaded house by label or lottery identifier
    pub fn select_house(&self, key: &str) -> Result<HouseSelection> {
        match self.session.find_house(key) {
            Some(house) => {
                let selection = HouseSelection::from(&house);
                debug!(house = %selection.name, "house selected");
                self.session.select(selection.clone());
                Ok(selection)
            }
            None => {
                self.danger(INVALID_HOUSE_MESSAGE);
                Err(AppError::Validation(INVALID_HOUSE_MESSAGE.to_string()))
            }
        }
    }

    // ========================================================================
    // Draw history
    // ========================================================================

    /// Days of history the next fetch asks for
    pub fn requested_days(&self, all_time: bool) -> i64 {
        let elapsed = self
            .session
            .last_update_label()
            .and_then(|label| date_to_timestamp(&label).ok())
            .map(days_since);
        requested_days(elapsed, all_time, self.settings.max_fetch_days)
    }

    /// Fetch draw history for `house` (or the current selection)
    ///
    /// Rejected with a notice when the house is invalid or already being
    /// fetched. The house leaves the in-flight set however the fetch ends.
    pub async fn fetch_house_data(&self, house: Option<HouseSelection>, all_time: bool) {
        let house = house.unwrap_or_else(|| self.session.selection());

        let _ticket = match self.session.in_flight().try_acquire(&house.value) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.danger(e.to_string());
                return;
            }
        };

        let total_days = self.requested_days(all_time);
        info!(house = %house.name, lottery = %house.value, total_days, "Fetching draw history");

        let _loading = self
            .session
            .loading()
            .show(&format!("Carregando dados da casa {}...", house.name));

        match self
            .gateway
            .fetch_house_data(&house.name, &house.value, total_days)
            .await
        {
            Ok(message) => {
                debug!(?message, "draw history stored");
                self.success("Dados da casa carregados com sucesso.");
                self.refresh_table_info().await;
            }
            Err(e) => self.danger(format!("Erro ao obter dados da casa: {}", e)),
        }
    }

    /// Reload the header, group table and recommendations for the selection
    pub async fn refresh_table_info(&self) {
        let _loading = self
            .session
            .loading()
            .show("Carregando informações da tabela...");

        let house = self.session.selection();
        if !house.is_valid() {
            return;
        }

        match self.load_table_info(&house).await {
            Ok(()) => self.success("Informações da tabela carregadas com sucesso."),
            Err(e) => self.danger(format!("Erro ao obter informações da tabela: {}", e)),
        }
    }

    async fn load_table_info(&self, house: &HouseSelection) -> Result<()> {
        let info = self.gateway.database_info(&house.name).await?;
        let label = info
            .date
            .and_then(timestamp_to_date)
            .unwrap_or_else(|| EMPTY_DATABASE_LABEL.to_string());

        self.shell.show_database_info(info.total_rows, &label);
        self.session.set_last_update_label(label);

        self.load_groups(&house.name).await;
        self.load_loss_sequence(&house.name).await;
        Ok(())
    }

    /// Export the selected house's draw table to a file the user picks
    pub async fn export_csv(&self) {
        let house = match self.selected_house() {
            Ok(house) => house,
            Err(e) => {
                self.danger(e.to_string());
                return;
            }
        };

        match self.export_to_chosen_path(&house).await {
            Ok(path) => self.success(format!("Arquivo salvo em: {}", path.display())),
            Err(AppError::UserCancelled) => self.danger(AppError::UserCancelled.to_string()),
            Err(e) => self.danger(format!("Erro ao salvar arquivo: {}", e)),
        }
    }

    async fn export_to_chosen_path(&self, house: &HouseSelection) -> Result<PathBuf> {
        let default_name = format!("{}.csv", house.name);
        let path = self
            .dialog
            .save_path(&default_name, &FileFilter::csv())?
            .ok_or(AppError::UserCancelled)?;

        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        self.gateway.export_csv(&house.name, path.clone()).await?;
        Ok(path)
    }

    // ========================================================================
    // Form data
    // ========================================================================

    /// Draw hours known for a house; empty on failure
    pub async fn hours(&self, house_name: &str) -> Vec<String> {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        self.gateway.hours(house_name).await.unwrap_or_else(|e| {
            self.danger(format!("Erro ao obter horários: {}", e));
            Vec::new()
        })
    }

    /// Prize places known for a house; empty on failure
    pub async fn places(&self, house_name: &str) -> Vec<u32> {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        self.gateway.places(house_name).await.unwrap_or_else(|e| {
            self.danger(format!("Erro ao obter prêmios: {}", e));
            Vec::new()
        })
    }

    // ========================================================================
    // Groups
    // ========================================================================

    pub async fn groups(&self, house_name: &str) -> Vec<Group> {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        self.load_groups(house_name).await
    }

    async fn load_groups(&self, house_name: &str) -> Vec<Group> {
        match self.gateway.groups(house_name).await {
            Ok(groups) => {
                self.shell.render_groups(&groups);
                groups
            }
            Err(e) => {
                self.danger(format!("Erro ao obter grupos: {}", e));
                Vec::new()
            }
        }
    }

    pub async fn loss_sequence(&self, house_name: &str) -> Vec<RecommendationRow> {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        self.load_loss_sequence(house_name).await
    }

    async fn load_loss_sequence(&self, house_name: &str) -> Vec<RecommendationRow> {
        match self.gateway.loss_sequence(house_name).await {
            Ok(recommendations) => {
                let rows = recommendation_rows(recommendations, self.settings.highlight_threshold);
                self.shell.render_recommendations(&rows);
                rows
            }
            Err(e) => {
                self.danger(format!("Erro ao obter sequência de derrota: {}", e));
                Vec::new()
            }
        }
    }

    /// Group mutations are always followed by both refreshes, in order
    async fn refresh_after_mutation(&self, house_name: &str) {
        self.load_groups(house_name).await;
        self.load_loss_sequence(house_name).await;
    }

    pub async fn add_group(&self, house_name: &str, data: Group) {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        match self.gateway.add_group(house_name, data).await {
            Ok(()) => {
                self.refresh_after_mutation(house_name).await;
                self.success("Grupo adicionado com sucesso.");
            }
            Err(e) => self.danger(format!("Erro ao adicionar grupo: {}", e)),
        }
    }

    /// Edit a stored group; the error is reported and also returned
    pub async fn update_group(&self, house_name: &str, data: Group) -> Result<()> {
        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        match self.gateway.edit_group(house_name, data).await {
            Ok(()) => {
                self.refresh_after_mutation(house_name).await;
                self.success("Grupo atualizado com sucesso.");
                Ok(())
            }
            Err(e) => {
                self.danger(format!("Erro ao atualizar grupo: {}", e));
                Err(e)
            }
        }
    }

    /// Delete a group of the selected house
    pub async fn delete_group(&self, id: u32) {
        let house = match self.selected_house() {
            Ok(house) => house,
            Err(e) => {
                self.danger(e.to_string());
                return;
            }
        };

        let _loading = self.session.loading().show(DEFAULT_LOADING_MESSAGE);
        match self.gateway.delete_group(&house.name, id).await {
            Ok(()) => {
                self.refresh_after_mutation(&house.name).await;
                self.success("Grupo deletado com sucesso.");
            }
            Err(e) => self.danger(format!("Erro ao excluir grupo: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::MockSaveDialog;
    use crate::session::testing::{ShellCall, TestShell};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct StubBridge {
        commands: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Bridge for StubBridge {
        async fn invoke(&self, command: &str, _args: Value) -> Result<Value> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(Value::Null)
        }

        async fn listen(&self, _event: &str) -> Result<mpsc::Receiver<Value>> {
            Err(AppError::WebSocket("no event stream".to_string()))
        }
    }

    fn controller(dialog: MockSaveDialog) -> (Arc<StubBridge>, Arc<TestShell>, Controller) {
        let bridge = Arc::new(StubBridge::default());
        let shell = Arc::new(TestShell::default());
        let controller = Controller::new(
            bridge.clone(),
            shell.clone(),
            Arc::new(dialog),
            AppSettings::default(),
        );
        controller
            .session()
            .set_houses(vec![BettingHouse::new("Rio", "rio")]);
        controller.select_house("rio").unwrap();
        (bridge, shell, controller)
    }

    #[tokio::test]
    async fn test_export_suggests_house_file_name() {
        let mut dialog = MockSaveDialog::new();
        dialog
            .expect_save_path()
            .withf(|name, filter| name == "Rio.csv" && *filter == FileFilter::csv())
            .times(1)
            .returning(|_, _| Ok(None));

        let (bridge, shell, controller) = controller(dialog);
        controller.export_csv().await;

        assert!(bridge.commands.lock().unwrap().is_empty());
        assert!(!shell
            .calls()
            .iter()
            .any(|c| matches!(c, ShellCall::ShowLoading(_))));
    }

    #[tokio::test]
    async fn test_export_shows_loading_only_around_backend_call() {
        let mut dialog = MockSaveDialog::new();
        dialog
            .expect_save_path()
            .returning(|_, _| Ok(Some(PathBuf::from("out.csv"))));

        let (bridge, shell, controller) = controller(dialog);
        controller.export_csv().await;

        assert_eq!(*bridge.commands.lock().unwrap(), vec!["export_csv".to_string()]);
        let loading: Vec<_> = shell
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, ShellCall::Other))
            .collect();
        assert_eq!(
            loading,
            vec![
                ShellCall::ShowLoading(DEFAULT_LOADING_MESSAGE.to_string()),
                ShellCall::HideLoading
            ]
        );
    }

    #[tokio::test]
    async fn test_start_survives_missing_event_stream() {
        let (_bridge, _shell, controller) = controller(MockSaveDialog::new());
        assert!(controller.start().await.is_none());
    }

    #[test]
    fn test_requested_days_without_label() {
        let (_bridge, _shell, controller) = controller(MockSaveDialog::new());
        assert_eq!(controller.requested_days(false), 1600);
    }
}
