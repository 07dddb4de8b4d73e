//! Command gateway: typed requests over the backend bridge

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::bridge::commands::BackendCommand;
use crate::common::channels::PROGRESS_EVENT;
use crate::common::errors::Result;
use crate::common::traits::Bridge;
use crate::common::types::{BettingHouse, DatabaseInfo, Group, LossSequenceRecommendation};

/// Issues backend commands and parses their results
#[derive(Clone)]
pub struct CommandGateway {
    bridge: Arc<dyn Bridge>,
}

/// Parse a command result
///
/// Several commands hand back their JSON document serialized into a string;
/// those are unwrapped before decoding. Anything else decodes directly.
pub fn decode_response<T: DeserializeOwned>(value: Value) -> Result<T> {
    if let Value::String(text) = &value {
        if let Ok(inner) = serde_json::from_str::<T>(text) {
            return Ok(inner);
        }
    }
    Ok(serde_json::from_value(value)?)
}

impl CommandGateway {
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self { bridge }
    }

    /// Issue a command and return its raw result
    pub async fn call(&self, command: BackendCommand) -> Result<Value> {
        let args = command.args()?;
        debug!(command = command.name(), %args, "invoking backend");
        self.bridge.invoke(command.name(), args).await
    }

    async fn call_decoded<T: DeserializeOwned>(&self, command: BackendCommand) -> Result<T> {
        decode_response(self.call(command).await?)
    }

    /// Subscribe to backend progress percentages
    pub async fn subscribe_progress(&self) -> Result<mpsc::Receiver<Value>> {
        self.bridge.listen(PROGRESS_EVENT).await
    }

    #[instrument(skip(self))]
    pub async fn houses(&self) -> Result<Vec<BettingHouse>> {
        self.call_decoded(BackendCommand::Houses).await
    }

    #[instrument(skip(self))]
    pub async fn database_info(&self, house_name: &str) -> Result<DatabaseInfo> {
        self.call_decoded(BackendCommand::GetDatabaseInfo {
            house_name: house_name.to_string(),
        })
        .await
    }

    /// Ask the backend to download and store `total_days` of draw history
    ///
    /// Returns the backend's status message.
    #[instrument(skip(self))]
    pub async fn fetch_house_data(
        &self,
        house_name: &str,
        lottery: &str,
        total_days: i64,
    ) -> Result<Option<String>> {
        self.call_decoded(BackendCommand::FetchHouseData {
            house_name: house_name.to_string(),
            lottery: lottery.to_string(),
            total_days,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn export_csv(&self, house_name: &str, file_path: PathBuf) -> Result<()> {
        self.call(BackendCommand::ExportCsv {
            house_name: house_name.to_string(),
            file_path,
        })
        .await
        .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn hours(&self, house_name: &str) -> Result<Vec<String>> {
        self.call_decoded(BackendCommand::GetHours {
            house_name: house_name.to_string(),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn places(&self, house_name: &str) -> Result<Vec<u32>> {
        self.call_decoded(BackendCommand::GetPlaces {
            house_name: house_name.to_string(),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn groups(&self, house_name: &str) -> Result<Vec<Group>> {
        self.call_decoded(BackendCommand::GetGroups {
            house_name: house_name.to_string(),
        })
        .await
    }

    #[instrument(skip(self, data))]
    pub async fn add_group(&self, house_name: &str, data: Group) -> Result<()> {
        self.call(BackendCommand::AddGroup {
            house_name: house_name.to_string(),
            data,
        })
        .await
        .map(|_| ())
    }

    #[instrument(skip(self, data))]
    pub async fn edit_group(&self, house_name: &str, data: Group) -> Result<()> {
        self.call(BackendCommand::EditGroup {
            house_name: house_name.to_string(),
            data,
        })
        .await
        .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn delete_group(&self, house_name: &str, id: u32) -> Result<()> {
        self.call(BackendCommand::DeleteGroup {
            house_name: house_name.to_string(),
            id,
        })
        .await
        .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn loss_sequence(&self, house_name: &str) -> Result<Vec<LossSequenceRecommendation>> {
        self.call_decoded(BackendCommand::GetLossSequence {
            house_name: house_name.to_string(),
        })
        .await
    }
}
