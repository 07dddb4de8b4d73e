//! Backend command names and argument payloads

use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::common::types::Group;

/// A typed request to the backend process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// List the betting houses available for selection
    Houses,
    /// Row count and most recent record of a house's draw table
    GetDatabaseInfo { house_name: String },
    /// Download draw history for the last `total_days` days and store it
    FetchHouseData {
        house_name: String,
        lottery: String,
        total_days: i64,
    },
    /// Write the house's draw table to `file_path` as CSV
    ExportCsv {
        house_name: String,
        file_path: PathBuf,
    },
    GetHours { house_name: String },
    GetPlaces { house_name: String },
    GetGroups { house_name: String },
    AddGroup { house_name: String, data: Group },
    EditGroup { house_name: String, data: Group },
    DeleteGroup { house_name: String, id: u32 },
    /// Loss streaks for every stored group
    GetLossSequence { house_name: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HouseArgs<'a> {
    house_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchArgs<'a> {
    house_name: &'a str,
    lottery: &'a str,
    total_days: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportArgs<'a> {
    house_name: &'a str,
    file_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupArgs<'a> {
    house_name: &'a str,
    data: &'a Group,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteArgs<'a> {
    house_name: &'a str,
    id: u32,
}

impl BackendCommand {
    /// Command name as registered by the backend
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Houses => "houses",
            BackendCommand::GetDatabaseInfo { .. } => "get_database_info",
            BackendCommand::FetchHouseData { .. } => "get_bichos_data",
            BackendCommand::ExportCsv { .. } => "export_csv",
            BackendCommand::GetHours { .. } => "get_hours",
            BackendCommand::GetPlaces { .. } => "get_places",
            BackendCommand::GetGroups { .. } => "get_group",
            BackendCommand::AddGroup { .. } => "add_group",
            BackendCommand::EditGroup { .. } => "edit_group",
            BackendCommand::DeleteGroup { .. } => "delete_group",
            BackendCommand::GetLossSequence { .. } => "get_loss_sequence",
        }
    }

    /// Named arguments, camelCased the way the backend expects them
    pub fn args(&self) -> serde_json::Result<Value> {
        match self {
            BackendCommand::Houses => Ok(json!({})),
            BackendCommand::GetDatabaseInfo { house_name }
            | BackendCommand::GetHours { house_name }
            | BackendCommand::GetPlaces { house_name }
            | BackendCommand::GetGroups { house_name }
            | BackendCommand::GetLossSequence { house_name } => {
                serde_json::to_value(HouseArgs { house_name })
            }
            BackendCommand::FetchHouseData {
                house_name,
                lottery,
                total_days,
            } => serde_json::to_value(FetchArgs {
                house_name,
                lottery,
                total_days: *total_days,
            }),
            BackendCommand::ExportCsv {
                house_name,
                file_path,
            } => serde_json::to_value(ExportArgs {
                house_name,
                file_path: file_path.to_string_lossy().into_owned(),
            }),
            BackendCommand::AddGroup { house_name, data }
            | BackendCommand::EditGroup { house_name, data } => {
                serde_json::to_value(GroupArgs { house_name, data })
            }
            BackendCommand::DeleteGroup { house_name, id } => {
                serde_json::to_value(DeleteArgs { house_name, id: *id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fetch_args_are_camel_case() {
        let cmd = BackendCommand::FetchHouseData {
            house_name: "Rio".into(),
            lottery: "rio".into(),
            total_days: 10,
        };
        assert_eq!(cmd.name(), "get_bichos_data");
        assert_eq!(
            cmd.args().unwrap(),
            json!({"houseName": "Rio", "lottery": "rio", "totalDays": 10})
        );
    }

    #[test]
    fn test_group_args_embed_data() {
        let cmd = BackendCommand::EditGroup {
            house_name: "A Zebra".into(),
            data: Group::new("14:00", 1, vec![3, 4]).with_id(5),
        };
        assert_eq!(
            cmd.args().unwrap(),
            json!({
                "houseName": "A Zebra",
                "data": {"id": 5, "hour": "14:00", "place": 1, "group": [3, 4]}
            })
        );
    }

    #[test]
    fn test_export_and_delete_args() {
        let export = BackendCommand::ExportCsv {
            house_name: "Rio".into(),
            file_path: PathBuf::from("/tmp/Rio.csv"),
        };
        assert_eq!(
            export.args().unwrap(),
            json!({"houseName": "Rio", "filePath": "/tmp/Rio.csv"})
        );

        let delete = BackendCommand::DeleteGroup {
            house_name: "Rio".into(),
            id: 5,
        };
        assert_eq!(delete.args().unwrap(), json!({"houseName": "Rio", "id": 5}));
        assert_eq!(BackendCommand::Houses.args().unwrap(), json!({}));
    }
}
