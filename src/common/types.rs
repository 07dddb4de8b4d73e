//! Domain types exchanged with the backend process

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lottery identifier used by the selector when nothing is chosen
pub const INVALID_LOTTERY: &str = "invalid";

/// A betting house (data source / lottery variant) the user can select
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BettingHouse {
    /// Human-readable label, also the key the backend stores tables under
    pub name: String,
    /// Lottery identifier sent to the draw-history fetch
    pub value: String,
}

impl BettingHouse {
    /// Create a new betting house
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The house currently picked in the selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HouseSelection {
    pub name: String,
    pub value: String,
}

impl HouseSelection {
    /// The "nothing selected" placeholder
    pub fn invalid() -> Self {
        Self {
            name: INVALID_LOTTERY.to_string(),
            value: INVALID_LOTTERY.to_string(),
        }
    }

    /// Whether the selection points at a real lottery
    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty() && self.value != INVALID_LOTTERY
    }
}

impl From<&BettingHouse> for HouseSelection {
    fn from(house: &BettingHouse) -> Self {
        Self {
            name: house.name.clone(),
            value: house.value.clone(),
        }
    }
}

/// Snapshot of a house's draw table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Number of stored draws
    pub total_rows: i64,
    /// Unix timestamp of the most recent record, absent for an empty table
    #[serde(default)]
    pub date: Option<i64>,
}

/// A user-managed set of animal groups bound to a draw hour and prize place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Assigned by the backend; `None` for groups not yet stored
    #[serde(default)]
    pub id: Option<u32>,
    /// Draw hour label, e.g. "14:00"
    pub hour: String,
    /// Prize position (1st, 2nd, ...)
    pub place: u32,
    /// Group numbers, in the order the user entered them
    pub group: Vec<u32>,
}

impl Group {
    /// A group that has not been stored yet
    pub fn new(hour: impl Into<String>, place: u32, group: Vec<u32>) -> Self {
        Self {
            id: None,
            hour: hour.into(),
            place,
            group,
        }
    }

    /// Same group with an identifier attached, for edits
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Numbers joined the way the group table shows them
    pub fn numbers_label(&self) -> String {
        self.group
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Consecutive non-winning draws for a group, computed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossSequenceRecommendation {
    pub loss_sequence: i32,
    pub hour: String,
    pub place: u32,
    /// Group numbers as the backend stores them ("1, 2, 3")
    pub group: String,
}

/// Severity of an on-screen notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Danger,
    Info,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeKind::Success => write!(f, "success"),
            NoticeKind::Danger => write!(f, "danger"),
            NoticeKind::Info => write!(f, "info"),
        }
    }
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// How long the notice stays up before dismissing itself
    pub dismiss_after: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            dismiss_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_wire_format() {
        let json = r#"{"id": 5, "hour": "14:00", "place": 1, "group": [3, 17, 22]}"#;
        let group: Group = serde_json::from_str(json).unwrap();

        assert_eq!(group.id, Some(5));
        assert_eq!(group.numbers_label(), "3, 17, 22");
    }

    #[test]
    fn test_new_group_serializes_null_id() {
        let value = serde_json::to_value(Group::new("09:00", 2, vec![1])).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["place"], 2);
    }

    #[test]
    fn test_database_info_empty_table() {
        let info: DatabaseInfo = serde_json::from_str(r#"{"total_rows": 0, "date": null}"#).unwrap();
        assert_eq!(info.total_rows, 0);
        assert!(info.date.is_none());
    }

    #[test]
    fn test_selection_validity() {
        assert!(!HouseSelection::invalid().is_valid());
        let house = BettingHouse::new("Rio", "rio");
        assert!(HouseSelection::from(&house).is_valid());
        assert!(!HouseSelection {
            name: "Rio".into(),
            value: "  ".into()
        }
        .is_valid());
    }
}
