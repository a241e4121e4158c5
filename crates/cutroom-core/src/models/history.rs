//! Edit history model: the ordered record of editing operations applied
//! to a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Editing operations recognised by the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Trim,
    Merge,
    AddText,
    Crop,
}

impl Display for EditAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EditAction::Trim => write!(f, "trim"),
            EditAction::Merge => write!(f, "merge"),
            EditAction::AddText => write!(f, "add_text"),
            EditAction::Crop => write!(f, "crop"),
        }
    }
}

impl FromStr for EditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trim" => Ok(EditAction::Trim),
            "merge" => Ok(EditAction::Merge),
            "add_text" => Ok(EditAction::AddText),
            "crop" => Ok(EditAction::Crop),
            other => Err(format!("unknown edit action: {}", other)),
        }
    }
}

/// History entry stored in the database. The action is persisted as text
/// so the set of actions can grow without a schema migration.
#[derive(Debug, Clone, FromRow)]
pub struct EditHistory {
    pub id: i64,
    pub project_id: i64,
    pub action: String,
    pub params: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditHistoryResponse {
    pub id: i64,
    pub project_id: i64,
    pub action: String,
    pub params: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<EditHistory> for EditHistoryResponse {
    fn from(entry: EditHistory) -> Self {
        Self {
            id: entry.id,
            project_id: entry.project_id,
            action: entry.action,
            params: entry.params,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_action_round_trip() {
        for action in [
            EditAction::Trim,
            EditAction::Merge,
            EditAction::AddText,
            EditAction::Crop,
        ] {
            let parsed: EditAction = action.to_string().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_edit_action_rejects_unknown() {
        assert!("rotate".parse::<EditAction>().is_err());
    }
}
