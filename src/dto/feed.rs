use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::draft::{BoardRow, Pick},
};

/// Tables exposed on the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedTable {
    /// The celebrity pool.
    Celebrities,
    /// The append-only pick log.
    Picks,
    /// The draft-state singleton.
    DraftState,
}

impl FeedTable {
    /// Wire name of the table, as used in subscription paths.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedTable::Celebrities => "celebrities",
            FeedTable::Picks => "picks",
            FeedTable::DraftState => "draft_state",
        }
    }
}

impl fmt::Display for FeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedTable {
    type Err = UnknownTable;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "celebrities" => Ok(FeedTable::Celebrities),
            "picks" => Ok(FeedTable::Picks),
            "draft_state" => Ok(FeedTable::DraftState),
            other => Err(UnknownTable {
                table: other.to_string(),
            }),
        }
    }
}

/// Error for a subscription naming a table that is not on the feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed table `{table}`")]
pub struct UnknownTable {
    /// The table name that was requested.
    pub table: String,
}

/// Kind of row change carried by a feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// A row was created.
    Insert,
    /// A row was modified.
    Update,
    /// A row was removed.
    Delete,
}

/// One row-level change delivered on the feed, with old and new payloads.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChangeEvent {
    /// Table the change belongs to.
    pub table: FeedTable,
    /// Kind of change.
    pub kind: ChangeKind,
    /// Row value before the change, for updates and deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub old_row: Option<Value>,
    /// Row value after the change, for inserts and updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub new_row: Option<Value>,
}

impl ChangeEvent {
    /// Build an insert event carrying the created row.
    pub fn insert(table: FeedTable, new_row: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Insert,
            old_row: None,
            new_row: Some(new_row),
        }
    }

    /// Build an update event carrying both row versions.
    pub fn update(table: FeedTable, old_row: Value, new_row: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Update,
            old_row: Some(old_row),
            new_row: Some(new_row),
        }
    }

    /// Build a delete event carrying the removed row.
    pub fn delete(table: FeedTable, old_row: Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Delete,
            old_row: Some(old_row),
            new_row: None,
        }
    }

    /// Seat referenced by the event payload, if any, used by row filters.
    pub fn seat(&self) -> Option<u8> {
        let row = self.new_row.as_ref().or(self.old_row.as_ref())?;
        row.get("seat")?.as_u64().map(|seat| seat as u8)
    }
}

/// A pick row as carried on the `picks` feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PickRowDto {
    /// Position in the overall draft.
    pub pick_number: u32,
    /// Seat that made the pick.
    pub seat: u8,
    /// The drafted celebrity.
    pub celebrity_id: Uuid,
    /// RFC3339 commit timestamp.
    pub picked_at: String,
}

impl From<&Pick> for PickRowDto {
    fn from(pick: &Pick) -> Self {
        Self {
            pick_number: pick.pick_number,
            seat: pick.seat,
            celebrity_id: pick.celebrity_id,
            picked_at: format_system_time(pick.picked_at),
        }
    }
}

impl From<&BoardRow> for PickRowDto {
    fn from(row: &BoardRow) -> Self {
        Self {
            pick_number: row.pick_number,
            seat: row.seat,
            celebrity_id: row.celebrity_id,
            picked_at: format_system_time(row.picked_at),
        }
    }
}

/// Initial metadata sent to a feed subscriber when it connects.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedHandshake {
    /// Table this subscription covers.
    pub table: FeedTable,
    /// Human-readable message confirming the subscription.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_round_trip() {
        for table in [
            FeedTable::Celebrities,
            FeedTable::Picks,
            FeedTable::DraftState,
        ] {
            assert_eq!(table.as_str().parse::<FeedTable>().unwrap(), table);
        }
        assert!("scores".parse::<FeedTable>().is_err());
    }

    #[test]
    fn seat_filter_reads_new_then_old_row() {
        let insert = ChangeEvent::insert(FeedTable::Picks, serde_json::json!({"seat": 3}));
        assert_eq!(insert.seat(), Some(3));

        let delete = ChangeEvent::delete(FeedTable::Picks, serde_json::json!({"seat": 5}));
        assert_eq!(delete.seat(), Some(5));

        let opaque = ChangeEvent::insert(FeedTable::Picks, serde_json::json!({"id": 1}));
        assert_eq!(opaque.seat(), None);
    }
}
