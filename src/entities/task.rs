//! Task entity - A one-off to-do item with an optional due date.
//!
//! Unlike habits, tasks are completed at most once: the PENDING → DONE
//! transition is terminal and stamps `completed_at`.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title, e.g. "File taxes"
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Optional deadline
    pub due_date: Option<DateTimeUtc>,
    /// Lifecycle state, stored as the canonical string of [`TaskStatus`]
    pub status: String,
    /// Owning user
    pub user_id: i64,
    /// When the task was created
    pub created_at: DateTimeUtc,
    /// Set once, when the task transitions to DONE
    pub completed_at: Option<DateTimeUtc>,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each task belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet completed
    Pending,
    /// Completed; terminal
    Done,
}

impl TaskStatus {
    /// Canonical database/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "DONE" => Ok(Self::Done),
            other => Err(Error::InvalidValue {
                field: "status",
                message: format!("unknown task status {other:?}, expected PENDING or DONE"),
            }),
        }
    }
}
