//! Habit entity - A recurring activity a user wants to build.
//!
//! Each habit belongs to one user, carries a cadence ([`HabitFrequency`]) and
//! accumulates [`super::habit_log`] records as the user completes it.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Habit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Unique identifier for the habit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short name, e.g. "Meditate"
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Cadence, stored as the canonical string of [`HabitFrequency`]
    pub frequency: String,
    /// Owning user
    pub user_id: i64,
    /// When the habit was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each habit belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One habit has many completion logs
    #[sea_orm(has_many = "super::habit_log::Entity")]
    HabitLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::habit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HabitLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// How often a habit is meant to be completed.
///
/// Stored in the database as its canonical uppercase string; any other
/// string is rejected when read back or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HabitFrequency {
    /// Completed once per day
    Daily,
    /// Completed once per week
    Weekly,
}

impl HabitFrequency {
    /// Canonical database/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
        }
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            other => Err(Error::InvalidValue {
                field: "frequency",
                message: format!("unknown frequency {other:?}, expected DAILY or WEEKLY"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn frequency_round_trips_through_canonical_string() {
        for freq in [HabitFrequency::Daily, HabitFrequency::Weekly] {
            assert_eq!(freq.as_str().parse::<HabitFrequency>().unwrap(), freq);
        }
    }

    #[test]
    fn frequency_rejects_values_outside_the_closed_set() {
        for bad in ["MONTHLY", "daily", "", "HOURLY"] {
            let err = bad.parse::<HabitFrequency>().unwrap_err();
            assert!(matches!(err, Error::InvalidValue { field: "frequency", .. }));
        }
    }
}
