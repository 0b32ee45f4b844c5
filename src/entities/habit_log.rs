//! Habit log entity - One completion of a habit.
//!
//! Logs are append-only and strictly ordered by `completed_at` within a habit;
//! `streak_day` records how many consecutive cadence periods the completion
//! extends (1 for a fresh streak).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit completion database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habit_logs")]
pub struct Model {
    /// Unique identifier for the log record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Habit this completion belongs to
    pub habit_id: i64,
    /// When the habit was completed
    pub completed_at: DateTimeUtc,
    /// Consecutive-completion count this record represents
    pub streak_day: i32,
}

/// Defines relationships between `HabitLog` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each log belongs to one habit
    #[sea_orm(
        belongs_to = "super::habit::Entity",
        from = "Column::HabitId",
        to = "super::habit::Column::Id"
    )]
    Habit,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
