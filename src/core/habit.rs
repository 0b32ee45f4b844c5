//! Habit business logic - CRUD and the completion pipeline.
//!
//! Completing a habit is the heart of the system: in a single database
//! transaction the completion log is appended (with its streak position), the
//! xp/coin awards are applied, and the avatar gains an active day when this is
//! the user's first completion of that calendar day. Either everything
//! happens or nothing does; a completion can never exist without its awards.

use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::str::FromStr;

use crate::core::{avatar, progress};
use crate::entities::{Habit, HabitFrequency, HabitLog, User, habit, habit_log};
use crate::errors::{Error, Result};

/// Maximum number of habits per user
pub const MAX_HABITS_PER_USER: u64 = 50;

/// Optional changes to apply to an existing habit. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct HabitChanges {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New cadence
    pub frequency: Option<HabitFrequency>,
}

/// Retrieves all habits of a user, most recently created first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .order_by_desc(habit::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a habit by id, verifying it belongs to the given user.
///
/// A habit owned by someone else is indistinguishable from a missing one.
pub async fn get_owned(
    db: &DatabaseConnection,
    habit_id: i64,
    user_id: i64,
) -> Result<habit::Model> {
    Habit::find_by_id(habit_id)
        .filter(habit::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "habit", id: habit_id })
}

/// Creates a new habit for a user.
///
/// The referenced user must exist, the name must be non-empty, and the user
/// must be under the habit cap.
pub async fn create(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    description: Option<String>,
    frequency: HabitFrequency,
) -> Result<habit::Model> {
    if name.trim().is_empty() {
        return Err(Error::InvalidValue {
            field: "name",
            message: "habit name cannot be empty".to_string(),
        });
    }

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    let count = Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if count >= MAX_HABITS_PER_USER {
        return Err(Error::LimitExceeded {
            resource: "habits",
            limit: MAX_HABITS_PER_USER,
        });
    }

    let model = habit::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        frequency: Set(frequency.as_str().to_string()),
        user_id: Set(user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Updates a habit's name, description or cadence. Ownership-checked.
pub async fn update(
    db: &DatabaseConnection,
    habit_id: i64,
    user_id: i64,
    changes: HabitChanges,
) -> Result<habit::Model> {
    let habit = get_owned(db, habit_id, user_id).await?;

    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "name",
                message: "habit name cannot be empty".to_string(),
            });
        }
    }

    let mut active: habit::ActiveModel = habit.into();
    if let Some(name) = changes.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }
    if let Some(frequency) = changes.frequency {
        active.frequency = Set(frequency.as_str().to_string());
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a habit and all of its completion logs. Ownership-checked.
pub async fn delete(db: &DatabaseConnection, habit_id: i64, user_id: i64) -> Result<()> {
    let habit = get_owned(db, habit_id, user_id).await?;

    let txn = db.begin().await?;

    HabitLog::delete_many()
        .filter(habit_log::Column::HabitId.eq(habit.id))
        .exec(&txn)
        .await?;
    habit.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Retrieves the completion logs of a habit, newest first. Ownership-checked.
pub async fn list_logs(
    db: &DatabaseConnection,
    habit_id: i64,
    user_id: i64,
) -> Result<Vec<habit_log::Model>> {
    get_owned(db, habit_id, user_id).await?;

    HabitLog::find()
        .filter(habit_log::Column::HabitId.eq(habit_id))
        .order_by_desc(habit_log::Column::CompletedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Streak position of a new completion relative to the previous one.
///
/// Same calendar day keeps the streak where it is, the next cadence period
/// (next day for DAILY, within seven days for WEEKLY) extends it by one, and
/// anything later starts over at 1.
fn next_streak_day(
    frequency: HabitFrequency,
    previous: Option<&habit_log::Model>,
    completed_at: DateTimeUtc,
) -> i32 {
    let Some(previous) = previous else { return 1 };

    let gap_days = (completed_at.date_naive() - previous.completed_at.date_naive()).num_days();
    match frequency {
        HabitFrequency::Daily => match gap_days {
            0 => previous.streak_day,
            1 => previous.streak_day + 1,
            _ => 1,
        },
        HabitFrequency::Weekly => match gap_days {
            0 => previous.streak_day,
            1..=7 => previous.streak_day + 1,
            _ => 1,
        },
    }
}

/// True when any of the user's habits already has a completion on `day`.
async fn day_already_counted<C>(db: &C, user_id: i64, day: NaiveDate) -> Result<bool>
where
    C: ConnectionTrait,
{
    let habit_ids: Vec<i64> = Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|h| h.id)
        .collect();
    if habit_ids.is_empty() {
        return Ok(false);
    }

    let day_start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    let count = HabitLog::find()
        .filter(habit_log::Column::HabitId.is_in(habit_ids))
        .filter(habit_log::Column::CompletedAt.gte(day_start))
        .filter(habit_log::Column::CompletedAt.lt(day_end))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Completes a habit at the given instant.
///
/// In one transaction: appends the completion log, awards xp and coins
/// (+[`progress::STREAK_BONUS_XP`] when the completion extends a streak), and
/// adds an avatar active day for the first completion of the calendar day.
///
/// `completed_at` must be strictly after the habit's latest completion;
/// out-of-order or duplicate timestamps are rejected so the log stays
/// monotonic per habit.
pub async fn complete(
    db: &DatabaseConnection,
    habit_id: i64,
    user_id: i64,
    completed_at: DateTimeUtc,
) -> Result<habit_log::Model> {
    let habit = get_owned(db, habit_id, user_id).await?;
    let frequency = HabitFrequency::from_str(&habit.frequency)?;

    let txn = db.begin().await?;

    let previous = HabitLog::find()
        .filter(habit_log::Column::HabitId.eq(habit_id))
        .order_by_desc(habit_log::Column::CompletedAt)
        .one(&txn)
        .await?;

    if let Some(previous) = &previous {
        if completed_at <= previous.completed_at {
            return Err(Error::InvalidValue {
                field: "completed_at",
                message: format!(
                    "completion at {completed_at} is not after the latest completion at {}",
                    previous.completed_at
                ),
            });
        }
    }

    let streak_day = next_streak_day(frequency, previous.as_ref(), completed_at);
    let extends_streak = previous
        .as_ref()
        .is_some_and(|prev| streak_day == prev.streak_day + 1);

    let first_of_day = !day_already_counted(&txn, user_id, completed_at.date_naive()).await?;

    let log = habit_log::ActiveModel {
        habit_id: Set(habit_id),
        completed_at: Set(completed_at),
        streak_day: Set(streak_day),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let streak_bonus = if extends_streak { progress::STREAK_BONUS_XP } else { 0 };
    progress::award(
        &txn,
        user_id,
        progress::HABIT_XP + streak_bonus,
        progress::HABIT_COINS,
    )
    .await?;

    if first_of_day {
        avatar::record_active_day(&txn, user_id).await?;
    }

    txn.commit().await?;

    tracing::debug!(habit_id, user_id, streak_day, "habit completed");
    Ok(log)
}
