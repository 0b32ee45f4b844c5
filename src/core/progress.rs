//! Gamification progress logic - xp and coin awards, leveling, and summaries.
//!
//! All xp/coin mutations in the crate go through [`award`] and [`spend_coins`]
//! so the counters are always changed with atomic column updates and the level
//! is always re-derived from xp. The award values mirror the product's reward
//! table: habits pay less than tasks, streaks pay a flat bonus, and every
//! level gained pays a coin bonus on top.

use chrono::Duration;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::str::FromStr;

use crate::entities::{
    HabitFrequency, HabitLog, Task, TaskStatus, User, habit, habit_log, task, user,
};
use crate::errors::{Error, Result};

/// Xp for completing a habit once
pub const HABIT_XP: i64 = 10;
/// Coins for completing a habit once
pub const HABIT_COINS: i64 = 5;
/// Xp for completing a task
pub const TASK_XP: i64 = 15;
/// Coins for completing a task
pub const TASK_COINS: i64 = 10;
/// Extra xp when a habit completion extends a streak
pub const STREAK_BONUS_XP: i64 = 5;
/// Xp required per level
pub const LEVEL_XP_THRESHOLD: i64 = 100;
/// Coins paid for each level gained
pub const LEVEL_UP_COINS: i64 = 25;

/// Derives the level for a lifetime xp total. Level 1 starts at 0 xp and every
/// [`LEVEL_XP_THRESHOLD`] xp adds one level, so the level never decreases as
/// long as xp never decreases.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn level_for_xp(xp: i64) -> i32 {
    (xp / LEVEL_XP_THRESHOLD) as i32 + 1
}

/// Summary of one user's progress, as shown on the progress screen and in
/// friend comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    /// Lifetime experience points
    pub xp: i64,
    /// Current coin balance
    pub coins: i64,
    /// Current level
    pub level: i32,
    /// Total habit completions ever logged
    pub habits_completed: u64,
    /// Total tasks brought to DONE
    pub tasks_completed: u64,
    /// Longest currently-live streak across the user's habits
    pub current_streak: i32,
}

/// Awards xp and coins to a user with atomic column updates.
///
/// The level is re-derived from the new xp total; each level gained pays
/// [`LEVEL_UP_COINS`] on top of `coin_delta`. Deltas must be non-negative -
/// spending goes through [`spend_coins`] instead.
///
/// Accepts any connection so it can run inside the caller's transaction.
pub async fn award<C>(db: &C, user_id: i64, xp_delta: i64, coin_delta: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if xp_delta < 0 || coin_delta < 0 {
        return Err(Error::InvalidValue {
            field: "award",
            message: format!("award deltas must be non-negative, got xp {xp_delta}, coins {coin_delta}"),
        });
    }

    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    let new_level = level_for_xp(user.xp + xp_delta);
    let levels_gained = i64::from((new_level - user.level).max(0));
    let level_bonus = levels_gained * LEVEL_UP_COINS;

    User::update_many()
        .col_expr(user::Column::Xp, Expr::col(user::Column::Xp).add(xp_delta))
        .col_expr(
            user::Column::Coins,
            Expr::col(user::Column::Coins).add(coin_delta + level_bonus),
        )
        .col_expr(user::Column::Level, Expr::value(new_level))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })
}

/// Deducts coins from a user, rejecting the operation when the balance is
/// short. The deduction itself is an atomic column update.
///
/// Accepts any connection so it can run inside the caller's transaction.
pub async fn spend_coins<C>(db: &C, user_id: i64, amount: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    if user.coins < amount {
        return Err(Error::InsufficientCoins {
            required: amount,
            available: user.coins,
        });
    }

    User::update_many()
        .col_expr(user::Column::Coins, Expr::col(user::Column::Coins).sub(amount))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })
}

/// Builds the [`ProgressReport`] for a user as of the given instant.
///
/// `as_of` exists so streak liveness is decided by the caller's clock: a DAILY
/// streak is live when the latest completion is today or yesterday, a WEEKLY
/// streak when it is at most seven days old.
pub async fn report(
    db: &DatabaseConnection,
    user_id: i64,
    as_of: DateTimeUtc,
) -> Result<ProgressReport> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    let habits = crate::entities::Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    let habit_ids: Vec<i64> = habits.iter().map(|h| h.id).collect();

    let habits_completed = if habit_ids.is_empty() {
        0
    } else {
        HabitLog::find()
            .filter(habit_log::Column::HabitId.is_in(habit_ids))
            .count(db)
            .await?
    };

    let tasks_completed = Task::find()
        .filter(task::Column::UserId.eq(user_id))
        .filter(task::Column::Status.eq(TaskStatus::Done.as_str()))
        .count(db)
        .await?;

    let mut current_streak = 0;
    for h in &habits {
        let latest = HabitLog::find()
            .filter(habit_log::Column::HabitId.eq(h.id))
            .order_by_desc(habit_log::Column::CompletedAt)
            .one(db)
            .await?;
        let Some(latest) = latest else { continue };

        let frequency = HabitFrequency::from_str(&h.frequency)?;
        let live = match frequency {
            HabitFrequency::Daily => {
                latest.completed_at.date_naive() >= (as_of - Duration::days(1)).date_naive()
            }
            HabitFrequency::Weekly => latest.completed_at >= as_of - Duration::days(7),
        };
        if live {
            current_streak = current_streak.max(latest.streak_day);
        }
    }

    Ok(ProgressReport {
        xp: user.xp,
        coins: user.coins,
        level: user.level,
        habits_completed,
        tasks_completed,
        current_streak,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_level_for_xp_thresholds() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(250), 3);
    }

    #[tokio::test]
    async fn test_award_increments_counters() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;

        let updated = award(&db, user.id, 10, 5).await?;
        assert_eq!(updated.xp, 10);
        assert_eq!(updated.coins, 5);
        assert_eq!(updated.level, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_award_pays_level_up_bonus() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;

        award(&db, user.id, 95, 0).await?;
        let updated = award(&db, user.id, 10, 5).await?;

        // 105 xp crosses the 100 xp threshold: level 2 and +25 bonus coins
        assert_eq!(updated.xp, 105);
        assert_eq!(updated.level, 2);
        assert_eq!(updated.coins, 5 + LEVEL_UP_COINS);

        Ok(())
    }

    #[tokio::test]
    async fn test_award_rejects_negative_deltas() -> Result<()> {
        // The sign check fires before any query runs
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = award(&db, 1, -5, 0).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidValue { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_spend_coins_deducts_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;
        award(&db, user.id, 0, 100).await?;

        let updated = spend_coins(&db, user.id, 30).await?;
        assert_eq!(updated.coins, 70);

        Ok(())
    }

    #[tokio::test]
    async fn test_spend_coins_rejects_overspending() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;
        award(&db, user.id, 0, 10).await?;

        let result = spend_coins(&db, user.id, 50).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientCoins { required: 50, available: 10 }
        ));

        // Balance untouched
        let user = User::find_by_id(user.id).one(&db).await?.unwrap();
        assert_eq!(user.coins, 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_report_for_fresh_user() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;

        let report = report(&db, user.id, utc(2026, 8, 6, 12)).await?;
        assert_eq!(report.xp, 0);
        assert_eq!(report.coins, 0);
        assert_eq!(report.level, 1);
        assert_eq!(report.habits_completed, 0);
        assert_eq!(report.tasks_completed, 0);
        assert_eq!(report.current_streak, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_report_missing_user() -> Result<()> {
        let db = setup_test_db().await?;

        let result = report(&db, 999, utc(2026, 8, 6, 12)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user", id: 999 }
        ));

        Ok(())
    }
}
