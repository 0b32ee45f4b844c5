//! Avatar business logic - growth stages derived from active days.
//!
//! The avatar is created at registration and only ever moves forward: habit
//! completions add active days (at most one per calendar day, guarded by the
//! habit module) and the stage is re-derived from the day total through fixed
//! thresholds. Because the thresholds are monotone and `total_days` never
//! decreases, the stage never regresses.

use sea_orm::{Set, prelude::*};
use std::str::FromStr;

use crate::entities::{Avatar, AvatarStage, avatar};
use crate::errors::{Error, Result};

/// Active days required to reach SPROUT
pub const SPROUT_DAYS: i32 = 7;
/// Active days required to reach SAPLING
pub const SAPLING_DAYS: i32 = 21;
/// Active days required to reach TREE
pub const TREE_DAYS: i32 = 60;

/// Derives the growth stage for an active-day total.
#[must_use]
pub const fn stage_for(total_days: i32) -> AvatarStage {
    match total_days {
        d if d >= TREE_DAYS => AvatarStage::Tree,
        d if d >= SAPLING_DAYS => AvatarStage::Sapling,
        d if d >= SPROUT_DAYS => AvatarStage::Sprout,
        _ => AvatarStage::Seed,
    }
}

/// Returns a user's avatar.
pub async fn get(db: &DatabaseConnection, user_id: i64) -> Result<avatar::Model> {
    Avatar::find()
        .filter(avatar::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "avatar", id: user_id })
}

/// Adds one active day to a user's avatar and re-derives its stage.
///
/// Callers are responsible for the at-most-once-per-calendar-day guard; the
/// habit module invokes this only for the first completion of a day. Accepts
/// any connection so it can run inside the completion transaction.
pub async fn record_active_day<C>(db: &C, user_id: i64) -> Result<avatar::Model>
where
    C: ConnectionTrait,
{
    let current = Avatar::find()
        .filter(avatar::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "avatar", id: user_id })?;

    let total_days = current.total_days + 1;
    let stage = stage_for(total_days);

    let mut active: avatar::ActiveModel = current.into();
    active.total_days = Set(total_days);
    active.stage = Set(stage.as_str().to_string());
    active.update(db).await.map_err(Into::into)
}

/// Parses the stored stage of an avatar model back into the closed enum.
pub fn stage_of(model: &avatar::Model) -> Result<AvatarStage> {
    AvatarStage::from_str(&model.stage)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(stage_for(0), AvatarStage::Seed);
        assert_eq!(stage_for(6), AvatarStage::Seed);
        assert_eq!(stage_for(7), AvatarStage::Sprout);
        assert_eq!(stage_for(20), AvatarStage::Sprout);
        assert_eq!(stage_for(21), AvatarStage::Sapling);
        assert_eq!(stage_for(59), AvatarStage::Sapling);
        assert_eq!(stage_for(60), AvatarStage::Tree);
        assert_eq!(stage_for(500), AvatarStage::Tree);
    }

    #[test]
    fn test_stage_never_regresses_as_days_grow() {
        let mut previous = stage_for(0);
        for days in 1..=100 {
            let current = stage_for(days);
            assert!(current >= previous, "stage regressed at day {days}");
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_record_active_day_advances_stage() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;

        for _ in 0..SPROUT_DAYS {
            record_active_day(&db, user.id).await?;
        }

        let avatar = get(&db, user.id).await?;
        assert_eq!(avatar.total_days, SPROUT_DAYS);
        assert_eq!(stage_of(&avatar)?, AvatarStage::Sprout);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_avatar() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get(&db, 7).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "avatar", id: 7 }
        ));

        Ok(())
    }
}
