//! Friendship business logic - requests, acceptance, and progress comparison.
//!
//! Friendships are bidirectional once accepted: a single row stores who sent
//! the request (`user_id`) and who received it (`friend_id`), and both
//! directions are searched whenever a pair is looked up. Only the recipient
//! of a PENDING request can accept it; declining or unfriending deletes the
//! row, so PENDING → ACCEPTED is the only status transition that exists.

use sea_orm::{Condition, Set, prelude::*};
use serde::Serialize;

use crate::core::progress::{self, ProgressReport};
use crate::entities::{
    Friendship, FriendshipStatus, PublicProfile, User, friendship, user,
};
use crate::errors::{Error, Result};

/// Maximum number of accepted friends per user
pub const MAX_FRIENDS_PER_USER: u64 = 100;

/// One side of a progress comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSide {
    /// Who this side is
    pub profile: PublicProfile,
    /// Their progress summary
    pub progress: ProgressReport,
}

/// Progress comparison between a user and one of their friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendComparison {
    /// The requesting user's side
    pub user: ComparisonSide,
    /// The friend's side
    pub friend: ComparisonSide,
}

fn pair_condition(a: i64, b: i64) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(friendship::Column::UserId.eq(a))
                .add(friendship::Column::FriendId.eq(b)),
        )
        .add(
            Condition::all()
                .add(friendship::Column::UserId.eq(b))
                .add(friendship::Column::FriendId.eq(a)),
        )
}

fn either_side_condition(user_id: i64) -> Condition {
    Condition::any()
        .add(friendship::Column::UserId.eq(user_id))
        .add(friendship::Column::FriendId.eq(user_id))
}

async fn accepted_friend_count(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    Friendship::find()
        .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted.as_str()))
        .filter(either_side_condition(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Sends a friend request from `user_id` to `friend_id`.
///
/// Self-requests are invalid, the target must exist, and a pair of users can
/// only ever have one row between them in either direction.
pub async fn send_request(
    db: &DatabaseConnection,
    user_id: i64,
    friend_id: i64,
) -> Result<friendship::Model> {
    if user_id == friend_id {
        return Err(Error::InvalidValue {
            field: "friend_id",
            message: "cannot send a friend request to yourself".to_string(),
        });
    }

    User::find_by_id(friend_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: friend_id })?;

    let existing = Friendship::find()
        .filter(pair_condition(user_id, friend_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: "friendship request already exists".to_string(),
        });
    }

    if accepted_friend_count(db, user_id).await? >= MAX_FRIENDS_PER_USER {
        return Err(Error::LimitExceeded {
            resource: "friends",
            limit: MAX_FRIENDS_PER_USER,
        });
    }

    let model = friendship::ActiveModel {
        user_id: Set(user_id),
        friend_id: Set(friend_id),
        status: Set(FriendshipStatus::Pending.as_str().to_string()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Accepts a PENDING request. Only the recipient may accept, and the request
/// must still be PENDING; anything else is indistinguishable from a missing
/// request.
pub async fn accept(
    db: &DatabaseConnection,
    friendship_id: i64,
    user_id: i64,
) -> Result<friendship::Model> {
    let request = Friendship::find_by_id(friendship_id)
        .filter(friendship::Column::FriendId.eq(user_id))
        .filter(friendship::Column::Status.eq(FriendshipStatus::Pending.as_str()))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "friendship", id: friendship_id })?;

    let mut active: friendship::ActiveModel = request.into();
    active.status = Set(FriendshipStatus::Accepted.as_str().to_string());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a friendship row. Either party may do it, whether the row is a
/// pending request (declining) or an accepted friendship (unfriending).
pub async fn remove(db: &DatabaseConnection, friendship_id: i64, user_id: i64) -> Result<()> {
    let friendship = Friendship::find_by_id(friendship_id)
        .filter(either_side_condition(user_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "friendship", id: friendship_id })?;

    friendship.delete(db).await?;
    Ok(())
}

/// Lists the pending requests a user has received.
pub async fn list_incoming_requests(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<friendship::Model>> {
    Friendship::find()
        .filter(friendship::Column::FriendId.eq(user_id))
        .filter(friendship::Column::Status.eq(FriendshipStatus::Pending.as_str()))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the public profiles of a user's accepted friends, whichever side of
/// the row they are on.
pub async fn list_friends(db: &DatabaseConnection, user_id: i64) -> Result<Vec<PublicProfile>> {
    let rows = Friendship::find()
        .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted.as_str()))
        .filter(either_side_condition(user_id))
        .all(db)
        .await?;

    let other_ids: Vec<i64> = rows
        .iter()
        .map(|f| if f.user_id == user_id { f.friend_id } else { f.user_id })
        .collect();
    if other_ids.is_empty() {
        return Ok(Vec::new());
    }

    let friends = User::find()
        .filter(user::Column::Id.is_in(other_ids))
        .all(db)
        .await?;

    Ok(friends.into_iter().map(Into::into).collect())
}

/// Compares a user's progress with one of their accepted friends.
///
/// `as_of` feeds the streak-liveness computation of both progress reports.
pub async fn compare(
    db: &DatabaseConnection,
    user_id: i64,
    friend_id: i64,
    as_of: DateTimeUtc,
) -> Result<FriendComparison> {
    let accepted = Friendship::find()
        .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted.as_str()))
        .filter(pair_condition(user_id, friend_id))
        .one(db)
        .await?;
    if accepted.is_none() {
        return Err(Error::NotFound { entity: "friendship", id: friend_id });
    }

    let user_side = ComparisonSide {
        profile: crate::core::user::get_public_profile(db, user_id).await?,
        progress: progress::report(db, user_id, as_of).await?,
    };
    let friend_side = ComparisonSide {
        profile: crate::core::user::get_public_profile(db, friend_id).await?,
        progress: progress::report(db, friend_id, as_of).await?,
    };

    Ok(FriendComparison { user: user_side, friend: friend_side })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_self_friendship_is_rejected() -> Result<()> {
        // The self-check fires before any query runs
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = send_request(&db, 1, 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidValue { field: "friend_id", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_request_requires_existing_target() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;

        let result = send_request(&db, ana.id, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user", id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_requests_rejected_in_both_directions() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;

        send_request(&db, ana.id, berto.id).await?;

        let same_direction = send_request(&db, ana.id, berto.id).await;
        assert!(matches!(same_direction.unwrap_err(), Error::Conflict { .. }));

        let reverse_direction = send_request(&db, berto.id, ana.id).await;
        assert!(matches!(reverse_direction.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_only_the_recipient_can_accept() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;
        let request = send_request(&db, ana.id, berto.id).await?;
        assert_eq!(request.status, "PENDING");

        // The sender cannot accept their own request
        let result = accept(&db, request.id, ana.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { entity: "friendship", .. }));

        // The recipient can
        let accepted = accept(&db, request.id, berto.id).await?;
        assert_eq!(accepted.status, "ACCEPTED");

        Ok(())
    }

    #[tokio::test]
    async fn test_accepted_friendship_cannot_be_accepted_again() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;
        let request = send_request(&db, ana.id, berto.id).await?;
        accept(&db, request.id, berto.id).await?;

        // No transition out of ACCEPTED exists, not even re-accepting
        let result = accept(&db, request.id, berto.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { entity: "friendship", .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_either_party_can_remove() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;

        // Recipient declines a pending request
        let request = send_request(&db, ana.id, berto.id).await?;
        remove(&db, request.id, berto.id).await?;
        assert!(list_incoming_requests(&db, berto.id).await?.is_empty());

        // Sender unfriends after acceptance
        let request = send_request(&db, ana.id, berto.id).await?;
        accept(&db, request.id, berto.id).await?;
        remove(&db, request.id, ana.id).await?;
        assert!(list_friends(&db, ana.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_rejects_outsiders() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;
        let carla = create_test_user(&db, "carla").await?;
        let request = send_request(&db, ana.id, berto.id).await?;

        let result = remove(&db, request.id, carla.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { entity: "friendship", .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_friends_sees_both_directions() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;
        let carla = create_test_user(&db, "carla").await?;

        // ana → berto, carla → ana, both accepted
        let r1 = send_request(&db, ana.id, berto.id).await?;
        accept(&db, r1.id, berto.id).await?;
        let r2 = send_request(&db, carla.id, ana.id).await?;
        accept(&db, r2.id, ana.id).await?;

        let friends = list_friends(&db, ana.id).await?;
        let names: Vec<&str> = friends.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(friends.len(), 2);
        assert!(names.contains(&"berto"));
        assert!(names.contains(&"carla"));

        // Pending requests do not count as friends
        let diego = create_test_user(&db, "diego").await?;
        send_request(&db, diego.id, ana.id).await?;
        assert_eq!(list_friends(&db, ana.id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_compare_requires_accepted_friendship() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        let berto = create_test_user(&db, "berto").await?;

        // Not friends yet
        let result = compare(&db, ana.id, berto.id, utc(2026, 8, 6, 12)).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { entity: "friendship", .. }));

        // Pending is not enough
        let request = send_request(&db, ana.id, berto.id).await?;
        let result = compare(&db, ana.id, berto.id, utc(2026, 8, 6, 12)).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { entity: "friendship", .. }));

        accept(&db, request.id, berto.id).await?;
        let comparison = compare(&db, ana.id, berto.id, utc(2026, 8, 6, 12)).await?;
        assert_eq!(comparison.user.profile.username, "ana");
        assert_eq!(comparison.friend.profile.username, "berto");

        Ok(())
    }
}
