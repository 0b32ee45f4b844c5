//! User profile business logic - projections and profile updates.

use sea_orm::{Set, prelude::*};

use crate::core::auth::validate_username;
use crate::entities::{PublicProfile, User, UserResponse, user};
use crate::errors::{Error, Result};

/// Returns the private projection of a user's own account.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<UserResponse> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;
    Ok(user.into())
}

/// Returns the public projection of a user, as other users see it.
pub async fn get_public_profile(db: &DatabaseConnection, user_id: i64) -> Result<PublicProfile> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;
    Ok(user.into())
}

/// Renames a user, keeping usernames unique.
///
/// The uniqueness check excludes the user themselves so re-submitting the
/// current name is a no-op rather than a conflict.
pub async fn update_username(
    db: &DatabaseConnection,
    user_id: i64,
    username: &str,
) -> Result<user::Model> {
    validate_username(username)?;

    let taken = User::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Id.ne(user_id))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::Conflict {
            message: format!("username {username:?} already taken"),
        });
    }

    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    let mut active: user::ActiveModel = user.into();
    active.username = Set(username.to_string());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_profile_projections_never_carry_the_password() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;

        let profile = get_profile(&db, user.id).await?;
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());

        let public = get_public_profile(&db, user.id).await?;
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("email").is_none());
        assert!(json.get("coins").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_projection_passes_fields_through() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana").await?;
        crate::core::progress::award(&db, user.id, 150, 10).await?;

        let profile = get_profile(&db, user.id).await?;
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(profile.xp, 150);
        assert_eq!(profile.level, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_username_checks_uniqueness() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db, "ana").await?;
        create_test_user(&db, "berto").await?;

        // Taken by someone else
        let result = update_username(&db, ana.id, "berto").await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        // Re-submitting your own name is fine
        let unchanged = update_username(&db, ana.id, "ana").await?;
        assert_eq!(unchanged.username, "ana");

        // A fresh name works
        let renamed = update_username(&db, ana.id, "ana_renamed").await?;
        assert_eq!(renamed.username, "ana_renamed");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_profile_missing_user() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_profile(&db, 42).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user", id: 42 }
        ));

        Ok(())
    }
}
