//! Authentication business logic - registration and credential verification.
//!
//! Passwords are bcrypt-hashed before they reach the database and the hash
//! never leaves this module except inside the entity model. Session/token
//! handling belongs to the web layer consuming this crate.

use bcrypt::{hash, verify};
use chrono::Utc;
use sea_orm::{Condition, Set, TransactionTrait, prelude::*};

use crate::entities::{AvatarStage, User, avatar, user};
use crate::errors::{Error, Result};

// bcrypt work factor (more rounds = slower to brute-force, slower to verify)
const BCRYPT_COST: u32 = 10;

/// Minimum password length accepted at registration
pub const PASSWORD_MIN_LENGTH: usize = 8;
/// Minimum username length
pub const USERNAME_MIN_LENGTH: usize = 3;
/// Maximum username length
pub const USERNAME_MAX_LENGTH: usize = 30;

pub(crate) fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        return Err(Error::InvalidValue {
            field: "username",
            message: format!(
                "username must be {USERNAME_MIN_LENGTH}-{USERNAME_MAX_LENGTH} characters, got {len}"
            ),
        });
    }
    Ok(())
}

/// Registers a new user and plants their avatar.
///
/// Checks that neither the email nor the username is already taken, hashes
/// the password with bcrypt, then creates the user (0 coins, 0 xp, level 1)
/// and their SEED avatar in one transaction so no account ever exists without
/// its avatar.
pub async fn register(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    validate_username(username)?;

    if !email.contains('@') {
        return Err(Error::InvalidValue {
            field: "email",
            message: format!("{email:?} is not an email address"),
        });
    }

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(Error::InvalidValue {
            field: "password",
            message: format!("password must be at least {PASSWORD_MIN_LENGTH} characters"),
        });
    }

    let existing = User::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(email))
                .add(user::Column::Username.eq(username)),
        )
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: "email or username already exists".to_string(),
        });
    }

    let password_hash = hash(password, BCRYPT_COST)?;

    let txn = db.begin().await?;

    let created = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        coins: Set(0),
        xp: Set(0),
        level: Set(1),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let planted = avatar::ActiveModel {
        user_id: Set(created.id),
        stage: Set(AvatarStage::Seed.as_str().to_string()),
        total_days: Set(0),
        ..Default::default()
    };
    planted.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(user_id = created.id, username, "registered new user");
    Ok(created)
}

/// Verifies an email/password pair and returns the matching user.
///
/// An unknown email and a wrong password both produce
/// [`Error::InvalidCredentials`] so callers cannot probe which emails exist.
pub async fn login(db: &DatabaseConnection, email: &str, password: &str) -> Result<user::Model> {
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    if !verify(password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Avatar;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_creates_user_and_avatar() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register(&db, "ana", "ana@example.com", "password123").await?;
        assert_eq!(user.username, "ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.coins, 0);
        assert_eq!(user.xp, 0);
        assert_eq!(user.level, 1);
        assert_ne!(user.password_hash, "password123");

        let avatar = Avatar::find()
            .filter(avatar::Column::UserId.eq(user.id))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(avatar.stage, "SEED");
        assert_eq!(avatar.total_days, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "ana", "ana@example.com", "password123").await?;

        let result = register(&db, "other", "ana@example.com", "password123").await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "ana", "ana@example.com", "password123").await?;

        let result = register(&db, "ana", "ana2@example.com", "password123").await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_validates_inputs() -> Result<()> {
        let db = setup_test_db().await?;

        // Username too short
        let result = register(&db, "an", "ana@example.com", "password123").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidValue { field: "username", .. }
        ));

        // Not an email
        let result = register(&db, "ana", "not-an-email", "password123").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidValue { field: "email", .. }
        ));

        // Password too short
        let result = register(&db, "ana", "ana@example.com", "short").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidValue { field: "password", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_login_accepts_correct_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        let registered = register(&db, "ana", "ana@example.com", "password123").await?;

        let logged_in = login(&db, "ana@example.com", "password123").await?;
        assert_eq!(logged_in.id, registered.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_identically() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "ana", "ana@example.com", "password123").await?;

        // Wrong password and unknown email are indistinguishable
        let wrong_password = login(&db, "ana@example.com", "wrong-password").await;
        assert!(matches!(wrong_password.unwrap_err(), Error::InvalidCredentials));

        let unknown_email = login(&db, "ghost@example.com", "password123").await;
        assert!(matches!(unknown_email.unwrap_err(), Error::InvalidCredentials));

        Ok(())
    }
}
