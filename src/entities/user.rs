//! User entity - Represents an account in the habit-tracking system.
//!
//! Each user has unique `username` and `email`, a bcrypt `password_hash`, and
//! the gamification counters (`coins`, `xp`, `level`) that habit and task
//! completions feed. The response projections exposed to clients live here
//! too; neither of them ever carries the credential field.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique handle shown to other users
    #[sea_orm(unique)]
    pub username: String,
    /// Unique login email
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash of the password, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Spendable currency, earned by completions and spent on accessories
    pub coins: i64,
    /// Lifetime experience points, never decreases
    pub xp: i64,
    /// Current level, derived from xp (starts at 1)
    pub level: i32,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many habits
    #[sea_orm(has_many = "super::habit::Entity")]
    Habits,
    /// One user has many tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// One user has exactly one avatar
    #[sea_orm(has_one = "super::avatar::Entity")]
    Avatar,
    /// One user owns many accessories
    #[sea_orm(has_many = "super::user_accessory::Entity")]
    UserAccessories,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habits.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::avatar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Avatar.def()
    }
}

impl Related<super::user_accessory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccessories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Response projection of a user's own account.
///
/// Contains everything the owner may see about themselves. The credential
/// field is dropped at construction, not at serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User identifier
    pub id: i64,
    /// Unique handle
    pub username: String,
    /// Login email
    pub email: String,
    /// Current coin balance
    pub coins: i64,
    /// Lifetime experience points
    pub xp: i64,
    /// Current level
    pub level: i32,
}

impl From<Model> for UserResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            coins: model.coins,
            xp: model.xp,
            level: model.level,
        }
    }
}

/// Response projection of a user as seen by *other* users.
///
/// No email, no coins: only what a friend list or comparison view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// User identifier
    pub id: i64,
    /// Unique handle
    pub username: String,
    /// Current level
    pub level: i32,
    /// Lifetime experience points
    pub xp: i64,
}

impl From<Model> for PublicProfile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            level: model.level,
            xp: model.xp,
        }
    }
}
