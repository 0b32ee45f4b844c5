//! Friendship entity - A directed request between two users.
//!
//! `user_id` sent the request, `friend_id` received it. A pair of users has at
//! most one row, in whichever direction it was initiated. The only status
//! transition is PENDING → ACCEPTED; declining or unfriending deletes the row.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Friendship database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendships")]
pub struct Model {
    /// Unique identifier for the friendship
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who sent the request
    pub user_id: i64,
    /// User who received it; never equal to `user_id`
    pub friend_id: i64,
    /// Stored as the canonical string of [`FriendshipStatus`]
    pub status: String,
}

/// Defines relationships between Friendship and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The requesting side
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Sender,
    /// The receiving side
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FriendId",
        to = "super::user::Column::Id"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle state of a friendship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FriendshipStatus {
    /// Requested, awaiting the recipient's answer
    Pending,
    /// Confirmed by the recipient; terminal
    Accepted,
}

impl FriendshipStatus {
    /// Canonical database/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            other => Err(Error::InvalidValue {
                field: "status",
                message: format!("unknown friendship status {other:?}, expected PENDING or ACCEPTED"),
            }),
        }
    }
}
