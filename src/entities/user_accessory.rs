//! User accessory entity - Ownership of one catalog accessory by one user.
//!
//! A row exists once the accessory has been redeemed; `equipped_at` is set
//! while the accessory is worn and cleared when it is taken off.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accessory ownership database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_accessories")]
pub struct Model {
    /// Unique identifier for the ownership record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Catalog entry owned
    pub accessory_id: i64,
    /// Set while equipped, None while only owned
    pub equipped_at: Option<DateTimeUtc>,
}

/// Defines relationships between `UserAccessory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ownership record belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each ownership record points at one catalog entry
    #[sea_orm(
        belongs_to = "super::accessory::Entity",
        from = "Column::AccessoryId",
        to = "super::accessory::Column::Id"
    )]
    Accessory,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::accessory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accessory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
