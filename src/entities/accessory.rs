//! Accessory entity - A catalog item users can redeem with coins.
//!
//! Catalog entries are global (not user-owned); ownership is recorded in
//! [`super::user_accessory`]. The catalog is seeded from `config.toml`.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Accessory catalog database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accessories")]
pub struct Model {
    /// Unique identifier for the catalog entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique catalog name, e.g. "straw_hat"
    #[sea_orm(unique)]
    pub name: String,
    /// Rarity tier, stored as the canonical string of [`AccessoryRarity`]
    pub rarity: String,
    /// Where the client finds the sprite
    pub image_url: String,
}

/// Defines relationships between Accessory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One catalog entry can be owned by many users
    #[sea_orm(has_many = "super::user_accessory::Entity")]
    UserAccessories,
}

impl Related<super::user_accessory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccessories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Rarity tier of an accessory; determines its coin price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessoryRarity {
    /// Baseline tier
    Common,
    /// Mid tier
    Rare,
    /// Top tier
    Epic,
}

impl AccessoryRarity {
    /// Canonical database/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::Rare => "RARE",
            Self::Epic => "EPIC",
        }
    }
}

impl fmt::Display for AccessoryRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessoryRarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMMON" => Ok(Self::Common),
            "RARE" => Ok(Self::Rare),
            "EPIC" => Ok(Self::Epic),
            other => Err(Error::InvalidValue {
                field: "rarity",
                message: format!("unknown rarity {other:?}, expected COMMON, RARE or EPIC"),
            }),
        }
    }
}
