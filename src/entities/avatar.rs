//! Avatar entity - The plant companion that grows with a user's consistency.
//!
//! Every user has exactly one avatar. `total_days` counts distinct calendar
//! days with at least one habit completion; `stage` is derived from it through
//! fixed thresholds, so it only ever moves forward.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Avatar database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avatars")]
pub struct Model {
    /// Unique identifier for the avatar
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user (one avatar per user)
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Growth stage, stored as the canonical string of [`AvatarStage`]
    pub stage: String,
    /// Distinct active days accumulated so far
    pub total_days: i32,
}

/// Defines relationships between Avatar and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each avatar belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Ordered growth stages of an avatar.
///
/// The derived `Ord` follows declaration order, so later stages compare
/// greater than earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AvatarStage {
    /// Freshly planted
    Seed,
    /// First growth after a week of activity
    Sprout,
    /// Established after three weeks
    Sapling,
    /// Fully grown
    Tree,
}

impl AvatarStage {
    /// Canonical database/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "SEED",
            Self::Sprout => "SPROUT",
            Self::Sapling => "SAPLING",
            Self::Tree => "TREE",
        }
    }
}

impl fmt::Display for AvatarStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvatarStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEED" => Ok(Self::Seed),
            "SPROUT" => Ok(Self::Sprout),
            "SAPLING" => Ok(Self::Sapling),
            "TREE" => Ok(Self::Tree),
            other => Err(Error::InvalidValue {
                field: "stage",
                message: format!("unknown avatar stage {other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn stages_are_ordered_by_progression() {
        assert!(AvatarStage::Seed < AvatarStage::Sprout);
        assert!(AvatarStage::Sprout < AvatarStage::Sapling);
        assert!(AvatarStage::Sapling < AvatarStage::Tree);
    }

    #[test]
    fn stage_rejects_values_outside_the_closed_set() {
        assert!("FOREST".parse::<AvatarStage>().is_err());
        assert!("seed".parse::<AvatarStage>().is_err());
    }
}
