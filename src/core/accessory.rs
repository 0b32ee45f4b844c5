//! Accessory business logic - catalog listing, redemption, and equipping.
//!
//! Redeeming an accessory spends coins priced by rarity. The ownership insert
//! and the coin deduction run in one transaction, so a user can never pay
//! without receiving the accessory or receive it without paying.

use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};
use std::str::FromStr;

use crate::core::progress;
use crate::entities::{
    Accessory, AccessoryRarity, User, UserAccessory, accessory, user_accessory,
};
use crate::errors::{Error, Result};

/// Coin price of an accessory by rarity tier.
#[must_use]
pub const fn coin_price(rarity: AccessoryRarity) -> i64 {
    match rarity {
        AccessoryRarity::Common => 25,
        AccessoryRarity::Rare => 75,
        AccessoryRarity::Epic => 200,
    }
}

/// Lists the whole accessory catalog, cheapest rarity first.
pub async fn list_catalog(db: &DatabaseConnection) -> Result<Vec<accessory::Model>> {
    Accessory::find()
        .order_by_asc(accessory::Column::Rarity)
        .order_by_asc(accessory::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the accessories a user owns, each paired with its catalog entry.
pub async fn list_owned(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<(user_accessory::Model, accessory::Model)>> {
    let rows = UserAccessory::find()
        .filter(user_accessory::Column::UserId.eq(user_id))
        .find_also_related(Accessory)
        .all(db)
        .await?;

    // The FK guarantees the catalog side exists; a missing row means the
    // catalog entry was deleted underneath the ownership record.
    rows.into_iter()
        .map(|(owned, catalog)| {
            let accessory_id = owned.accessory_id;
            catalog
                .map(|c| (owned, c))
                .ok_or(Error::NotFound { entity: "accessory", id: accessory_id })
        })
        .collect()
}

fn ownership_query(user_id: i64, accessory_id: i64) -> Select<UserAccessory> {
    UserAccessory::find()
        .filter(user_accessory::Column::UserId.eq(user_id))
        .filter(user_accessory::Column::AccessoryId.eq(accessory_id))
}

/// Redeems a catalog accessory for a user.
///
/// The price is [`coin_price`] of the accessory's rarity. Fails with
/// `NotFound` for a missing accessory or user, `Conflict` when already owned,
/// and `InsufficientCoins` when the balance is short. On success the
/// ownership row (not yet equipped) and the coin deduction are committed
/// together.
pub async fn purchase(
    db: &DatabaseConnection,
    user_id: i64,
    accessory_id: i64,
) -> Result<user_accessory::Model> {
    let accessory = Accessory::find_by_id(accessory_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "accessory", id: accessory_id })?;
    let rarity = AccessoryRarity::from_str(&accessory.rarity)?;

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user", id: user_id })?;

    if ownership_query(user_id, accessory_id).one(db).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("accessory {:?} already owned", accessory.name),
        });
    }

    let txn = db.begin().await?;

    let owned = user_accessory::ActiveModel {
        user_id: Set(user_id),
        accessory_id: Set(accessory_id),
        equipped_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    progress::spend_coins(&txn, user_id, coin_price(rarity)).await?;

    txn.commit().await?;

    tracing::debug!(user_id, accessory_id, "accessory redeemed");
    Ok(owned)
}

/// Equips an owned accessory, stamping `equipped_at`.
pub async fn equip(
    db: &DatabaseConnection,
    user_id: i64,
    accessory_id: i64,
) -> Result<user_accessory::Model> {
    let owned = ownership_query(user_id, accessory_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user_accessory", id: accessory_id })?;

    let mut active: user_accessory::ActiveModel = owned.into();
    active.equipped_at = Set(Some(chrono::Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Takes an owned accessory off, clearing `equipped_at`.
pub async fn unequip(
    db: &DatabaseConnection,
    user_id: i64,
    accessory_id: i64,
) -> Result<user_accessory::Model> {
    let owned = ownership_query(user_id, accessory_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "user_accessory", id: accessory_id })?;

    let mut active: user_accessory::ActiveModel = owned.into();
    active.equipped_at = Set(None);
    active.update(db).await.map_err(Into::into)
}
