//! Owner balance-and-items ledger.
//!
//! Rings and item counts live in an [`OwnerInventory`] loaded from and
//! saved to the persistence gateway as a unit. Every mutation here is
//! checked before it is applied: a removal can never oversell, an
//! addition can never overflow, and a batched adjustment either applies
//! entirely or not at all.

pub mod error;

use std::collections::BTreeMap;

use garden_types::{Item, OwnerInventory};

pub use error::InventoryError;

/// Whether the owner holds at least `qty` of an item.
pub fn has_item(inventory: &OwnerInventory, item: Item, qty: u64) -> bool {
    inventory.count(item) >= qty
}

/// Add `qty` of an item to the inventory.
pub fn add_item(inventory: &mut OwnerInventory, item: Item, qty: u64) -> Result<(), InventoryError> {
    let entry = inventory.items.entry(item).or_insert(0);
    *entry = entry.checked_add(qty).ok_or_else(|| InventoryError::Overflow {
        context: format!("adding {qty} of {item:?}"),
    })?;
    Ok(())
}

/// Remove `qty` of an item from the inventory.
///
/// Fails without mutating if the owner does not hold enough. Items at
/// zero are removed from the map entirely.
pub fn take_item(
    inventory: &mut OwnerInventory,
    item: Item,
    qty: u64,
) -> Result<(), InventoryError> {
    let available = inventory.count(item);
    if available < qty {
        return Err(InventoryError::InsufficientItem {
            item,
            requested: qty,
            available,
        });
    }
    let remaining = available.saturating_sub(qty);
    if remaining == 0 {
        inventory.items.remove(&item);
    } else {
        inventory.items.insert(item, remaining);
    }
    Ok(())
}

/// Credit rings to the balance.
pub fn credit_rings(inventory: &mut OwnerInventory, amount: u64) -> Result<(), InventoryError> {
    inventory.rings =
        inventory
            .rings
            .checked_add(amount)
            .ok_or_else(|| InventoryError::Overflow {
                context: format!("crediting {amount} rings"),
            })?;
    Ok(())
}

/// Spend rings from the balance.
pub fn spend_rings(inventory: &mut OwnerInventory, amount: u64) -> Result<(), InventoryError> {
    if inventory.rings < amount {
        return Err(InventoryError::InsufficientRings {
            requested: amount,
            available: inventory.rings,
        });
    }
    inventory.rings = inventory.rings.saturating_sub(amount);
    Ok(())
}

/// Apply a batch of signed item deltas atomically.
///
/// Every removal is validated against current holdings before anything
/// is applied, so a failing batch leaves the inventory untouched.
pub fn adjust(
    inventory: &mut OwnerInventory,
    deltas: &BTreeMap<Item, i64>,
) -> Result<(), InventoryError> {
    // Validate every removal first.
    for (&item, &delta) in deltas {
        if delta < 0 {
            let requested = delta.unsigned_abs();
            let available = inventory.count(item);
            if available < requested {
                return Err(InventoryError::InsufficientItem {
                    item,
                    requested,
                    available,
                });
            }
        }
    }
    // All removals are covered; apply the whole batch.
    for (&item, &delta) in deltas {
        if delta < 0 {
            take_item(inventory, item, delta.unsigned_abs())?;
        } else {
            add_item(inventory, item, delta.unsigned_abs())?;
        }
    }
    Ok(())
}
