//! User-driven changes to grocery items.
//!
//! These set the markers regeneration relies on: editing a generated item
//! snapshots its generated values into `original_values`, and deleting a
//! generated item soft-deletes it so regeneration won't bring it back.

use crate::error::GroceryError;
use crate::generator::next_sort_order;
use crate::store::GroceryStore;
use crate::types::{Category, GroceryItem, IngredientLine};
use crate::units::Unit;
use chrono::Utc;
use uuid::Uuid;

/// Partial update of an item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub category: Option<Category>,
    pub notes: Option<String>,
}

/// Add a hand-typed item after everything already on the list.
pub fn add_manual_item<S: GroceryStore>(
    store: &mut S,
    list_id: Uuid,
    line: IngredientLine,
) -> Result<GroceryItem, GroceryError> {
    store.transaction(|store| {
        store.grocery_list(list_id)?;
        let sort_order = next_sort_order(&store.grocery_items(list_id, true)?)?;

        let item = GroceryItem::new_manual(list_id, line, sort_order);
        store.insert_grocery_item(&item)?;
        Ok(item)
    })
}

pub fn edit_item<S: GroceryStore>(
    store: &mut S,
    item_id: Uuid,
    edit: ItemEdit,
) -> Result<GroceryItem, GroceryError> {
    let mut item = live_item(&*store, item_id)?;

    // Any change to a generated item, notes included, marks it as the user's.
    if !item.is_manual() && item.original_values.is_none() && edit != ItemEdit::default() {
        item.original_values = Some(item.snapshot_values());
    }

    if let Some(name) = edit.name {
        item.name = name;
    }
    if let Some(quantity) = edit.quantity {
        item.quantity = Some(quantity);
    }
    if let Some(unit) = edit.unit {
        item.unit = Some(unit);
    }
    if let Some(category) = edit.category {
        item.category = category;
    }
    if let Some(notes) = edit.notes {
        item.notes = Some(notes);
    }

    store.update_grocery_item(&item)?;
    Ok(item)
}

/// Remove an item from its list.
///
/// Manual items are deleted outright. Generated items are soft-deleted so
/// that regenerating the list respects the deletion.
pub fn delete_item<S: GroceryStore>(store: &mut S, item_id: Uuid) -> Result<(), GroceryError> {
    let mut item = live_item(&*store, item_id)?;

    if item.is_manual() {
        return store.remove_grocery_item(item_id);
    }

    item.deleted_at = Some(Utc::now());
    item.superseded = false;
    store.update_grocery_item(&item)
}

pub fn set_purchased<S: GroceryStore>(
    store: &mut S,
    item_id: Uuid,
    purchased: bool,
) -> Result<GroceryItem, GroceryError> {
    let mut item = live_item(&*store, item_id)?;
    if item.purchased != purchased {
        item.purchased = purchased;
        item.purchased_at = purchased.then(Utc::now);
        store.update_grocery_item(&item)?;
    }
    Ok(item)
}

fn live_item<S: GroceryStore>(store: &S, item_id: Uuid) -> Result<GroceryItem, GroceryError> {
    let item = store.grocery_item(item_id)?;
    if item.is_deleted() {
        return Err(GroceryError::not_found("grocery item", item_id));
    }
    Ok(item)
}
