//! Grocery list generation and regeneration.
//!
//! Both entry points run the same pipeline over a meal plan:
//! collect recipe ingredients, scale each assignment by its serving
//! multiplier, aggregate, then order by category. `generate` writes the result
//! into a new list. `regenerate` reconciles it with an existing list, keeping
//! everything the user did to that list: manual items, edits and deletions.

use crate::aggregate::aggregate;
use crate::config::GeneratorConfig;
use crate::error::GroceryError;
use crate::scaling::scale_ingredients;
use crate::store::GroceryStore;
use crate::types::{GroceryItem, GroceryList, GroceryListWithItems, IngredientLine, MealPlan};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Why regeneration left out a freshly computed ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The user deleted the generated item.
    UserDeleted,
    /// The user edited the generated item.
    UserEdited,
    /// The user already added an item with this name by hand.
    ManualItem,
}

/// What regeneration will change, computed before anything is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegenerationPlan {
    /// Untouched generated items to replace.
    pub stale: Vec<Uuid>,
    /// Fresh lines to add, in insertion order.
    pub additions: Vec<IngredientLine>,
    pub skipped: Vec<(String, SkipReason)>,
    /// Check-off state of stale items, keyed by lowercase name, for the
    /// fresh items that replace them.
    pub purchased: HashMap<String, Option<DateTime<Utc>>>,
}

/// Diff freshly aggregated lines against a list's existing items,
/// soft-deleted ones included.
///
/// Names are compared lowercased and otherwise verbatim.
pub fn plan_regeneration(
    existing: &[GroceryItem],
    fresh: Vec<IngredientLine>,
) -> RegenerationPlan {
    let mut deleted_names = HashSet::new();
    let mut edited_names = HashSet::new();
    let mut manual_names = HashSet::new();
    let mut stale = Vec::new();
    let mut purchased = HashMap::new();

    for item in existing {
        if item.is_manual() {
            manual_names.insert(item.normalized_name());
            continue;
        }
        if item.is_user_deleted() {
            deleted_names.insert(item.normalized_name());
        }
        if item.is_edited() {
            edited_names.insert(item.normalized_name());
        }
        if item.is_stale_candidate() {
            stale.push(item.id);
            if item.purchased {
                purchased.insert(item.normalized_name(), item.purchased_at);
            }
        }
    }

    let mut additions = Vec::new();
    let mut skipped = Vec::new();
    for line in fresh {
        let name = line.name.to_lowercase();
        let reason = if deleted_names.contains(&name) {
            Some(SkipReason::UserDeleted)
        } else if edited_names.contains(&name) {
            Some(SkipReason::UserEdited)
        } else if manual_names.contains(&name) {
            Some(SkipReason::ManualItem)
        } else {
            None
        };

        match reason {
            Some(reason) => skipped.push((line.name, reason)),
            None => additions.push(line),
        }
    }

    RegenerationPlan {
        stale,
        additions,
        skipped,
        purchased,
    }
}

/// Sort order for an item appended after `items`: one past the highest,
/// or 0 for an empty list.
pub(crate) fn next_sort_order(items: &[GroceryItem]) -> Result<i32, GroceryError> {
    match items.iter().map(|item| item.sort_order).max() {
        Some(max) => max.checked_add(1).ok_or_else(sort_order_overflow),
        None => Ok(0),
    }
}

fn sort_order_overflow() -> GroceryError {
    GroceryError::Storage("grocery item sort order overflow".to_string())
}

/// Order lines by category, keeping the incoming order within a category.
pub fn organize_by_category(mut lines: Vec<IngredientLine>) -> Vec<IngredientLine> {
    lines.sort_by_key(|line| line.category);
    lines
}

#[derive(Debug, Clone, Default)]
pub struct GroceryListGenerator {
    config: GeneratorConfig,
}

impl GroceryListGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a new grocery list for a meal plan.
    pub fn generate<S: GroceryStore>(
        &self,
        store: &mut S,
        meal_plan: &MealPlan,
    ) -> Result<GroceryListWithItems, GroceryError> {
        store.transaction(|store| {
            let list = GroceryList {
                id: Uuid::new_v4(),
                user_id: meal_plan.user_id,
                meal_plan_id: Some(meal_plan.id),
                name: self.config.list_name(&meal_plan.name),
                generated_at: Utc::now(),
                regenerated_at: None,
            };
            store.insert_grocery_list(&list)?;

            let lines = organize_by_category(self.fresh_lines(&*store, meal_plan)?);

            let mut items = Vec::with_capacity(lines.len());
            for (sort_order, line) in (0..).zip(lines) {
                let item = GroceryItem::new_generated(list.id, line, sort_order);
                store.insert_grocery_item(&item)?;
                items.push(item);
            }

            tracing::info!(
                list_id = %list.id,
                meal_plan_id = %meal_plan.id,
                items = items.len(),
                "generated grocery list"
            );

            Ok(GroceryListWithItems { list, items })
        })
    }

    /// Bring a meal-plan-linked list up to date with its meal plan.
    ///
    /// Untouched generated items are replaced by freshly computed ones. Manual
    /// items, edited items and items the user deleted are left alone, and no
    /// fresh ingredient is added under one of their names.
    ///
    /// Returns the list with its live items.
    pub fn regenerate<S: GroceryStore>(
        &self,
        store: &mut S,
        list: &GroceryList,
    ) -> Result<GroceryListWithItems, GroceryError> {
        let Some(meal_plan_id) = list.meal_plan_id else {
            return Err(GroceryError::InvalidState(format!(
                "grocery list {} is not linked to a meal plan and cannot be regenerated",
                list.id
            )));
        };

        store.transaction(|store| {
            let existing = store.grocery_items(list.id, true)?;
            let meal_plan = store.meal_plan(meal_plan_id)?;
            let fresh = organize_by_category(self.fresh_lines(&*store, &meal_plan)?);

            let plan = plan_regeneration(&existing, fresh);
            let now = Utc::now();

            for id in &plan.stale {
                let mut item = store.grocery_item(*id)?;
                item.deleted_at = Some(now);
                item.superseded = true;
                store.update_grocery_item(&item)?;
            }

            let start = next_sort_order(&existing)?;
            let added = plan.additions.len();
            for (offset, line) in (0..).zip(plan.additions) {
                let sort_order = start.checked_add(offset).ok_or_else(sort_order_overflow)?;
                let mut item = GroceryItem::new_generated(list.id, line, sort_order);
                if let Some(purchased_at) = plan.purchased.get(&item.normalized_name()) {
                    item.purchased = true;
                    item.purchased_at = *purchased_at;
                }
                store.insert_grocery_item(&item)?;
            }

            for (name, reason) in &plan.skipped {
                tracing::debug!(list_id = %list.id, item = %name, ?reason, "kept user's version");
            }

            let mut list = store.grocery_list(list.id)?;
            list.regenerated_at = Some(now);
            store.update_grocery_list(&list)?;

            tracing::info!(
                list_id = %list.id,
                meal_plan_id = %meal_plan_id,
                purged = plan.stale.len(),
                added,
                skipped = plan.skipped.len(),
                "regenerated grocery list"
            );

            let items = store.grocery_items(list.id, false)?;
            Ok(GroceryListWithItems { list, items })
        })
    }

    /// Collect, scale and aggregate the ingredients of every assignment.
    fn fresh_lines<S: GroceryStore>(
        &self,
        store: &S,
        meal_plan: &MealPlan,
    ) -> Result<Vec<IngredientLine>, GroceryError> {
        let mut lines = Vec::new();
        for assignment in &meal_plan.assignments {
            let recipe_lines: Vec<IngredientLine> = store
                .recipe_ingredients(assignment.recipe_id)?
                .into_iter()
                .map(|(recipe_ingredient, ingredient)| IngredientLine {
                    name: ingredient.name,
                    quantity: recipe_ingredient.quantity,
                    unit: recipe_ingredient.unit,
                    category: ingredient.category,
                })
                .collect();

            let multiplier = self.config.serving_multiplier(assignment.serving_multiplier);
            lines.extend(scale_ingredients(recipe_lines, multiplier));
        }

        let collected = lines.len();
        let aggregated = aggregate(lines);
        tracing::debug!(
            meal_plan_id = %meal_plan.id,
            assignments = meal_plan.assignments.len(),
            collected,
            aggregated = aggregated.len(),
            "computed ingredient lines"
        );

        Ok(aggregated)
    }
}
