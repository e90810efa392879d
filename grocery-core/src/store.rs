//! Storage seam for the grocery pipeline.
//!
//! The pipeline reads meal plans and recipes and writes grocery lists through
//! [`GroceryStore`]. Each `generate`/`regenerate` call runs inside a single
//! [`GroceryStore::transaction`], so a database-backed implementation must
//! make that method atomic.

use crate::error::GroceryError;
use crate::types::{GroceryItem, GroceryList, Ingredient, MealPlan, Recipe, RecipeIngredient};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait GroceryStore {
    fn meal_plan(&self, id: Uuid) -> Result<MealPlan, GroceryError>;

    /// Ingredients of a recipe, joined to their ingredient record, in recipe order.
    fn recipe_ingredients(
        &self,
        recipe_id: Uuid,
    ) -> Result<Vec<(RecipeIngredient, Ingredient)>, GroceryError>;

    fn grocery_list(&self, id: Uuid) -> Result<GroceryList, GroceryError>;

    /// Items of a list ordered by sort order, then name.
    fn grocery_items(
        &self,
        list_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<GroceryItem>, GroceryError>;

    fn grocery_item(&self, id: Uuid) -> Result<GroceryItem, GroceryError>;

    fn insert_grocery_list(&mut self, list: &GroceryList) -> Result<(), GroceryError>;

    fn update_grocery_list(&mut self, list: &GroceryList) -> Result<(), GroceryError>;

    fn insert_grocery_item(&mut self, item: &GroceryItem) -> Result<(), GroceryError>;

    fn update_grocery_item(&mut self, item: &GroceryItem) -> Result<(), GroceryError>;

    /// Permanently delete an item.
    fn remove_grocery_item(&mut self, id: Uuid) -> Result<(), GroceryError>;

    /// Run `f` atomically: if it returns `Err`, none of its writes persist.
    fn transaction<T, F>(&mut self, f: F) -> Result<T, GroceryError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, GroceryError>;
}

/// Vec-backed store, loadable from a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    pub meal_plans: Vec<MealPlan>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub grocery_lists: Vec<GroceryList>,
    #[serde(default)]
    pub grocery_items: Vec<GroceryItem>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, GroceryError> {
        serde_json::from_str(json).map_err(|e| GroceryError::Storage(e.to_string()))
    }

    pub fn add_meal_plan(&mut self, plan: MealPlan) {
        self.meal_plans.push(plan);
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }

    fn item_index(&self, id: Uuid) -> Result<usize, GroceryError> {
        self.grocery_items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| GroceryError::not_found("grocery item", id))
    }
}

impl GroceryStore for InMemoryStore {
    fn meal_plan(&self, id: Uuid) -> Result<MealPlan, GroceryError> {
        self.meal_plans
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| GroceryError::not_found("meal plan", id))
    }

    fn recipe_ingredients(
        &self,
        recipe_id: Uuid,
    ) -> Result<Vec<(RecipeIngredient, Ingredient)>, GroceryError> {
        let recipe = self
            .recipes
            .iter()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| GroceryError::not_found("recipe", recipe_id))?;

        recipe
            .ingredients
            .iter()
            .map(|ri| {
                let ingredient = self
                    .ingredients
                    .iter()
                    .find(|i| i.id == ri.ingredient_id)
                    .ok_or_else(|| GroceryError::not_found("ingredient", ri.ingredient_id))?;
                Ok((ri.clone(), ingredient.clone()))
            })
            .collect()
    }

    fn grocery_list(&self, id: Uuid) -> Result<GroceryList, GroceryError> {
        self.grocery_lists
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| GroceryError::not_found("grocery list", id))
    }

    fn grocery_items(
        &self,
        list_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<GroceryItem>, GroceryError> {
        let mut items: Vec<GroceryItem> = self
            .grocery_items
            .iter()
            .filter(|i| i.grocery_list_id == list_id)
            .filter(|i| include_deleted || !i.is_deleted())
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }

    fn grocery_item(&self, id: Uuid) -> Result<GroceryItem, GroceryError> {
        let idx = self.item_index(id)?;
        Ok(self.grocery_items[idx].clone())
    }

    fn insert_grocery_list(&mut self, list: &GroceryList) -> Result<(), GroceryError> {
        if self.grocery_lists.iter().any(|l| l.id == list.id) {
            return Err(GroceryError::Storage(format!(
                "duplicate grocery list id {}",
                list.id
            )));
        }
        self.grocery_lists.push(list.clone());
        Ok(())
    }

    fn update_grocery_list(&mut self, list: &GroceryList) -> Result<(), GroceryError> {
        let existing = self
            .grocery_lists
            .iter_mut()
            .find(|l| l.id == list.id)
            .ok_or_else(|| GroceryError::not_found("grocery list", list.id))?;
        *existing = list.clone();
        Ok(())
    }

    fn insert_grocery_item(&mut self, item: &GroceryItem) -> Result<(), GroceryError> {
        if !self.grocery_lists.iter().any(|l| l.id == item.grocery_list_id) {
            return Err(GroceryError::not_found("grocery list", item.grocery_list_id));
        }
        if self.grocery_items.iter().any(|i| i.id == item.id) {
            return Err(GroceryError::Storage(format!(
                "duplicate grocery item id {}",
                item.id
            )));
        }
        self.grocery_items.push(item.clone());
        Ok(())
    }

    fn update_grocery_item(&mut self, item: &GroceryItem) -> Result<(), GroceryError> {
        let idx = self.item_index(item.id)?;
        self.grocery_items[idx] = item.clone();
        Ok(())
    }

    fn remove_grocery_item(&mut self, id: Uuid) -> Result<(), GroceryError> {
        let idx = self.item_index(id)?;
        self.grocery_items.remove(idx);
        Ok(())
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T, GroceryError>
    where
        F: FnOnce(&mut Self) -> Result<T, GroceryError>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, IngredientLine};
    use chrono::Utc;

    fn store_with_list() -> (InMemoryStore, Uuid) {
        let mut store = InMemoryStore::new();
        let list = GroceryList {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meal_plan_id: None,
            name: "Groceries".to_string(),
            generated_at: Utc::now(),
            regenerated_at: None,
        };
        store.insert_grocery_list(&list).unwrap();
        (store, list.id)
    }

    fn item(list_id: Uuid, name: &str, sort_order: i32) -> GroceryItem {
        GroceryItem::new_manual(
            list_id,
            IngredientLine {
                name: name.to_string(),
                quantity: None,
                unit: None,
                category: Category::Other,
            },
            sort_order,
        )
    }

    #[test]
    fn test_recipe_ingredients_joined_in_order() {
        let mut store = InMemoryStore::new();
        let flour = Ingredient {
            id: Uuid::new_v4(),
            name: "flour".to_string(),
            category: Category::Pantry,
        };
        let milk = Ingredient {
            id: Uuid::new_v4(),
            name: "milk".to_string(),
            category: Category::Dairy,
        };
        let recipe_id = Uuid::new_v4();
        store.add_recipe(Recipe {
            id: recipe_id,
            title: "Pancakes".to_string(),
            ingredients: vec![
                RecipeIngredient {
                    ingredient_id: milk.id,
                    quantity: Some(1.0),
                    unit: None,
                },
                RecipeIngredient {
                    ingredient_id: flour.id,
                    quantity: Some(2.0),
                    unit: None,
                },
            ],
        });
        store.add_ingredient(flour);
        store.add_ingredient(milk);

        let joined = store.recipe_ingredients(recipe_id).unwrap();
        let names: Vec<&str> = joined.iter().map(|(_, i)| i.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "flour"]);
    }

    #[test]
    fn test_missing_records() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.meal_plan(Uuid::new_v4()),
            Err(GroceryError::NotFound {
                entity: "meal plan",
                ..
            })
        ));
        assert!(store.recipe_ingredients(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_items_sorted_and_deleted_filtered() {
        let (mut store, list_id) = store_with_list();
        let mut gone = item(list_id, "apples", 0);
        gone.deleted_at = Some(Utc::now());
        store.insert_grocery_item(&item(list_id, "milk", 2)).unwrap();
        store.insert_grocery_item(&gone).unwrap();
        store.insert_grocery_item(&item(list_id, "bread", 1)).unwrap();

        let live: Vec<String> = store
            .grocery_items(list_id, false)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(live, vec!["bread", "milk"]);
        assert_eq!(store.grocery_items(list_id, true).unwrap().len(), 3);
    }

    #[test]
    fn test_item_requires_existing_list() {
        let mut store = InMemoryStore::new();
        let result = store.insert_grocery_item(&item(Uuid::new_v4(), "milk", 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let (mut store, list_id) = store_with_list();
        let result: Result<(), GroceryError> = store.transaction(|s| {
            s.insert_grocery_item(&item(list_id, "milk", 0))?;
            Err(GroceryError::Storage("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(store.grocery_items(list_id, true).unwrap().is_empty());

        store
            .transaction(|s| s.insert_grocery_item(&item(list_id, "milk", 0)))
            .unwrap();
        assert_eq!(store.grocery_items(list_id, true).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_item() {
        let (mut store, list_id) = store_with_list();
        let milk = item(list_id, "milk", 0);
        store.insert_grocery_item(&milk).unwrap();
        store.remove_grocery_item(milk.id).unwrap();
        assert!(store.grocery_item(milk.id).is_err());
        assert!(store.remove_grocery_item(milk.id).is_err());
    }
}
