pub mod aggregate;
pub mod config;
pub mod error;
pub mod generator;
pub mod items;
pub mod scaling;
pub mod store;
pub mod types;
pub mod units;

pub use aggregate::{aggregate, UnitClass};
pub use config::{ConfigError, GeneratorConfig};
pub use error::{GroceryError, UnitError};
pub use generator::{
    organize_by_category, plan_regeneration, GroceryListGenerator, RegenerationPlan, SkipReason,
};
pub use items::{add_manual_item, delete_item, edit_item, set_purchased, ItemEdit};
pub use scaling::{scale, scale_ingredients};
pub use store::{GroceryStore, InMemoryStore};
pub use types::{
    Category, GroceryItem, GroceryList, GroceryListWithItems, Ingredient, IngredientLine,
    MealAssignment, MealPlan, Recipe, RecipeIngredient, SourceType,
};
pub use units::{convert, Dimension, Unit};
