use crate::units::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Grocery store section. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Seafood,
    Pantry,
    Frozen,
    Bakery,
    Deli,
    Beverages,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: &'static [Category] = &[
        Category::Produce,
        Category::Dairy,
        Category::Meat,
        Category::Seafood,
        Category::Pantry,
        Category::Frozen,
        Category::Bakery,
        Category::Deli,
        Category::Beverages,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "produce",
            Category::Dairy => "dairy",
            Category::Meat => "meat",
            Category::Seafood => "seafood",
            Category::Pantry => "pantry",
            Category::Frozen => "frozen",
            Category::Bakery => "bakery",
            Category::Deli => "deli",
            Category::Beverages => "beverages",
            Category::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// One ingredient requirement flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Generated,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_plan_id: Option<Uuid>,
    pub name: String,
    pub generated_at: DateTime<Utc>,
    pub regenerated_at: Option<DateTime<Utc>>,
}

impl GroceryList {
    /// Standalone lists have no meal plan and can never be regenerated.
    pub fn is_meal_plan_linked(&self) -> bool {
        self.meal_plan_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: Uuid,
    pub grocery_list_id: Uuid,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub category: Category,
    pub source_type: SourceType,
    /// Snapshot of the generated values, taken on the first user edit.
    #[serde(default)]
    pub original_values: Option<serde_json::Value>,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub purchased_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub sort_order: i32,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when regeneration, not the user, removed the item.
    #[serde(default)]
    pub superseded: bool,
}

impl GroceryItem {
    pub fn new_generated(list_id: Uuid, line: IngredientLine, sort_order: i32) -> Self {
        Self::new(list_id, line, SourceType::Generated, sort_order)
    }

    pub fn new_manual(list_id: Uuid, line: IngredientLine, sort_order: i32) -> Self {
        Self::new(list_id, line, SourceType::Manual, sort_order)
    }

    fn new(list_id: Uuid, line: IngredientLine, source_type: SourceType, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            grocery_list_id: list_id,
            name: line.name,
            quantity: line.quantity,
            unit: line.unit,
            category: line.category,
            source_type,
            original_values: None,
            purchased: false,
            purchased_at: None,
            notes: None,
            sort_order,
            deleted_at: None,
            superseded: false,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_manual(&self) -> bool {
        self.source_type == SourceType::Manual
    }

    /// A generated item the user has changed since it was generated.
    pub fn is_edited(&self) -> bool {
        self.source_type == SourceType::Generated && self.original_values.is_some()
    }

    /// A generated item the user removed from the list.
    pub fn is_user_deleted(&self) -> bool {
        self.source_type == SourceType::Generated && self.is_deleted() && !self.superseded
    }

    /// An untouched generated item that regeneration may replace.
    pub fn is_stale_candidate(&self) -> bool {
        self.source_type == SourceType::Generated
            && !self.is_deleted()
            && self.original_values.is_none()
    }

    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// The values regeneration would have produced, for `original_values`.
    pub fn snapshot_values(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "quantity": self.quantity,
            "unit": self.unit,
            "category": self.category,
        })
    }
}

/// A grocery list with its items eager-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryListWithItems {
    #[serde(flatten)]
    pub list: GroceryList,
    pub items: Vec<GroceryItem>,
}

impl GroceryListWithItems {
    pub fn live_items(&self) -> impl Iterator<Item = &GroceryItem> {
        self.items.iter().filter(|item| !item.is_deleted())
    }

    /// Live items grouped into store sections, ordered by category, then
    /// sort order, then name.
    pub fn items_by_category(&self) -> Vec<(Category, Vec<&GroceryItem>)> {
        let mut sections: BTreeMap<Category, Vec<&GroceryItem>> = BTreeMap::new();
        for item in self.live_items() {
            sections.entry(item.category).or_default().push(item);
        }

        sections
            .into_iter()
            .map(|(category, mut items)| {
                items.sort_by(|a, b| {
                    a.sort_order
                        .cmp(&b.sort_order)
                        .then_with(|| a.name.cmp(&b.name))
                });
                (category, items)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub assignments: Vec<MealAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAssignment {
    pub recipe_id: Uuid,
    /// `None` means the configured default.
    #[serde(default)]
    pub serving_multiplier: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: Uuid,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}
