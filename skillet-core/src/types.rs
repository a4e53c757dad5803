//! Core data types shared across the planning and grocery modules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display languages supported by recipe data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Generic counting noun used when an ingredient carries no usable unit.
    pub fn generic_unit(self) -> &'static str {
        match self {
            Language::En => "item",
            Language::Zh => "个",
        }
    }
}

/// A recipe record owned by the persistence collaborator.
///
/// Either `name` or `english_name` may be absent; `display_name` falls back
/// to whichever one is present. An absent or empty ingredient list means the
/// data is unknown, not that the recipe needs zero ingredients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    /// Free-text cuisine label, not an enum. See [`crate::cuisine`].
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub calories_per_serving: Option<u32>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
    /// Parallel English-localized ingredient list, when available.
    #[serde(default)]
    pub ingredients_en: Option<Vec<Ingredient>>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub instructions_en: Vec<String>,
}

impl Recipe {
    /// Display name in the requested language, falling back to the other
    /// language when the requested one is absent.
    pub fn display_name(&self, language: Language) -> &str {
        let (preferred, fallback) = match language {
            Language::Zh => (&self.name, &self.english_name),
            Language::En => (&self.english_name, &self.name),
        };
        preferred
            .as_deref()
            .or(fallback.as_deref())
            .unwrap_or("")
    }

    /// Ingredient list for the requested language, falling back to the other
    /// language's list when the requested one carries no data. `None` means
    /// the recipe has no ingredient data at all.
    pub fn ingredients_for(&self, language: Language) -> Option<&[Ingredient]> {
        let (preferred, fallback) = match language {
            Language::Zh => (&self.ingredients, &self.ingredients_en),
            Language::En => (&self.ingredients_en, &self.ingredients),
        };
        preferred
            .as_deref()
            .filter(|list| !list.is_empty())
            .or_else(|| fallback.as_deref().filter(|list| !list.is_empty()))
    }

    /// Prep plus cook time, treating missing fields as zero.
    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.unwrap_or(0) + self.cook_time_minutes.unwrap_or(0)
    }
}

/// One ingredient line on a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: Option<IngredientAmount>,
}

/// The two shapes ingredient amounts arrive in from stored data.
///
/// Resolved only by [`crate::ingredient_normalizer`]; downstream code never
/// inspects the variants directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientAmount {
    Structured {
        quantity: f64,
        #[serde(default)]
        unit: Option<String>,
    },
    FreeText(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

/// One (day, meal) assignment within a weekly plan.
///
/// Several slots may share the same `(day_of_week, meal_type)` pair; that
/// models multiple dishes at one meal. A slot with no recipe is semantically
/// empty and gets pruned when a plan is loaded, never stored by mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSlot {
    /// Day of the week, Monday = 0.
    pub day_of_week: u8,
    pub meal_type: MealType,
    pub recipe: Option<Recipe>,
}

/// A week of meal assignments, keyed by the Monday of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub week_start: NaiveDate,
    pub slots: Vec<MealSlot>,
    /// Gates grocery-list generation; set by finalize, cleared by reset.
    pub is_finalized: bool,
}

impl WeeklyPlan {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            slots: Vec::new(),
            is_finalized: false,
        }
    }

    /// Recipes of every non-empty slot, in slot order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.slots.iter().filter_map(|slot| slot.recipe.as_ref())
    }
}

/// One line on the generated shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    /// Rounded up to a whole number during aggregation.
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub checked: bool,
}
