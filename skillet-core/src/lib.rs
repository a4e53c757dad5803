//! Meal-plan and grocery-list core for the skillet app.
//!
//! The pieces, leaf first:
//! - [`ingredient_normalizer`]: free-text or structured amounts into one
//!   canonical quantity/unit pair
//! - [`ingredient_categorizer`]: bilingual keyword lookup into store aisles
//! - [`grocery_list`]: collapses a finalized week's ingredients into a
//!   deduplicated shopping list, with an AI fallback for recipes that carry
//!   no ingredient data
//! - [`meal_plan`]: the weekly plan state machine (draft/finalize/reset)
//!   and its aggregate queries
//! - [`cuisine`]: tolerant matching of request labels against free-text
//!   cuisine fields
//! - [`plan_generator`]: fills a week of slots from prioritized recipe
//!   sources
//!
//! Everything is synchronous and session-local except the three collaborator
//! seams in [`persistence`] and [`llm`].

pub mod cuisine;
pub mod error;
pub mod grocery_list;
pub mod ingredient_categorizer;
pub mod ingredient_normalizer;
pub mod llm;
pub mod meal_plan;
pub mod persistence;
pub mod plan_generator;
pub mod types;

pub use error::{PersistenceError, PlanError};
pub use grocery_list::generate_grocery_list;
pub use ingredient_categorizer::categorize;
pub use meal_plan::{MealPlanStore, SessionToken};
pub use persistence::{MemoryPlanRepository, PlanRepository, RecipeSource, StaticRecipeSource};
pub use plan_generator::{generate_plan, GeneratedPlan, PlanPreferences};
pub use types::{
    GroceryItem, Ingredient, IngredientAmount, Language, MealSlot, MealType, Recipe, WeeklyPlan,
};
