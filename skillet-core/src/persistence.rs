//! Collaborator seams: durable plan storage and recipe sources.
//!
//! The core owns the in-memory plan during an editing session; these traits
//! are the only points where it crosses the process boundary. In-memory
//! implementations ship for tests and the demo CLI.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::types::{Recipe, WeeklyPlan};

/// Durable storage for weekly plans, keyed by `(user, week_start)`.
///
/// The contract is last-write-wins: `save_plan` replaces the stored plan
/// wholesale, the item set is never diffed.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn load_plan(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyPlan>, PersistenceError>;

    async fn save_plan(&self, user_id: Uuid, plan: &WeeklyPlan) -> Result<(), PersistenceError>;
}

/// A source of recipes for plan generation, e.g. the user's own collection
/// or a shared published pool.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, PersistenceError>;

    fn source_name(&self) -> &str;
}

/// In-memory plan repository.
#[derive(Debug, Default)]
pub struct MemoryPlanRepository {
    plans: RwLock<HashMap<(Uuid, NaiveDate), WeeklyPlan>>,
}

impl MemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for MemoryPlanRepository {
    async fn load_plan(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyPlan>, PersistenceError> {
        let plans = self
            .plans
            .read()
            .map_err(|_| PersistenceError::Backend("plan store lock poisoned".to_string()))?;
        Ok(plans.get(&(user_id, week_start)).cloned())
    }

    async fn save_plan(&self, user_id: Uuid, plan: &WeeklyPlan) -> Result<(), PersistenceError> {
        let mut plans = self
            .plans
            .write()
            .map_err(|_| PersistenceError::Backend("plan store lock poisoned".to_string()))?;
        plans.insert((user_id, plan.week_start), plan.clone());
        Ok(())
    }
}

/// Recipe source backed by a fixed list.
#[derive(Debug)]
pub struct StaticRecipeSource {
    name: String,
    recipes: Vec<Recipe>,
}

impl StaticRecipeSource {
    pub fn new(name: impl Into<String>, recipes: Vec<Recipe>) -> Self {
        Self {
            name: name.into(),
            recipes,
        }
    }
}

#[async_trait]
impl RecipeSource for StaticRecipeSource {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, PersistenceError> {
        Ok(self.recipes.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
