//! Weekly plan state machine and session store.
//!
//! [`MealPlanStore`] owns the in-memory [`WeeklyPlan`] for the week in view.
//! The durable copy lives behind [`PlanRepository`] and is synced only on
//! explicit `load`/`save` calls; during an editing session the in-memory
//! plan is the source of truth.
//!
//! Lifecycle: Draft -> (finalize) -> Finalized -> (reset, destructive) ->
//! Draft. Mutations are refused on a finalized plan so the invariant "slots
//! never change after finalize except via reset" holds even when a caller
//! forgets to disable its controls.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::PlanError;
use crate::persistence::PlanRepository;
use crate::types::{Language, MealSlot, MealType, Recipe, WeeklyPlan};

/// Opaque token identifying one loaded plan session.
///
/// Callers capture the token before kicking off async work (AI fallback,
/// recipe fetches) and check [`MealPlanStore::is_current`] before applying a
/// late-arriving result, so results for an abandoned plan are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(Uuid);

#[derive(Debug)]
pub struct MealPlanStore {
    plan: WeeklyPlan,
    session: Uuid,
}

impl MealPlanStore {
    /// Start an empty draft for the given week.
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            plan: WeeklyPlan::new(week_start),
            session: Uuid::new_v4(),
        }
    }

    /// Load the durable copy for `(user, week)`, or start an empty draft if
    /// none was saved yet. Empty slots are pruned on the way in.
    pub async fn load(
        repo: &dyn PlanRepository,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Self, PlanError> {
        let mut plan = repo
            .load_plan(user_id, week_start)
            .await?
            .unwrap_or_else(|| WeeklyPlan::new(week_start));
        plan.slots.retain(|slot| slot.recipe.is_some());
        Ok(Self {
            plan,
            session: Uuid::new_v4(),
        })
    }

    /// Push the in-memory plan to durable storage, replacing the stored copy.
    pub async fn save(&self, repo: &dyn PlanRepository, user_id: Uuid) -> Result<(), PlanError> {
        repo.save_plan(user_id, &self.plan).await?;
        Ok(())
    }

    pub fn plan(&self) -> &WeeklyPlan {
        &self.plan
    }

    pub fn session_token(&self) -> SessionToken {
        SessionToken(self.session)
    }

    /// Whether a previously captured token still refers to this plan session.
    pub fn is_current(&self, token: SessionToken) -> bool {
        token.0 == self.session
    }

    fn ensure_draft(&self) -> Result<(), PlanError> {
        if self.plan.is_finalized {
            Err(PlanError::AlreadyFinalized)
        } else {
            Ok(())
        }
    }

    /// Append a dish to a meal. Duplicate `(day, meal)` pairs are fine; that
    /// is how multiple dishes at one meal are modeled.
    pub fn add_dish(
        &mut self,
        day_of_week: u8,
        meal_type: MealType,
        recipe: Recipe,
    ) -> Result<(), PlanError> {
        self.ensure_draft()?;
        self.plan.slots.push(MealSlot {
            day_of_week,
            meal_type,
            recipe: Some(recipe),
        });
        Ok(())
    }

    /// Remove the first slot matching `(day, meal, recipe_id)`. Only one
    /// instance per call, so duplicate dishes in one meal survive
    /// individually. Returns whether anything was removed.
    pub fn remove_dish(
        &mut self,
        day_of_week: u8,
        meal_type: MealType,
        recipe_id: i64,
    ) -> Result<bool, PlanError> {
        self.ensure_draft()?;
        match self
            .plan
            .slots
            .iter()
            .position(|slot| slot_matches(slot, day_of_week, meal_type, recipe_id))
        {
            Some(index) => {
                self.plan.slots.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Relocate one slot, identified by its `(day, meal, recipe_id)` triple,
    /// to a new day and meal. A no-op when source and destination are the
    /// same or no slot matches; returns whether a slot moved.
    pub fn swap(
        &mut self,
        from_day: u8,
        from_meal: MealType,
        recipe_id: i64,
        to_day: u8,
        to_meal: MealType,
    ) -> Result<bool, PlanError> {
        self.ensure_draft()?;
        if from_day == to_day && from_meal == to_meal {
            return Ok(false);
        }
        let Some(index) = self
            .plan
            .slots
            .iter()
            .position(|slot| slot_matches(slot, from_day, from_meal, recipe_id))
        else {
            return Ok(false);
        };
        self.plan.slots[index].day_of_week = to_day;
        self.plan.slots[index].meal_type = to_meal;
        Ok(true)
    }

    /// Replace the whole slot set, e.g. with a generated plan. Empty slots
    /// are dropped rather than stored.
    pub fn set_slots(&mut self, slots: Vec<MealSlot>) -> Result<(), PlanError> {
        self.ensure_draft()?;
        self.plan.slots = slots
            .into_iter()
            .filter(|slot| slot.recipe.is_some())
            .collect();
        Ok(())
    }

    /// Lock the plan for grocery generation. Rejects an empty plan and
    /// leaves it untouched.
    pub fn finalize(&mut self) -> Result<(), PlanError> {
        if self.plan.slots.is_empty() {
            return Err(PlanError::EmptyPlan);
        }
        self.plan.is_finalized = true;
        Ok(())
    }

    /// Destructive: clears every slot and returns to draft. Also rotates the
    /// session token so in-flight async results against the old plan are
    /// discarded by their callers.
    pub fn reset(&mut self) {
        self.plan.slots.clear();
        self.plan.is_finalized = false;
        self.session = Uuid::new_v4();
    }

    fn meal_count(&self) -> usize {
        self.plan.recipes().count()
    }

    pub fn total_calories(&self) -> u32 {
        self.plan
            .recipes()
            .map(|r| r.calories_per_serving.unwrap_or(0))
            .sum()
    }

    pub fn average_calories_per_meal(&self) -> u32 {
        match self.meal_count() {
            0 => 0,
            n => self.total_calories() / n as u32,
        }
    }

    pub fn total_time_minutes(&self) -> u32 {
        self.plan.recipes().map(Recipe::total_time_minutes).sum()
    }

    pub fn average_time_minutes(&self) -> u32 {
        match self.meal_count() {
            0 => 0,
            n => self.total_time_minutes() / n as u32,
        }
    }

    /// Count of ingredient lines across the plan, in the requested language.
    /// Recipes without ingredient data contribute nothing.
    pub fn ingredient_count(&self, language: Language) -> usize {
        self.plan
            .recipes()
            .filter_map(|r| r.ingredients_for(language))
            .map(|list| list.len())
            .sum()
    }
}

fn slot_matches(slot: &MealSlot, day: u8, meal: MealType, recipe_id: i64) -> bool {
    slot.day_of_week == day
        && slot.meal_type == meal
        && slot.recipe.as_ref().is_some_and(|r| r.id == recipe_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn recipe(id: i64, calories: u32, minutes: u32) -> Recipe {
        Recipe {
            id,
            name: Some(format!("菜 {id}")),
            english_name: Some(format!("Dish {id}")),
            cuisine: None,
            calories_per_serving: Some(calories),
            prep_time_minutes: Some(minutes / 2),
            cook_time_minutes: Some(minutes - minutes / 2),
            tags: vec![],
            ingredients: Some(vec![
                Ingredient { name: "a".to_string(), amount: None },
                Ingredient { name: "b".to_string(), amount: None },
            ]),
            ingredients_en: None,
            instructions: vec![],
            instructions_en: vec![],
        }
    }

    #[test]
    fn test_add_and_remove_one_instance_at_a_time() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(0, MealType::Lunch, recipe(1, 100, 10)).unwrap();
        store.add_dish(0, MealType::Lunch, recipe(1, 100, 10)).unwrap();
        assert_eq!(store.plan().slots.len(), 2);

        assert!(store.remove_dish(0, MealType::Lunch, 1).unwrap());
        assert_eq!(store.plan().slots.len(), 1);

        assert!(store.remove_dish(0, MealType::Lunch, 1).unwrap());
        assert!(!store.remove_dish(0, MealType::Lunch, 1).unwrap());
    }

    #[test]
    fn test_swap_same_slot_is_noop() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(2, MealType::Dinner, recipe(7, 0, 0)).unwrap();
        assert!(!store.swap(2, MealType::Dinner, 7, 2, MealType::Dinner).unwrap());
        assert_eq!(store.plan().slots[0].day_of_week, 2);
    }

    #[test]
    fn test_swap_moves_one_matching_slot() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(0, MealType::Lunch, recipe(1, 0, 0)).unwrap();
        store.add_dish(0, MealType::Lunch, recipe(2, 0, 0)).unwrap();

        assert!(store.swap(0, MealType::Lunch, 2, 4, MealType::Dinner).unwrap());
        let moved = &store.plan().slots[1];
        assert_eq!(moved.day_of_week, 4);
        assert_eq!(moved.meal_type, MealType::Dinner);
        // The other dish stayed put.
        assert_eq!(store.plan().slots[0].day_of_week, 0);
    }

    #[test]
    fn test_finalize_rejects_empty_plan() {
        let mut store = MealPlanStore::new(week());
        assert!(matches!(store.finalize(), Err(PlanError::EmptyPlan)));
        assert!(!store.plan().is_finalized);
    }

    #[test]
    fn test_mutations_refused_after_finalize() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(0, MealType::Lunch, recipe(1, 0, 0)).unwrap();
        store.finalize().unwrap();

        assert!(matches!(
            store.add_dish(1, MealType::Dinner, recipe(2, 0, 0)),
            Err(PlanError::AlreadyFinalized)
        ));
        assert!(matches!(
            store.remove_dish(0, MealType::Lunch, 1),
            Err(PlanError::AlreadyFinalized)
        ));
        assert!(matches!(
            store.swap(0, MealType::Lunch, 1, 1, MealType::Lunch),
            Err(PlanError::AlreadyFinalized)
        ));
        assert_eq!(store.plan().slots.len(), 1);
    }

    #[test]
    fn test_reset_is_destructive_and_rotates_session() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(0, MealType::Lunch, recipe(1, 0, 0)).unwrap();
        store.finalize().unwrap();

        let token = store.session_token();
        store.reset();

        assert!(store.plan().slots.is_empty());
        assert!(!store.plan().is_finalized);
        assert!(!store.is_current(token));
        assert!(store.is_current(store.session_token()));
    }

    #[test]
    fn test_aggregates() {
        let mut store = MealPlanStore::new(week());
        store.add_dish(0, MealType::Lunch, recipe(1, 400, 30)).unwrap();
        store.add_dish(0, MealType::Dinner, recipe(2, 600, 50)).unwrap();

        assert_eq!(store.total_calories(), 1000);
        assert_eq!(store.average_calories_per_meal(), 500);
        assert_eq!(store.total_time_minutes(), 80);
        assert_eq!(store.average_time_minutes(), 40);
        assert_eq!(store.ingredient_count(Language::Zh), 4);
    }

    #[test]
    fn test_aggregates_on_empty_plan_are_zero() {
        let store = MealPlanStore::new(week());
        assert_eq!(store.total_calories(), 0);
        assert_eq!(store.average_calories_per_meal(), 0);
        assert_eq!(store.average_time_minutes(), 0);
        assert_eq!(store.ingredient_count(Language::En), 0);
    }

    #[tokio::test]
    async fn test_load_prunes_empty_slots_and_save_round_trips() {
        use crate::persistence::{MemoryPlanRepository, PlanRepository};

        let repo = MemoryPlanRepository::new();
        let user = Uuid::new_v4();

        let mut plan = WeeklyPlan::new(week());
        plan.slots.push(MealSlot {
            day_of_week: 0,
            meal_type: MealType::Lunch,
            recipe: Some(recipe(1, 0, 0)),
        });
        plan.slots.push(MealSlot {
            day_of_week: 1,
            meal_type: MealType::Dinner,
            recipe: None,
        });
        repo.save_plan(user, &plan).await.unwrap();

        let store = MealPlanStore::load(&repo, user, week()).await.unwrap();
        assert_eq!(store.plan().slots.len(), 1);

        store.save(&repo, user).await.unwrap();
        let stored = repo.load_plan(user, week()).await.unwrap().unwrap();
        assert_eq!(stored.slots.len(), 1);
    }
}
