//! Lifecycle tests spanning generation, slot editing, finalize, and grocery
//! output.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skillet_core::llm::FakeProvider;
use skillet_core::{
    generate_grocery_list, generate_plan, Ingredient, IngredientAmount, Language, MealPlanStore,
    MealType, PlanError, PlanPreferences, Recipe, StaticRecipeSource, WeeklyPlan,
};

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
}

fn recipe(id: i64, name: &str) -> Recipe {
    Recipe {
        id,
        name: Some(name.to_string()),
        english_name: None,
        cuisine: None,
        calories_per_serving: Some(450),
        prep_time_minutes: Some(10),
        cook_time_minutes: Some(20),
        tags: vec![],
        ingredients: Some(vec![Ingredient {
            name: format!("ingredient {id}"),
            amount: Some(IngredientAmount::FreeText("1 份".to_string())),
        }]),
        ingredients_en: None,
        instructions: vec![],
        instructions_en: vec![],
    }
}

/// Multiset of (day, meal, recipe id) triples, order-insensitive.
fn slot_multiset(store: &MealPlanStore) -> Vec<(u8, MealType, i64)> {
    let mut triples: Vec<(u8, MealType, i64)> = store
        .plan()
        .slots
        .iter()
        .filter_map(|s| s.recipe.as_ref().map(|r| (s.day_of_week, s.meal_type, r.id)))
        .collect();
    triples.sort();
    triples
}

#[test]
fn test_swap_round_trip_restores_the_slot_multiset() {
    let mut store = MealPlanStore::new(week());
    store.add_dish(0, MealType::Lunch, recipe(1, "one")).unwrap();
    store.add_dish(0, MealType::Lunch, recipe(2, "two")).unwrap();
    store.add_dish(3, MealType::Dinner, recipe(3, "three")).unwrap();

    let before = slot_multiset(&store);

    assert!(store.swap(0, MealType::Lunch, 1, 1, MealType::Dinner).unwrap());
    assert_ne!(slot_multiset(&store), before);

    assert!(store.swap(1, MealType::Dinner, 1, 0, MealType::Lunch).unwrap());
    assert_eq!(slot_multiset(&store), before);
}

#[tokio::test]
async fn test_grocery_list_rejects_finalized_but_empty_plan() {
    // A plan can only arrive in this state from outside the store, e.g. a
    // hand-edited stored record; the aggregator still refuses it.
    let mut plan = WeeklyPlan::new(week());
    plan.is_finalized = true;

    let result = generate_grocery_list(&plan, Language::Zh, &FakeProvider::new()).await;
    assert!(matches!(result, Err(PlanError::EmptyPlan)));
}

#[tokio::test]
async fn test_generate_fill_finalize_and_shop() {
    let source = StaticRecipeSource::new(
        "mine",
        (1..=16).map(|i| recipe(i, &format!("菜{i}"))).collect(),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let generated = generate_plan(&[&source], &PlanPreferences::default(), 1, &mut rng)
        .await
        .unwrap();

    let mut store = MealPlanStore::new(week());
    store.set_slots(generated.slots).unwrap();
    store.finalize().unwrap();
    assert_eq!(store.plan().slots.len(), 14);
    assert_eq!(store.total_calories(), 14 * 450);
    assert_eq!(store.average_time_minutes(), 30);

    let items = generate_grocery_list(store.plan(), Language::Zh, &FakeProvider::new())
        .await
        .unwrap();

    // 14 distinct recipes, one distinct ingredient each.
    assert_eq!(items.len(), 14);
    assert!(items.iter().all(|item| item.unit == "份"));
}

#[tokio::test]
async fn test_reset_invalidates_tokens_captured_before_async_work() {
    let source = StaticRecipeSource::new("mine", (1..=5).map(|i| recipe(i, "x")).collect());
    let mut store = MealPlanStore::new(week());
    let token = store.session_token();

    // Async work happens while the token is held...
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let generated = generate_plan(&[&source], &PlanPreferences::default(), 1, &mut rng)
        .await
        .unwrap();

    // ...but the user walked away and the session was reset meanwhile.
    store.reset();

    if store.is_current(token) {
        store.set_slots(generated.slots).unwrap();
    }
    assert!(store.plan().slots.is_empty());
}
