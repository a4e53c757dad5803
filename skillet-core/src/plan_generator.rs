//! Fills a week of meal slots from prioritized recipe sources.
//!
//! The first source is primary; later sources only supplement it when the
//! filtered primary pool cannot cover the week on its own. Candidates are
//! shuffled per round for variety, and a pool smaller than the slot count is
//! surfaced as an informational repeat notice, never an error.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::PlanError;
use crate::persistence::RecipeSource;
use crate::types::{MealSlot, MealType, Recipe};

pub const DAYS_PER_WEEK: usize = 7;
pub const MEALS_PER_DAY: usize = 2;

/// User preferences applied while building the candidate pool.
#[derive(Debug, Clone, Default)]
pub struct PlanPreferences {
    /// Keywords to exclude; a recipe whose tags or names mention one is out.
    pub allergies: Vec<String>,
    /// Tags to require (soft: ignored when nothing carries them).
    pub diet_preferences: Vec<String>,
    /// Tags to favor when ordering candidates.
    pub flavor_preferences: Vec<String>,
}

/// A generated week of slots.
#[derive(Debug)]
pub struct GeneratedPlan {
    pub slots: Vec<MealSlot>,
    /// True when the candidate pool is smaller than the slot count, so some
    /// recipes appear more than once. Informational, not an error.
    pub repeats_expected: bool,
}

/// Fill all `7 x 2 x dishes_per_meal` slots from the given sources.
///
/// Traversal order is fixed: day 0..6, lunch dishes then dinner dishes,
/// dish index 0..dishes_per_meal-1. Fails with
/// [`PlanError::NoRecipesFound`] only when every source comes back empty.
pub async fn generate_plan<R: Rng + ?Sized>(
    sources: &[&dyn RecipeSource],
    preferences: &PlanPreferences,
    dishes_per_meal: usize,
    rng: &mut R,
) -> Result<GeneratedPlan, PlanError> {
    let dishes_per_meal = dishes_per_meal.max(1);
    let needed = DAYS_PER_WEEK * MEALS_PER_DAY * dishes_per_meal;

    let Some((primary, supplementary)) = sources.split_first() else {
        return Err(PlanError::NoRecipesFound);
    };

    let mut pool = apply_preference_filters(primary.fetch_recipes().await?, preferences);

    // Supplement only while the pool cannot cover the week on its own.
    for source in supplementary {
        if pool.len() >= needed {
            break;
        }
        tracing::debug!(
            source = source.source_name(),
            pool_size = pool.len(),
            needed,
            "supplementing candidate pool"
        );
        let extra = apply_preference_filters(source.fetch_recipes().await?, preferences);
        for recipe in extra {
            if !pool.iter().any(|r| r.id == recipe.id) {
                pool.push(recipe);
            }
        }
    }

    if pool.is_empty() {
        return Err(PlanError::NoRecipesFound);
    }

    let repeats_expected = pool.len() < needed;

    // Shuffle-and-concat rounds until the pool covers every slot; a pool
    // smaller than the slot count cycles, so repeats are unavoidable.
    let mut working: Vec<Recipe> = Vec::with_capacity(needed);
    while working.len() < needed {
        working.extend(build_round(&pool, preferences, rng));
    }
    working.truncate(needed);

    let mut slots = Vec::with_capacity(needed);
    let mut candidates = working.into_iter();
    for day in 0..DAYS_PER_WEEK as u8 {
        for meal_type in [MealType::Lunch, MealType::Dinner] {
            for _ in 0..dishes_per_meal {
                if let Some(recipe) = candidates.next() {
                    slots.push(MealSlot {
                        day_of_week: day,
                        meal_type,
                        recipe: Some(recipe),
                    });
                }
            }
        }
    }

    Ok(GeneratedPlan {
        slots,
        repeats_expected,
    })
}

/// One shuffled pass over the pool, flavor-preferred candidates first.
///
/// The sort is stable, so ordering within the preferred and non-preferred
/// groups stays shuffled; preference only decides which group comes first.
fn build_round<R: Rng + ?Sized>(
    pool: &[Recipe],
    preferences: &PlanPreferences,
    rng: &mut R,
) -> Vec<Recipe> {
    let mut round = pool.to_vec();
    round.shuffle(rng);
    if !preferences.flavor_preferences.is_empty() {
        round.sort_by_key(|r| !has_any_tag(r, &preferences.flavor_preferences));
    }
    round
}

/// Allergy exclusion, then soft diet-tag filtering. Either filter emptying
/// the pool falls back to the pre-filter pool rather than producing zero
/// candidates.
fn apply_preference_filters(recipes: Vec<Recipe>, preferences: &PlanPreferences) -> Vec<Recipe> {
    let base = if preferences.allergies.is_empty() {
        recipes
    } else {
        let safe: Vec<Recipe> = recipes
            .iter()
            .filter(|r| !mentions_any(r, &preferences.allergies))
            .cloned()
            .collect();
        if safe.is_empty() {
            tracing::warn!("allergy filter removed every candidate; keeping unfiltered pool");
            recipes
        } else {
            safe
        }
    };

    if preferences.diet_preferences.is_empty() {
        return base;
    }
    let matching: Vec<Recipe> = base
        .iter()
        .filter(|r| has_any_tag(r, &preferences.diet_preferences))
        .cloned()
        .collect();
    if matching.is_empty() {
        base
    } else {
        matching
    }
}

/// Whether a recipe's tags or either name mention any of the keywords.
fn mentions_any(recipe: &Recipe, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        recipe
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&keyword))
            || recipe
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&keyword))
            || recipe
                .english_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&keyword))
    })
}

fn has_any_tag(recipe: &Recipe, wanted: &[String]) -> bool {
    wanted.iter().any(|want| {
        let want = want.trim().to_lowercase();
        !want.is_empty()
            && recipe
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&want))
    })
}
