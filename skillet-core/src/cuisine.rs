//! Cuisine label matching for conversational plan requests.
//!
//! Recipe cuisine is free text, not an enum, so a request like "chinese" has
//! to resolve against whatever labels users actually stored. The matcher is
//! a deliberate fall-through chain, most exact check first, so near-miss
//! labels degrade to substring containment instead of returning nothing.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::Recipe;

/// Casual request labels mapped to the canonical labels stored on recipes.
static CUISINE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("chinese", "中式"),
        ("sichuan", "川菜"),
        ("szechuan", "川菜"),
        ("cantonese", "粤菜"),
        ("hunan", "湘菜"),
        ("shandong", "鲁菜"),
        ("northeastern", "东北菜"),
        ("dongbei", "东北菜"),
        ("xinjiang", "新疆菜"),
        ("italian", "意式"),
        ("japanese", "日式"),
        ("korean", "韩式"),
        ("french", "法式"),
        ("thai", "泰式"),
        ("indian", "印度菜"),
        ("mexican", "墨西哥菜"),
        ("western", "西式"),
    ])
});

/// Regional labels that all count as Chinese cuisine.
static CHINESE_VARIANTS: &[&str] = &[
    "中式", "川菜", "粤菜", "湘菜", "鲁菜", "苏菜", "浙菜", "闽菜", "徽菜",
    "东北菜", "新疆菜", "家常菜",
];

/// Whether a recipe's cuisine label satisfies a requested cuisine.
///
/// Check order (each step falls through to the next):
/// 1. "any" matches everything
/// 2. a recipe without a cuisine matches nothing
/// 3. alias resolution ("sichuan" -> "川菜") against the stored label
/// 4. exact match of the raw request
/// 5. Chinese-family request matches any regional Chinese variant
/// 6. substring containment in either direction
pub fn matches(recipe_cuisine: Option<&str>, requested: &str) -> bool {
    if requested == "any" {
        return true;
    }
    let Some(cuisine) = recipe_cuisine else {
        return false;
    };

    let cuisine = cuisine.trim();
    let cuisine_lower = cuisine.to_lowercase();
    let requested_lower = requested.trim().to_lowercase();

    let resolved = CUISINE_ALIASES.get(requested_lower.as_str()).copied();
    if resolved == Some(cuisine) {
        return true;
    }

    if cuisine_lower == requested_lower {
        return true;
    }

    // Only the family-wide label widens to every regional variant; a
    // regional request like "sichuan" must not.
    let chinese_family = requested_lower == "chinese" || resolved == Some("中式");
    if chinese_family && CHINESE_VARIANTS.contains(&cuisine) {
        return true;
    }

    cuisine_lower.contains(&requested_lower) || requested_lower.contains(&cuisine_lower)
}

/// Select recipes for a requested cuisine label.
///
/// When nothing matches on the cuisine field, fall back to tag containment
/// so a near-miss request still returns candidates rather than an empty set.
pub fn filter_by_cuisine<'a>(recipes: &'a [Recipe], requested: &str) -> Vec<&'a Recipe> {
    let matched: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| matches(r.cuisine.as_deref(), requested))
        .collect();
    if !matched.is_empty() {
        return matched;
    }

    let requested_lower = requested.trim().to_lowercase();
    recipes
        .iter()
        .filter(|r| {
            r.tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&requested_lower))
        })
        .collect()
}
