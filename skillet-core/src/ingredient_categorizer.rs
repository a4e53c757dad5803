//! Ingredient categorization for shopping-list grouping.
//!
//! Maps ingredient names to a fixed set of store categories by keyword
//! containment. Keyword data is bilingual and loaded from
//! `data/categories.json` at compile time. Category order in the file is the
//! match priority: Produce wins over Meat & Seafood, and so on down to
//! Pantry, with "Other" as the fall-through. This is a deterministic lookup,
//! not a classifier; both the category order and the keyword order within a
//! category are significant and covered by tests.

use serde::Deserialize;
use std::sync::LazyLock;

/// Raw structure of the categories data file. The arrays are ordered.
#[derive(Deserialize)]
struct CategoriesData {
    categories: Vec<CategoryData>,
}

#[derive(Deserialize)]
struct CategoryData {
    name: String,
    keywords: Vec<String>,
}

static CATEGORIES: LazyLock<Vec<CategoryData>> = LazyLock::new(|| {
    let json = include_str!("../data/categories.json");
    let data: CategoriesData =
        serde_json::from_str(json).expect("Failed to parse categories.json");
    data.categories
});

pub const OTHER_CATEGORY: &str = "Other";

/// Map a category name from the data file to its static label.
fn category_to_static(name: &str) -> &'static str {
    match name {
        "Produce" => "Produce",
        "Meat & Seafood" => "Meat & Seafood",
        "Dairy" => "Dairy",
        "Spices & Seasonings" => "Spices & Seasonings",
        "Pantry" => "Pantry",
        _ => OTHER_CATEGORY,
    }
}

/// Categorize an ingredient by name.
///
/// Matching is case-insensitive keyword containment; the first category in
/// priority order whose keyword list matches wins. Unmatched names land in
/// "Other".
pub fn categorize(name: &str) -> &'static str {
    let lower = name.to_lowercase();

    for category in CATEGORIES.iter() {
        if category.keywords.iter().any(|k| lower.contains(k.as_str())) {
            return category_to_static(&category.name);
        }
    }

    OTHER_CATEGORY
}
