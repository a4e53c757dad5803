//! Grocery list aggregation over a finalized weekly plan.
//!
//! Collapses every ingredient occurrence across the plan's recipes into one
//! deduplicated, categorized shopping list. When no recipe carries
//! ingredient data at all, the whole list is delegated to the AI provider as
//! a fallback; its output arrives already categorized and is returned as
//! parsed.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::PlanError;
use crate::ingredient_categorizer::{categorize, OTHER_CATEGORY};
use crate::ingredient_normalizer::normalize_amount;
use crate::llm::LlmProvider;
use crate::types::{GroceryItem, Language, WeeklyPlan};

/// Generate the shopping list for a finalized plan.
///
/// Fails fast with [`PlanError::NotFinalized`] or [`PlanError::EmptyPlan`]
/// before touching any data; never mutates the plan. Two occurrences of the
/// same ingredient name (lowercased, trimmed) merge: quantities sum when the
/// units agree exactly, otherwise the count goes up by a flat 1 because
/// unit-incompatible amounts are counted, not converted.
pub async fn generate_grocery_list(
    plan: &WeeklyPlan,
    language: Language,
    llm: &dyn LlmProvider,
) -> Result<Vec<GroceryItem>, PlanError> {
    if !plan.is_finalized {
        return Err(PlanError::NotFinalized);
    }
    if plan.slots.is_empty() {
        return Err(PlanError::EmptyPlan);
    }

    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, GroceryItem> = HashMap::new();

    for recipe in plan.recipes() {
        let Some(ingredients) = recipe.ingredients_for(language) else {
            continue;
        };
        for ingredient in ingredients {
            let key = ingredient.name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let normalized = normalize_amount(ingredient.amount.as_ref(), language);
            match merged.get_mut(&key) {
                Some(existing) => {
                    if existing.unit == normalized.unit {
                        existing.quantity += normalized.quantity;
                    } else {
                        // Units disagree; count the occurrence instead of
                        // converting between units.
                        existing.quantity += 1.0;
                    }
                }
                None => {
                    merged.insert(
                        key.clone(),
                        GroceryItem {
                            name: ingredient.name.trim().to_string(),
                            quantity: normalized.quantity,
                            unit: normalized.unit,
                            category: categorize(&ingredient.name).to_string(),
                            checked: false,
                        },
                    );
                    order.push(key);
                }
            }
        }
    }

    if merged.is_empty() {
        // No recipe carried ingredient data; ask the AI for the whole list.
        return ai_fallback_list(plan, language, llm).await;
    }

    Ok(order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .map(|mut item| {
            item.name = capitalize_first(&item.name);
            item.quantity = item.quantity.ceil();
            item
        })
        .collect())
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Shape of one item in the AI fallback's JSON array. Absent fields get
/// conservative defaults rather than failing the whole response.
#[derive(Debug, Deserialize)]
struct FallbackItem {
    name: String,
    #[serde(default = "default_quantity")]
    quantity: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

async fn ai_fallback_list(
    plan: &WeeklyPlan,
    language: Language,
    llm: &dyn LlmProvider,
) -> Result<Vec<GroceryItem>, PlanError> {
    let mut names: Vec<&str> = Vec::new();
    for recipe in plan.recipes() {
        let name = recipe.display_name(language);
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    let prompt = build_fallback_prompt(&names, language);
    let response = llm.complete(&prompt).await.inspect_err(|e| {
        tracing::warn!(error = %e, "AI grocery fallback request failed");
    })?;

    parse_fallback_response(&response, language)
}

fn build_fallback_prompt(dish_names: &[&str], language: Language) -> String {
    let dishes = dish_names.join(", ");
    match language {
        Language::En => format!(
            r#"Create a grocery shopping list with everything needed to cook these dishes: {dishes}.

Respond with ONLY a JSON array of objects, no other text. Example format:
[
  {{"name": "Tomato", "quantity": 3, "unit": "item", "category": "Produce"}}
]

"category" must be one of: Produce, Meat & Seafood, Dairy, Spices & Seasonings, Pantry, Other."#
        ),
        Language::Zh => format!(
            r#"请为烹饪以下菜品生成一份购物清单: {dishes}。

只返回一个 JSON 数组, 不要任何其他文字。示例格式:
[
  {{"name": "番茄", "quantity": 3, "unit": "个", "category": "Produce"}}
]

"category" 必须是以下之一: Produce, Meat & Seafood, Dairy, Spices & Seasonings, Pantry, Other。"#
        ),
    }
}

/// Parse the fallback response defensively. Models wrap JSON in markdown
/// fences often enough that we strip them before parsing; anything else
/// malformed becomes [`PlanError::AiFallbackParse`].
fn parse_fallback_response(
    response: &str,
    language: Language,
) -> Result<Vec<GroceryItem>, PlanError> {
    let body = strip_code_fences(response);
    let items: Vec<FallbackItem> = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        PlanError::AiFallbackParse(format!("{e}; response started with: {preview}"))
    })?;

    Ok(items
        .into_iter()
        .map(|item| GroceryItem {
            name: item.name,
            quantity: item.quantity,
            unit: item
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| language.generic_unit().to_string()),
            category: item
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| OTHER_CATEGORY.to_string()),
            checked: false,
        })
        .collect())
}

fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();
    let Some(stripped) = s.strip_prefix("```") else {
        return s;
    };
    let stripped = stripped.strip_prefix("json").unwrap_or(stripped);
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("garlic"), "Garlic");
        assert_eq!(capitalize_first("土豆"), "土豆");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1]"), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
    }

    #[test]
    fn test_parse_fallback_fills_missing_fields() {
        let items =
            parse_fallback_response(r#"[{"name": "salt"}]"#, Language::En).unwrap();
        assert_eq!(items[0].quantity, 1.0);
        assert_eq!(items[0].unit, "item");
        assert_eq!(items[0].category, "Other");
        assert!(!items[0].checked);
    }

    #[test]
    fn test_parse_fallback_rejects_malformed_json() {
        let err = parse_fallback_response("sure! here is your list", Language::En);
        assert!(matches!(err, Err(PlanError::AiFallbackParse(_))));
    }
}
