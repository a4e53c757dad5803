use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skillet_core::llm::provider_from_env;
use skillet_core::{
    generate_grocery_list, generate_plan, Language, MealPlanStore, MealType, PlanPreferences,
    Recipe, StaticRecipeSource,
};

#[derive(Parser)]
#[command(name = "skillet")]
#[command(about = "Weekly meal planning and grocery lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a week of meals from a recipes JSON file
    Plan {
        /// Path to a JSON array of recipes
        recipes: PathBuf,
        /// Dishes per meal (for multi-person households)
        #[arg(long, default_value_t = 1)]
        dishes_per_meal: usize,
        /// Allergy keywords to exclude
        #[arg(long)]
        allergy: Vec<String>,
    },
    /// Generate a plan, finalize it, and print the grocery list
    Grocery {
        /// Path to a JSON array of recipes
        recipes: PathBuf,
        /// Display language: en or zh
        #[arg(long, default_value = "en")]
        language: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            recipes,
            dishes_per_meal,
            allergy,
        } => plan(&recipes, dishes_per_meal, allergy).await,
        Commands::Grocery { recipes, language } => {
            let language = parse_language(&language)?;
            grocery(&recipes, language).await
        }
    }
}

fn parse_language(s: &str) -> Result<Language> {
    match s {
        "en" => Ok(Language::En),
        "zh" => Ok(Language::Zh),
        other => anyhow::bail!("unsupported language: {other} (expected en or zh)"),
    }
}

fn load_recipes(path: &PathBuf) -> Result<Vec<Recipe>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

async fn plan(path: &PathBuf, dishes_per_meal: usize, allergies: Vec<String>) -> Result<()> {
    let source = StaticRecipeSource::new("file", load_recipes(path)?);
    let preferences = PlanPreferences {
        allergies,
        ..Default::default()
    };

    let generated = generate_plan(
        &[&source],
        &preferences,
        dishes_per_meal,
        &mut rand::thread_rng(),
    )
    .await?;

    if generated.repeats_expected {
        println!("Note: not enough recipes for a full week, some will repeat.\n");
    }

    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for (day_index, day) in DAYS.iter().enumerate() {
        for meal_type in [MealType::Lunch, MealType::Dinner] {
            let dishes: Vec<&str> = generated
                .slots
                .iter()
                .filter(|s| s.day_of_week as usize == day_index && s.meal_type == meal_type)
                .filter_map(|s| s.recipe.as_ref())
                .map(|r| r.display_name(Language::En))
                .collect();
            println!("{day} {:6} {}", meal_type.as_str(), dishes.join(" + "));
        }
    }

    Ok(())
}

async fn grocery(path: &PathBuf, language: Language) -> Result<()> {
    let source = StaticRecipeSource::new("file", load_recipes(path)?);
    let generated = generate_plan(
        &[&source],
        &PlanPreferences::default(),
        1,
        &mut rand::thread_rng(),
    )
    .await?;

    let mut store = MealPlanStore::new(current_week_monday());
    store.set_slots(generated.slots)?;
    store.finalize()?;

    let llm = provider_from_env()?;
    let items = generate_grocery_list(store.plan(), language, llm.as_ref()).await?;

    const CATEGORIES: [&str; 6] = [
        "Produce",
        "Meat & Seafood",
        "Dairy",
        "Spices & Seasonings",
        "Pantry",
        "Other",
    ];
    for category in CATEGORIES {
        let group: Vec<_> = items.iter().filter(|i| i.category == category).collect();
        if group.is_empty() {
            continue;
        }
        println!("\n[{category}]");
        for item in group {
            println!("  {} ({} {})", item.name, item.quantity, item.unit);
        }
    }

    Ok(())
}

fn current_week_monday() -> chrono::NaiveDate {
    use chrono::Datelike;
    let today = chrono::Local::now().date_naive();
    today - chrono::Duration::days(today.weekday().num_days_from_monday() as i64)
}
