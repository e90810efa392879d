use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grocery_core::{
    convert, GeneratorConfig, GroceryListGenerator, GroceryStore, InMemoryStore, Unit,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "grocery")]
#[command(about = "Grocery list generation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new grocery list from a meal plan in a store snapshot
    Generate {
        /// JSON store snapshot (meal plans, recipes, ingredients, lists)
        #[arg(long)]
        data: PathBuf,
        /// Meal plan to generate from
        #[arg(long)]
        meal_plan: Uuid,
        /// Write the updated snapshot here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Regenerate an existing list against its meal plan
    Regenerate {
        /// JSON store snapshot (meal plans, recipes, ingredients, lists)
        #[arg(long)]
        data: PathBuf,
        /// Grocery list to regenerate
        #[arg(long)]
        list: Uuid,
        /// Write the updated snapshot here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Convert a quantity between two units
    Convert {
        quantity: f64,
        from: Unit,
        to: Unit,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            data,
            meal_plan,
            save,
        } => {
            let mut store = load_store(&data)?;
            let generator = GroceryListGenerator::new(GeneratorConfig::from_env()?);
            let plan = store.meal_plan(meal_plan)?;
            let list = generator.generate(&mut store, &plan)?;
            println!("{}", serde_json::to_string_pretty(&list)?);
            if let Some(path) = save {
                save_store(&store, &path)?;
            }
        }
        Commands::Regenerate { data, list, save } => {
            let mut store = load_store(&data)?;
            let generator = GroceryListGenerator::new(GeneratorConfig::from_env()?);
            let existing = store.grocery_list(list)?;
            if !existing.is_meal_plan_linked() {
                anyhow::bail!(
                    "List {} is standalone and has no meal plan to regenerate from",
                    list
                );
            }
            let list = generator.regenerate(&mut store, &existing)?;
            println!("{}", serde_json::to_string_pretty(&list)?);
            if let Some(path) = save {
                save_store(&store, &path)?;
            }
        }
        Commands::Convert { quantity, from, to } => {
            let converted = convert(quantity, from, to)?;
            println!("{} {}", converted, to);
        }
    }

    Ok(())
}

fn load_store(path: &Path) -> Result<InMemoryStore> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let store = InMemoryStore::from_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        meal_plans = store.meal_plans.len(),
        recipes = store.recipes.len(),
        lists = store.grocery_lists.len(),
        "loaded store snapshot"
    );
    Ok(store)
}

fn save_store(store: &InMemoryStore, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved store snapshot");
    Ok(())
}
