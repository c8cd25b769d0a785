//! Marmite CLI: recipe backend with MCP server.
//!
//! Usage:
//!   marmite mcp [--transport stdio] [--db path] [--user name]
//!   marmite recipe <subcommand>
//!   marmite shopping <subcommand> --user name
//!   marmite ingredient search <query>

use clap::{Args, Parser, Subcommand};
use marmite::{
    ApiError, Config, Difficulty, MarmiteApi, RecipeDraft, RecipeQuery, ShoppingList, StaticAuth,
    UserId,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marmite", version, about = "Recipe-sharing backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Act as this user
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP (Model Context Protocol) server
    Mcp {
        /// Transport type (currently only stdio)
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Manage your shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingAction,
    },
    /// Look up ingredients
    Ingredient {
        #[command(subcommand)]
        action: IngredientAction,
    },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// Publish a recipe from a JSON file
    Create {
        /// JSON file holding the recipe
        file: PathBuf,
    },
    /// List recipes, newest first
    List(ListArgs),
    /// Show one recipe as JSON
    Show {
        /// Recipe ID
        id: String,
    },
    /// Delete one of your recipes
    Delete {
        /// Recipe ID
        id: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Name contains this text
    #[arg(long)]
    name: Option<String>,
    /// facile, moyen or difficile
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Carries this tag
    #[arg(long)]
    tag: Option<String>,
    /// Written by this user
    #[arg(long)]
    author: Option<String>,
    /// Maximum prep + cook minutes
    #[arg(long)]
    max_minutes: Option<u32>,
    /// Maximum total calories
    #[arg(long)]
    max_calories: Option<u32>,
    #[arg(long, default_value_t = 0)]
    offset: usize,
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Subcommand)]
enum ShoppingAction {
    /// Show your shopping list
    Show,
    /// Add a recipe's ingredients
    AddRecipe {
        /// Recipe ID
        id: String,
        /// Servings multiplier
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
    },
    /// Take a recipe's ingredients back off
    RemoveRecipe {
        /// Recipe ID
        id: String,
    },
    /// Add a manual item
    Add {
        name: String,
        quantity: f64,
        unit: String,
    },
    /// Check or uncheck an item
    Toggle {
        /// Item ID
        id: String,
    },
    /// Remove one item
    Remove {
        /// Item ID
        id: String,
    },
    /// Remove checked items
    ClearChecked,
    /// Empty the list
    Clear,
}

#[derive(Subcommand)]
enum IngredientAction {
    /// Suggest ingredients matching a name
    Search {
        query: String,
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config =
        Config::load(cli.config.as_deref()).map_err(|e| format!("Invalid configuration: {}", e))?;
    if let Some(ref db) = cli.db {
        config.db_path = db.clone();
    }
    if let Some(ref user) = cli.user {
        config.user = Some(user.clone());
    }
    Ok(config)
}

fn open_api(config: &Config) -> Result<MarmiteApi, String> {
    let auth = Arc::new(StaticAuth::from_option(config.user.clone()));
    MarmiteApi::open(config, auth).map_err(|e| e.to_string())
}

fn report(e: &ApiError) -> i32 {
    match e {
        ApiError::Invalid(v) => {
            eprintln!("Error: invalid recipe");
            for field in &v.errors {
                eprintln!("  {}: {}", field.field, field.message);
            }
        }
        ApiError::Unauthenticated => eprintln!("Error: pass --user or set MARMITE_USER"),
        other => eprintln!("Error: {}", other),
    }
    1
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

// --- recipe ---

fn cmd_recipe_create(api: &MarmiteApi, file: &Path) -> i32 {
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return 1;
        }
    };
    let draft: RecipeDraft = match serde_json::from_str(&text) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: '{}' is not a valid recipe: {}", file.display(), e);
            return 1;
        }
    };
    match api.create_recipe(draft) {
        Ok(recipe) => {
            println!(
                "Created recipe '{}' ({}), {} kcal",
                recipe.name, recipe.id, recipe.total_calories
            );
            0
        }
        Err(e) => report(&e),
    }
}

fn cmd_recipe_list(api: &MarmiteApi, args: ListArgs) -> i32 {
    let query = RecipeQuery {
        name_contains: args.name,
        difficulty: args.difficulty,
        tag: args.tag,
        author: args.author.map(UserId::from),
        max_total_minutes: args.max_minutes,
        max_calories: args.max_calories,
        offset: Some(args.offset),
        limit: Some(args.limit),
    };
    let result = api.list_recipes(&query);
    if result.is_empty() {
        println!("No recipes found.");
        return 0;
    }
    println!("{:<36}  {:<28}  {:<9}  {:>5}  {:>6}", "ID", "NAME", "LEVEL", "MIN", "KCAL");
    println!("{}", "-".repeat(92));
    for recipe in &result.recipes {
        println!(
            "{:<36}  {:<28}  {:<9}  {:>5}  {:>6}",
            recipe.id,
            recipe.name,
            recipe.difficulty,
            recipe.total_minutes(),
            recipe.total_calories
        );
    }
    println!("{} of {} recipes", result.recipes.len(), result.total_count);
    0
}

fn cmd_recipe_show(api: &MarmiteApi, id: &str) -> i32 {
    match api.get_recipe(id) {
        Ok(recipe) => print_json(&recipe),
        Err(e) => report(&e),
    }
}

fn cmd_recipe_delete(api: &MarmiteApi, id: &str) -> i32 {
    match api.delete_recipe(id) {
        Ok(recipe) => {
            println!("Deleted recipe '{}'", recipe.name);
            0
        }
        Err(e) => report(&e),
    }
}

// --- shopping ---

fn print_list(list: &ShoppingList) -> i32 {
    if list.items.is_empty() {
        println!("Shopping list is empty.");
        return 0;
    }
    println!("{:<36}  {:<3}  {:<28}  {:>10}  {:<8}", "ID", "", "NAME", "QTY", "UNIT");
    println!("{}", "-".repeat(92));
    for item in &list.items {
        println!(
            "{:<36}  {:<3}  {:<28}  {:>10}  {:<8}",
            item.id,
            if item.checked { "[x]" } else { "[ ]" },
            item.name,
            format!("{:.2}", item.quantity),
            item.unit
        );
    }
    0
}

fn run_shopping(api: &MarmiteApi, action: ShoppingAction) -> i32 {
    let result = match action {
        ShoppingAction::Show => api.shopping_list(),
        ShoppingAction::AddRecipe { id, servings } => api.add_recipe_to_list(&id, servings),
        ShoppingAction::RemoveRecipe { id } => api.remove_recipe_from_list(&id),
        ShoppingAction::Add { name, quantity, unit } => {
            api.add_list_item(&name, quantity, &unit, None)
        }
        ShoppingAction::Toggle { id } => api.toggle_list_item(&id),
        ShoppingAction::Remove { id } => api.remove_list_item(&id),
        ShoppingAction::ClearChecked => {
            return match api.clear_checked_items() {
                Ok(removed) => {
                    println!("Removed {} checked item(s)", removed);
                    0
                }
                Err(e) => report(&e),
            };
        }
        ShoppingAction::Clear => api.clear_shopping_list(),
    };
    match result {
        Ok(list) => print_list(&list),
        Err(e) => report(&e),
    }
}

// --- ingredient ---

fn cmd_ingredient_search(api: &MarmiteApi, query: &str, limit: usize) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            return 1;
        }
    };
    let suggestions = rt.block_on(api.search_ingredients(query, limit));
    if suggestions.is_empty() {
        println!("No match for '{}'. Add it manually with its nutrition per 100 g.", query.trim());
        return 0;
    }
    println!("{:<32}  {:<8}  {:>7}  {:>6}  {:>6}  {:>6}", "NAME", "SOURCE", "KCAL", "PROT", "CARB", "FAT");
    println!("{}", "-".repeat(74));
    for s in &suggestions {
        println!(
            "{:<32}  {:<8}  {:>7.1}  {:>6.1}  {:>6.1}  {:>6.1}",
            s.name, s.source, s.calories, s.proteins, s.carbs, s.fat
        );
    }
    0
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Commands::Mcp { ref transport } = cli.command {
        if transport != "stdio" {
            eprintln!("error: only 'stdio' transport is currently supported");
            std::process::exit(1);
        }
        let code = marmite::mcp::run_mcp_server(&config);
        std::process::exit(code);
    }

    let api = match open_api(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Mcp { .. } => 0,
        Commands::Recipe { action } => match action {
            RecipeAction::Create { file } => cmd_recipe_create(&api, &file),
            RecipeAction::List(args) => cmd_recipe_list(&api, args),
            RecipeAction::Show { id } => cmd_recipe_show(&api, &id),
            RecipeAction::Delete { id } => cmd_recipe_delete(&api, &id),
        },
        Commands::Shopping { action } => run_shopping(&api, action),
        Commands::Ingredient { action } => match action {
            IngredientAction::Search { query, limit } => {
                cmd_ingredient_search(&api, &query, limit.unwrap_or(config.search_limit))
            }
        },
    };
    std::process::exit(code);
}
