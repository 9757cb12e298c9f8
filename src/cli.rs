use crate::premium::PremiumPlan;
use crate::substitution::DietaryMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Copycat recipe scaling, substitution and local state", long_about = None)]
pub struct Cli {
    /// Key-value store file (overrides COPYCAT_STORAGE_PATH)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Message language (overrides COPYCAT_LANGUAGE)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a recipe's ingredient lines for a serving count and diet
    Render {
        /// Path to a recipe JSON file
        recipe_file: PathBuf,
        /// Servings to scale to (defaults to the recipe's own)
        #[arg(short, long)]
        servings: Option<u32>,
        /// none, vegan, glutenFree or dairyFree
        #[arg(short, long, default_value = "none")]
        diet: DietaryMode,
    },
    /// Print the full recipe card for printing or sharing
    Card {
        recipe_file: PathBuf,
        #[arg(short, long)]
        servings: Option<u32>,
        #[arg(short, long, default_value = "none")]
        diet: DietaryMode,
    },
    /// Check the free quota and record a search for a product name
    Search {
        /// Restaurant dish or store product name
        query: String,
    },
    /// Show today's search count and remaining free searches
    Quota,
    /// Manage premium status
    Premium {
        #[command(subcommand)]
        action: PremiumAction,
    },
    /// Manage saved recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PremiumAction {
    /// Show the current status
    Status,
    /// Record a successful checkout
    Activate {
        /// monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        plan: PremiumPlan,
        #[arg(long)]
        subscription_id: Option<String>,
    },
    /// Stop renewal, keeping access until expiry
    Cancel,
    /// Forget all premium state
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List saved recipes
    List,
    /// Save or update a recipe from a JSON file
    Save {
        recipe_file: PathBuf,
        #[arg(short, long)]
        rating: Option<u8>,
    },
    /// Remove a saved recipe
    Remove { id: String },
    /// Rate a saved recipe from 0 to 5
    Rate { id: String, rating: u8 },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
