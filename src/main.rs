use anyhow::{Context, Result};
use copycat::app_config::AppConfig;
use copycat::cli::{parse_args, Command, FavoritesAction, PremiumAction};
use copycat::clock::{Clock, SystemClock};
use copycat::favorites::FavoritesStore;
use copycat::localization::LocalizationManager;
use copycat::premium::{PremiumStatus, PremiumStore, SubscriptionStatus};
use copycat::quota::QuotaTracker;
use copycat::recipe_display::{format_recipe_card, render};
use copycat::recipe_model::{clamp_rating, Recipe};
use copycat::search::{validate_search_query, QueryError, SearchDecision, SearchGate};
use copycat::storage::{FileStore, KeyValueStore};
use copycat::substitution::DietaryMode;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct App {
    quota: QuotaTracker,
    premium: PremiumStore,
    favorites: FavoritesStore,
    messages: LocalizationManager,
    language: String,
}

impl App {
    fn t(&self, key: &str) -> String {
        self.messages.get_message_in_language(key, &self.language, None)
    }

    fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.messages
            .get_message_with_args(key, &self.language, args)
    }

    fn premium_summary(&self, status: &PremiumStatus) -> String {
        let plan = status.plan.as_deref().unwrap_or("premium");
        let expires = status
            .expires_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        match (status.is_premium, status.subscription_status) {
            (true, Some(SubscriptionStatus::Canceled)) => {
                self.t_args("premium-canceled", &[("plan", plan), ("expires", &expires)])
            }
            (true, _) => self.t_args("premium-active", &[("plan", plan), ("expires", &expires)]),
            (false, Some(SubscriptionStatus::Expired)) => self.t("premium-expired"),
            (false, _) => self.t("premium-free"),
        }
    }
}

fn load_recipe(path: &Path) -> Result<Recipe> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse recipe JSON in {}", path.display()))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    let mut config = AppConfig::from_env()?;
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    info!("Opening local state at {}", config.storage_path.display());
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.storage_path).context("Failed to open local state store")?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let app = App {
        quota: QuotaTracker::new(store.clone(), clock.clone(), config.free_search_limit),
        premium: PremiumStore::new(store.clone(), clock.clone()),
        favorites: FavoritesStore::new(store, clock),
        messages: LocalizationManager::new()?,
        language: config.language.clone(),
    };

    match cli.command {
        Command::Render {
            recipe_file,
            servings,
            diet,
        } => {
            let recipe = load_recipe(&recipe_file)?;
            let servings = servings.unwrap_or(recipe.original_servings());
            let customised = servings != recipe.original_servings() || diet != DietaryMode::None;
            if customised && !app.premium.is_premium()? {
                println!("{}", app.t("premium-feature-locked"));
                return Ok(());
            }
            for line in render(&recipe, servings, diet) {
                println!("{}", line);
            }
        }
        Command::Card {
            recipe_file,
            servings,
            diet,
        } => {
            if !app.premium.is_premium()? {
                println!("{}", app.t("premium-feature-locked"));
                return Ok(());
            }
            let recipe = load_recipe(&recipe_file)?;
            let servings = servings.unwrap_or(recipe.original_servings());
            print!("{}", format_recipe_card(&recipe, servings, diet));
        }
        Command::Search { query } => {
            let query = match validate_search_query(&query) {
                Ok(query) => query,
                Err(QueryError::Empty) => {
                    println!("{}", app.t("search-invalid-empty"));
                    return Ok(());
                }
                Err(QueryError::TooLong { max }) => {
                    let max = max.to_string();
                    println!("{}", app.t_args("search-invalid-too-long", &[("max", &max)]));
                    return Ok(());
                }
            };

            let gate = SearchGate::new(&app.quota, &app.premium);
            match gate.check()? {
                SearchDecision::LimitReached { limit } => {
                    let limit = limit.to_string();
                    println!("{}", app.t_args("search-limit-reached", &[("limit", &limit)]));
                }
                decision => {
                    println!("{}", app.t_args("search-started", &[("query", &query)]));
                    gate.record_search()?;
                    if let SearchDecision::Allowed { .. } = decision {
                        let remaining = app.quota.remaining()?.to_string();
                        println!(
                            "{}",
                            app.t_args("search-remaining", &[("remaining", &remaining)])
                        );
                    }
                }
            }
        }
        Command::Quota => {
            if app.premium.is_premium()? {
                println!("{}", app.t("search-premium"));
            } else {
                let remaining = app.quota.remaining()?.to_string();
                println!(
                    "{}",
                    app.t_args("search-remaining", &[("remaining", &remaining)])
                );
            }
        }
        Command::Premium { action } => match action {
            PremiumAction::Status => {
                let status = app.premium.read()?;
                println!("{}", app.premium_summary(&status));
            }
            PremiumAction::Activate {
                plan,
                subscription_id,
            } => {
                let status = app.premium.activate(plan, subscription_id)?;
                println!("{}", app.premium_summary(&status));
            }
            PremiumAction::Cancel => {
                let before = app.premium.read()?;
                app.premium.cancel()?;
                let after = app.premium.read()?;
                if before == after {
                    println!("{}", app.t("premium-cancel-ignored"));
                } else {
                    println!("{}", app.premium_summary(&after));
                }
            }
            PremiumAction::Clear => {
                app.premium.clear()?;
                println!("{}", app.t("premium-cleared"));
            }
        },
        Command::Favorites { action } => match action {
            FavoritesAction::List => {
                let saved = app.favorites.list()?;
                if saved.is_empty() {
                    println!("{}", app.t("favorites-empty"));
                }
                for recipe in saved {
                    println!("{}", recipe);
                }
            }
            FavoritesAction::Save {
                recipe_file,
                rating,
            } => {
                if !app.premium.is_premium()? {
                    println!("{}", app.t("premium-feature-locked"));
                    return Ok(());
                }
                let recipe = load_recipe(&recipe_file)?;
                let saved = app.favorites.upsert(recipe, rating)?;
                println!(
                    "{}",
                    app.t_args("favorites-saved", &[("title", saved.title())])
                );
            }
            FavoritesAction::Remove { id } => {
                if app.favorites.contains(&id)? {
                    app.favorites.remove(&id)?;
                    println!("{}", app.t_args("favorites-removed", &[("id", &id)]));
                } else {
                    println!("{}", app.t_args("favorites-not-found", &[("id", &id)]));
                }
            }
            FavoritesAction::Rate { id, rating } => {
                if app.favorites.set_rating(&id, Some(rating))? {
                    let rating = clamp_rating(rating).to_string();
                    println!(
                        "{}",
                        app.t_args("favorites-rated", &[("id", &id), ("rating", &rating)])
                    );
                } else {
                    println!("{}", app.t_args("favorites-not-found", &[("id", &id)]));
                }
            }
        },
    }

    Ok(())
}
