//! # Recipe Data Model
//!
//! This module defines the recipe records exchanged with the recipe-fetch
//! collaborator and stored in the favorites list.
//!
//! ## Core Concepts
//!
//! - **Recipe**: a copycat recipe as returned by the generator, read-only to the core
//! - **SavedRecipe**: a recipe in the favorites list, keyed by id, with rating and save time
//!
//! ## Usage
//!
//! ```rust
//! use copycat::recipe_model::Recipe;
//!
//! let recipe = Recipe::new("Copycat Cinnamon Rolls", 8)
//!     .with_source("Cinnabon")
//!     .with_ingredient("4 cups flour")
//!     .with_ingredient("1 cup milk")
//!     .with_instruction("Mix everything.");
//!
//! assert_eq!(recipe.ingredients.len(), 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest rating a saved recipe can carry
pub const MAX_RATING: u8 = 5;

fn default_servings() -> u32 {
    1
}

/// A generated copycat recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe title (e.g., "Copycat Chick-fil-A Sauce")
    pub title: String,

    /// The restaurant or store product being recreated
    #[serde(default)]
    pub original_source: String,

    /// Ingredient lines in display order
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Instruction steps in order
    #[serde(default)]
    pub instructions: Vec<String>,

    #[serde(default)]
    pub prep_time: String,

    #[serde(default)]
    pub cook_time: String,

    /// Number of servings the ingredient quantities are written for
    #[serde(default = "default_servings")]
    pub servings: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A recipe stored in the favorites list
///
/// Serialized flat: the recipe fields sit next to `id`, `rating` and
/// `savedAt`. The id is held here only, never in `recipe.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    /// Unique key within the favorites list
    pub id: String,

    #[serde(flatten)]
    pub recipe: Recipe,

    /// User rating between 0 and 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    /// When the recipe was first saved; kept across updates
    pub saved_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a recipe with a title and serving count
    pub fn new(title: &str, servings: u32) -> Self {
        Self {
            title: title.to_string(),
            original_source: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            servings,
            notes: None,
            id: None,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.original_source = source.to_string();
        self
    }

    pub fn with_ingredient(mut self, line: &str) -> Self {
        self.ingredients.push(line.to_string());
        self
    }

    pub fn with_instruction(mut self, step: &str) -> Self {
        self.instructions.push(step.to_string());
        self
    }

    pub fn with_times(mut self, prep_time: &str, cook_time: &str) -> Self {
        self.prep_time = prep_time.to_string();
        self.cook_time = cook_time.to_string();
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Servings the quantities are written for, never below 1
    ///
    /// Fetched recipes occasionally report 0 servings; those are scaled as 1.
    pub fn original_servings(&self) -> u32 {
        self.servings.max(1)
    }
}

impl SavedRecipe {
    /// Wrap a recipe for storage under `id`
    pub fn new(id: String, recipe: Recipe, rating: Option<u8>, saved_at: DateTime<Utc>) -> Self {
        let mut recipe = recipe;
        recipe.id = None;
        Self {
            id,
            recipe,
            rating: rating.map(clamp_rating),
            saved_at,
        }
    }

    pub fn title(&self) -> &str {
        &self.recipe.title
    }

    /// The stored recipe with its id filled back in
    pub fn to_recipe(&self) -> Recipe {
        let mut recipe = self.recipe.clone();
        recipe.id = Some(self.id.clone());
        recipe
    }
}

/// Clamp a rating into 0..=5
pub fn clamp_rating(rating: u8) -> u8 {
    rating.min(MAX_RATING)
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if !self.original_source.is_empty() {
            write!(f, " (inspired by {})", self.original_source)?;
        }
        write!(f, " - serves {}", self.servings)
    }
}

impl fmt::Display for SavedRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.recipe)?;
        if let Some(rating) = self.rating {
            write!(f, " {}", "★".repeat(rating as usize))?;
        }
        Ok(())
    }
}
