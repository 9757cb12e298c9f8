//! # Favorites Store
//!
//! Saved recipes kept in insertion order under the `favorite-recipes` key.
//! Saving a recipe whose id is already present updates it in place and keeps
//! the original save time.

use crate::clock::Clock;
use crate::recipe_model::{clamp_rating, Recipe, SavedRecipe};
use crate::storage::{keys, read_json, write_json, KeyValueStore};
use crate::storage_errors::StorageError;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Saved recipes in insertion order
    pub fn list(&self) -> Result<Vec<SavedRecipe>, StorageError> {
        Ok(read_json::<Vec<SavedRecipe>>(&*self.store, keys::FAVORITE_RECIPES)?.unwrap_or_default())
    }

    /// Look up one saved recipe
    pub fn get(&self, id: &str) -> Result<Option<SavedRecipe>, StorageError> {
        Ok(self.list()?.into_iter().find(|saved| saved.id == id))
    }

    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.get(id)?.is_some())
    }

    /// Save or update a recipe
    ///
    /// The id comes from `recipe.id`; a recipe without one gets a fresh id.
    pub fn upsert(&self, recipe: Recipe, rating: Option<u8>) -> Result<SavedRecipe, StorageError> {
        let id = recipe
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut favorites = self.list()?;
        let saved = match favorites.iter().position(|saved| saved.id == id) {
            Some(index) => {
                let saved_at = favorites[index].saved_at;
                let updated = SavedRecipe::new(id.clone(), recipe, rating, saved_at);
                favorites[index] = updated.clone();
                debug!("Updated saved recipe {}", id);
                updated
            }
            None => {
                let created = SavedRecipe::new(id.clone(), recipe, rating, self.clock.now());
                favorites.push(created.clone());
                info!("Saved new recipe {} ('{}')", id, created.title());
                created
            }
        };

        write_json(&*self.store, keys::FAVORITE_RECIPES, &favorites)?;
        Ok(saved)
    }

    /// Remove by id; unknown ids are ignored
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        let mut favorites = self.list()?;
        let before = favorites.len();
        favorites.retain(|saved| saved.id != id);

        if favorites.len() == before {
            debug!("No saved recipe with id {}", id);
            return Ok(());
        }

        write_json(&*self.store, keys::FAVORITE_RECIPES, &favorites)?;
        info!("Removed saved recipe {}", id);
        Ok(())
    }

    /// Change the rating of a saved recipe; returns false when the id is unknown
    pub fn set_rating(&self, id: &str, rating: Option<u8>) -> Result<bool, StorageError> {
        let mut favorites = self.list()?;
        let Some(saved) = favorites.iter_mut().find(|saved| saved.id == id) else {
            return Ok(false);
        };

        saved.rating = rating.map(clamp_rating);
        write_json(&*self.store, keys::FAVORITE_RECIPES, &favorites)?;
        Ok(true)
    }
}
