//! # Recipe Display Adapter
//!
//! Derives the ingredient lines shown for a recipe at a chosen serving count
//! and dietary mode, and formats the plain-text recipe card used for
//! printing and sharing. Nothing here mutates the source recipe.

use crate::quantity_scaler::scale_line;
use crate::recipe_model::Recipe;
use crate::substitution::{DietaryMode, SubstitutionTable};
use std::fmt::Write;
use tracing::debug;

/// Renders recipes against a substitution table
pub struct RecipeDisplay<'a> {
    table: &'a SubstitutionTable,
}

impl Default for RecipeDisplay<'static> {
    fn default() -> Self {
        Self {
            table: SubstitutionTable::shared(),
        }
    }
}

impl<'a> RecipeDisplay<'a> {
    pub fn new(table: &'a SubstitutionTable) -> Self {
        Self { table }
    }

    /// Ingredient lines scaled to `current_servings`, then substituted for `mode`
    pub fn render(&self, recipe: &Recipe, current_servings: u32, mode: DietaryMode) -> Vec<String> {
        let current_servings = current_servings.max(1);
        let ratio = current_servings as f64 / recipe.original_servings() as f64;

        debug!(
            "Rendering '{}' for {} servings (ratio {:.3}, mode {})",
            recipe.title, current_servings, ratio, mode
        );

        recipe
            .ingredients
            .iter()
            .map(|line| {
                let scaled = scale_line(line, ratio);
                if mode == DietaryMode::None {
                    scaled
                } else {
                    self.table.substitute(&scaled, mode)
                }
            })
            .collect()
    }

    /// Plain-text recipe card for printing or sharing
    pub fn format_recipe_card(
        &self,
        recipe: &Recipe,
        current_servings: u32,
        mode: DietaryMode,
    ) -> String {
        let current_servings = current_servings.max(1);
        let mut card = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(card, "{}", recipe.title);
        if !recipe.original_source.is_empty() {
            let _ = writeln!(card, "Inspired by: {}", recipe.original_source);
        }
        let _ = writeln!(card, "Servings: {}", current_servings);
        if !recipe.prep_time.is_empty() {
            let _ = writeln!(card, "Prep time: {}", recipe.prep_time);
        }
        if !recipe.cook_time.is_empty() {
            let _ = writeln!(card, "Cook time: {}", recipe.cook_time);
        }
        if mode != DietaryMode::None {
            let _ = writeln!(card, "Dietary mode: {}", mode);
        }

        let _ = writeln!(card, "\nIngredients:");
        for line in self.render(recipe, current_servings, mode) {
            let _ = writeln!(card, "- {}", line);
        }

        if !recipe.instructions.is_empty() {
            let _ = writeln!(card, "\nInstructions:");
            for (i, step) in recipe.instructions.iter().enumerate() {
                let _ = writeln!(card, "{}. {}", i + 1, step);
            }
        }

        if let Some(notes) = &recipe.notes {
            let _ = writeln!(card, "\nNotes: {}", notes);
        }

        card
    }
}

/// Render with the built-in substitution table
pub fn render(recipe: &Recipe, current_servings: u32, mode: DietaryMode) -> Vec<String> {
    RecipeDisplay::default().render(recipe, current_servings, mode)
}

/// Format a recipe card with the built-in substitution table
pub fn format_recipe_card(recipe: &Recipe, current_servings: u32, mode: DietaryMode) -> String {
    RecipeDisplay::default().format_recipe_card(recipe, current_servings, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitution::SubstitutionEntry;

    fn pancakes() -> Recipe {
        Recipe::new("Copycat IHOP Pancakes", 4)
            .with_source("IHOP")
            .with_ingredient("1 1/2 cups flour")
            .with_ingredient("2 eggs")
            .with_ingredient("1 cup milk")
            .with_ingredient("salt to taste")
            .with_instruction("Whisk the dry ingredients.")
            .with_instruction("Add the wet ingredients and cook.")
            .with_times("10 min", "15 min")
    }

    #[test]
    fn test_render_original_size() {
        let lines = render(&pancakes(), 4, DietaryMode::None);
        assert_eq!(
            lines,
            vec!["1.5 cups flour", "2 eggs", "1 cup milk", "salt to taste"]
        );
    }

    #[test]
    fn test_render_scaled_and_substituted() {
        let lines = render(&pancakes(), 8, DietaryMode::Vegan);
        assert_eq!(lines[0], "3.0 cups flour");
        assert_eq!(
            lines[1],
            "4 flax eggs (1 tbsp ground flaxseed + 3 tbsp water each)"
        );
        assert_eq!(lines[2], "2 cup almond milk, soy milk, or oat milk");
        assert_eq!(lines[3], "salt to taste");
    }

    #[test]
    fn test_render_does_not_mutate_source() {
        let recipe = pancakes();
        let before = recipe.clone();
        let _ = render(&recipe, 2, DietaryMode::GlutenFree);
        assert_eq!(recipe, before);
    }

    #[test]
    fn test_render_is_deterministic() {
        let recipe = pancakes();
        assert_eq!(
            render(&recipe, 6, DietaryMode::DairyFree),
            render(&recipe, 6, DietaryMode::DairyFree)
        );
    }

    #[test]
    fn test_render_with_custom_table() {
        let table =
            SubstitutionTable::new(vec![SubstitutionEntry::new("flour").gluten_free("rice flour")])
                .unwrap();
        let display = RecipeDisplay::new(&table);
        let lines = display.render(&pancakes(), 4, DietaryMode::GlutenFree);
        assert_eq!(lines[0], "1.5 cups rice flour");
    }

    #[test]
    fn test_zero_servings_clamped() {
        let lines = render(&pancakes(), 0, DietaryMode::None);
        assert_eq!(lines[1], "1 eggs");
    }

    #[test]
    fn test_recipe_card() {
        let card = format_recipe_card(&pancakes(), 2, DietaryMode::None);
        assert!(card.starts_with("Copycat IHOP Pancakes\n"));
        assert!(card.contains("Inspired by: IHOP"));
        assert!(card.contains("Servings: 2"));
        assert!(card.contains("- 0.8 cups flour"));
        assert!(card.contains("1. Whisk the dry ingredients."));
        assert!(card.contains("2. Add the wet ingredients and cook."));
        assert!(!card.contains("Dietary mode"));
        assert!(!card.contains("Notes:"));
    }
}
