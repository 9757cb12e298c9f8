//! # Recipe Card Demo
//!
//! Walks through scaling, dietary substitution and card formatting for a
//! single copycat recipe.

use copycat::quantity_scaler::{tokenize, ScalingContext, Token};
use copycat::recipe_display::{format_recipe_card, render};
use copycat::recipe_model::Recipe;
use copycat::substitution::{DietaryMode, SubstitutionTable};

fn main() -> anyhow::Result<()> {
    println!("🧑‍🍳 Copycat Recipe Card Demo\n");

    let recipe = Recipe::new("Copycat Olive Garden Alfredo", 4)
        .with_source("Olive Garden")
        .with_ingredient("1 lb pasta")
        .with_ingredient("1/2 cup butter")
        .with_ingredient("2 cups heavy cream")
        .with_ingredient("1 1/2 cups parmesan cheese")
        .with_ingredient("2 cloves garlic, minced")
        .with_ingredient("salt and pepper to taste")
        .with_instruction("Cook the pasta until al dente.")
        .with_instruction("Melt the butter, add cream and garlic, then stir in the cheese.")
        .with_times("5 min", "20 min");

    // Example 1: Tokenizing a line
    println!("📝 Example 1: Quantity tokens");
    for token in tokenize("Add 1 1/2 cups parmesan and 0.5 tsp salt") {
        match token {
            Token::Literal(text) => println!("  text     {:?}", text),
            Token::Quantity(quantity) => println!("  quantity {:?} = {:?}", quantity.text, quantity.value()),
        }
    }
    println!();

    // Example 2: Stepping servings like the +/- buttons
    println!("📝 Example 2: Adjusting servings");
    let mut context = ScalingContext::new(recipe.original_servings())?;
    for _ in 0..3 {
        context.decrement();
    }
    println!("  {} servings (ratio {:.2})", context.current_servings(), context.ratio());
    for line in render(&recipe, context.current_servings(), DietaryMode::None) {
        println!("  • {}", line);
    }
    println!();

    // Example 3: Dietary modes
    println!("📝 Example 3: Dietary substitutions");
    let table = SubstitutionTable::default();
    println!("  {} substitution keys loaded", table.len());
    for mode in [DietaryMode::Vegan, DietaryMode::GlutenFree, DietaryMode::DairyFree] {
        println!("  {}:", mode);
        for line in render(&recipe, 4, mode) {
            println!("    • {}", line);
        }
    }
    println!();

    // Example 4: Printable card
    println!("📝 Example 4: Recipe card for 6, dairy-free");
    print!("{}", format_recipe_card(&recipe, 6, DietaryMode::DairyFree));

    Ok(())
}
