//! # Copycat
//!
//! Core of a copycat-recipe application: scales and substitutes the
//! ingredient lines of generated recipes, and keeps the free-search quota,
//! premium subscription state and saved recipes in a local key-value store.

pub mod app_config;
pub mod cli;
pub mod clock;
pub mod favorites;
pub mod localization;
pub mod premium;
pub mod quantity_patterns;
pub mod quantity_scaler;
pub mod quota;
pub mod recipe_display;
pub mod recipe_model;
pub mod search;
pub mod storage;
pub mod storage_errors;
pub mod substitution;
