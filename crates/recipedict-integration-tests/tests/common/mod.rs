//! Helpers shared by the integration tests.

#![allow(dead_code)]

use recipedict_core::dictionary::RecipeDictionary;
use recipedict_core::requirement::RequirementStore;
use recipedict_data::load_recipe;
use recipedict_data::schema::RecipeDefinition;

/// Route `tracing` output to the test harness. Set `RUST_LOG=debug` to see
/// eviction and synthesis diagnostics.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn def(json: &str) -> RecipeDefinition {
    serde_json::from_str(json).unwrap()
}

/// Load crafting definitions given as JSON objects.
pub fn load_recipes(dict: &mut RecipeDictionary, catalog: &mut RequirementStore, defs: &[&str]) {
    for json in defs {
        load_recipe(dict, &def(json), false, catalog).unwrap();
    }
}

/// Load uncraft definitions given as JSON objects.
pub fn load_uncrafts(dict: &mut RecipeDictionary, catalog: &mut RequirementStore, defs: &[&str]) {
    for json in defs {
        load_recipe(dict, &def(json), true, catalog).unwrap();
    }
}
