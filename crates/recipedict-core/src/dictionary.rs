//! The recipe dictionary: owning record storage plus derived lookup indices.
//!
//! Records live in a generation-checked arena. The "recipes" map (keyed by
//! ident) and the "uncraft" map (keyed by result item) own arena slots; the
//! category and component indices hold [`RecipeKey`]s that are resolved
//! through the arena on every lookup, so a removed record is never returned.
//!
//! Lifecycle: `Loading` (many loads) -> [`finalize`](RecipeDictionary::finalize)
//! -> `Ready` (read-only queries) -> [`reset`](RecipeDictionary::reset) -> `Loading`.

use crate::config::DictionaryConfig;
use crate::id::{ItemTypeId, RecipeKey};
use crate::recipe::Recipe;
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Where the dictionary is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Loading,
    Ready,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("cannot load '{0}': dictionary is finalized, reset it first")]
    Finalized(String),
    #[error("dictionary was already finalized in this load cycle")]
    AlreadyFinalized,
}

/// Registry of crafting and disassembly recipes.
#[derive(Debug, Default)]
pub struct RecipeDictionary {
    pub(crate) config: DictionaryConfig,
    pub(crate) store: SlotMap<RecipeKey, Recipe>,
    pub(crate) recipes: BTreeMap<String, RecipeKey>,
    pub(crate) uncraft: BTreeMap<ItemTypeId, RecipeKey>,
    pub(crate) category: BTreeMap<String, BTreeSet<RecipeKey>>,
    pub(crate) component: BTreeMap<ItemTypeId, BTreeSet<RecipeKey>>,
    pub(crate) state: Lifecycle,
    null_recipe: Recipe,
}

impl RecipeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DictionaryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == Lifecycle::Ready
    }

    // -----------------------------------------------------------------------
    // Load phase
    // -----------------------------------------------------------------------

    /// Locate or create the crafting recipe keyed `ident`. An existing record
    /// is returned as-is so later definitions override earlier ones field by field.
    pub fn recipe_entry(
        &mut self,
        ident: &str,
        result: &ItemTypeId,
    ) -> Result<&mut Recipe, DictionaryError> {
        self.ensure_loading(ident)?;
        let key = match self.recipes.get(ident) {
            Some(key) => *key,
            None => {
                let mut recipe = Recipe::new(ident, result.clone());
                recipe.container = self.config.null_item.clone();
                let key = self.store.insert(recipe);
                self.recipes.insert(ident.to_string(), key);
                key
            }
        };
        Ok(&mut self.store[key])
    }

    /// Locate or create the uncraft recipe for `result`.
    pub fn uncraft_entry(&mut self, result: &ItemTypeId) -> Result<&mut Recipe, DictionaryError> {
        self.ensure_loading(result.as_str())?;
        let key = match self.uncraft.get(result) {
            Some(key) => *key,
            None => {
                let mut recipe = Recipe::new_uncraft(result.clone());
                recipe.container = self.config.null_item.clone();
                let key = self.store.insert(recipe);
                self.uncraft.insert(result.clone(), key);
                key
            }
        };
        Ok(&mut self.store[key])
    }

    fn ensure_loading(&self, ident: &str) -> Result<(), DictionaryError> {
        match self.state {
            Lifecycle::Loading => Ok(()),
            Lifecycle::Ready => Err(DictionaryError::Finalized(ident.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Recipe by ident, or the null recipe.
    pub fn get(&self, ident: &str) -> &Recipe {
        self.find(ident).unwrap_or(&self.null_recipe)
    }

    pub fn find(&self, ident: &str) -> Option<&Recipe> {
        self.recipes.get(ident).and_then(|key| self.store.get(*key))
    }

    /// Uncraft recipe for an item, or the null recipe.
    pub fn get_uncraft(&self, item: &ItemTypeId) -> &Recipe {
        self.find_uncraft(item).unwrap_or(&self.null_recipe)
    }

    pub fn find_uncraft(&self, item: &ItemTypeId) -> Option<&Recipe> {
        self.uncraft.get(item).and_then(|key| self.store.get(*key))
    }

    /// Recipes filed under a category. Empty for unknown categories.
    pub fn in_category(&self, category: &str) -> Vec<&Recipe> {
        self.resolve(self.category.get(category))
    }

    /// Recipes using an item as a component. Empty for unknown items.
    pub fn of_component(&self, item: &ItemTypeId) -> Vec<&Recipe> {
        self.resolve(self.component.get(item))
    }

    fn resolve(&self, keys: Option<&BTreeSet<RecipeKey>>) -> Vec<&Recipe> {
        keys.into_iter()
            .flatten()
            .filter_map(|key| self.store.get(*key))
            .collect()
    }

    /// Indexed category labels.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category.keys().map(String::as_str)
    }

    /// Crafting recipes in ident order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values().filter_map(|key| self.store.get(*key))
    }

    /// Uncraft recipes in result order.
    pub fn uncraft_recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.uncraft.values().filter_map(|key| self.store.get(*key))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn uncraft_len(&self) -> usize {
        self.uncraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty() && self.uncraft.is_empty()
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drop every record and index and start a new load cycle.
    pub fn reset(&mut self) {
        let dropped = self.store.len();
        self.component.clear();
        self.category.clear();
        self.recipes.clear();
        self.uncraft.clear();
        self.store.clear();
        self.state = Lifecycle::Loading;
        info!(dropped, "recipe dictionary reset");
    }

    /// Remove every crafting and uncraft recipe matching `pred`. Indices are
    /// rebuilt when the dictionary is ready. Returns the number removed.
    pub fn delete_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&Recipe) -> bool,
    {
        let store = &mut self.store;
        let mut removed = 0;
        let mut evict = |key: &RecipeKey| {
            if store.get(*key).is_some_and(&mut pred) {
                store.remove(*key);
                removed += 1;
                false
            } else {
                true
            }
        };
        self.recipes.retain(|_, key| evict(key));
        self.uncraft.retain(|_, key| evict(key));

        if self.state == Lifecycle::Ready {
            self.rebuild_indices();
        }
        removed
    }

    /// Recompute the category and component indices from the crafting recipes.
    pub fn rebuild_indices(&mut self) {
        self.category.clear();
        self.component.clear();
        for key in self.recipes.values() {
            if let Some(recipe) = self.store.get(*key) {
                index_record(&mut self.category, &mut self.component, *key, recipe);
            }
        }
    }
}

/// File `recipe` under its category and under every item named by any
/// alternative of its resolved component groups.
pub(crate) fn index_record(
    category: &mut BTreeMap<String, BTreeSet<RecipeKey>>,
    component: &mut BTreeMap<ItemTypeId, BTreeSet<RecipeKey>>,
    key: RecipeKey,
    recipe: &Recipe,
) {
    category
        .entry(recipe.category.clone())
        .or_default()
        .insert(key);
    for item in recipe.requirements.component_items() {
        component.entry(item.clone()).or_default().insert(key);
    }
}
