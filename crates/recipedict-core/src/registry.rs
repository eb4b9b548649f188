//! Collaborator registries consulted while finalizing recipes.
//!
//! [`ItemTypes`] and [`Skills`] are the contracts the finalizer depends on.
//! [`ItemRegistry`] and [`SkillRegistry`] are in-memory implementations used
//! by the data loader and tests.

use crate::id::{ItemTypeId, SkillId};
use std::collections::{BTreeMap, BTreeSet};

/// The item type used as the "no container" sentinel.
pub const NULL_ITEM: &str = "null";

/// A recipe a book teaches, appended to the book during finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWithDescription {
    /// Ident of the recipe in the dictionary.
    pub recipe: String,
    /// Minimum skill level needed to learn it from the book.
    pub skill_level: i32,
    /// Display name of the recipe's result.
    pub name: String,
    pub hidden: bool,
}

/// Book facet of an item type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSlot {
    pub recipes: Vec<RecipeWithDescription>,
}

/// Item registry contract.
pub trait ItemTypes {
    fn is_defined(&self, id: &ItemTypeId) -> bool;

    /// Whether the item stacks by charges (ammo, liquids, ...).
    fn count_by_charges(&self, id: &ItemTypeId) -> bool;

    fn is_book(&self, id: &ItemTypeId) -> bool;

    /// Volume in milliliters; zero for unknown types.
    fn volume_ml(&self, id: &ItemTypeId) -> u32;

    /// Container the item spawns in, if it has one.
    fn default_container(&self, id: &ItemTypeId) -> Option<ItemTypeId>;

    fn display_name(&self, id: &ItemTypeId) -> String;

    /// Every known item type, in a stable order.
    fn item_type_ids(&self) -> Vec<ItemTypeId>;

    /// Add to a book's known-recipes collection. An entry for the same recipe
    /// and skill level is replaced rather than duplicated. Ignored for non-books.
    fn add_book_recipe(&mut self, book: &ItemTypeId, desc: RecipeWithDescription);
}

/// Skill registry contract.
pub trait Skills {
    fn is_valid(&self, id: &SkillId) -> bool;
}

/// An item type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTypeDef {
    pub id: ItemTypeId,
    pub name: String,
    pub count_by_charges: bool,
    pub volume_ml: u32,
    pub default_container: Option<ItemTypeId>,
    pub book: Option<BookSlot>,
}

impl ItemTypeDef {
    /// A plain item with no special facets, named after its id.
    pub fn new(id: impl Into<ItemTypeId>) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            count_by_charges: false,
            volume_ml: 0,
            default_container: None,
            book: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn by_charges(mut self) -> Self {
        self.count_by_charges = true;
        self
    }

    pub fn volume(mut self, ml: u32) -> Self {
        self.volume_ml = ml;
        self
    }

    pub fn in_container(mut self, container: impl Into<ItemTypeId>) -> Self {
        self.default_container = Some(container.into());
        self
    }

    pub fn book(mut self) -> Self {
        self.book = Some(BookSlot::default());
        self
    }
}

/// In-memory item registry. The null sentinel is always defined.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: BTreeMap<ItemTypeId, ItemTypeDef>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRegistry {
    pub fn new() -> Self {
        let mut items = BTreeMap::new();
        let null = ItemTypeDef::new(NULL_ITEM).named("none");
        items.insert(null.id.clone(), null);
        Self { items }
    }

    /// Register (or replace) an item type.
    pub fn register(&mut self, def: ItemTypeDef) {
        self.items.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &ItemTypeId) -> Option<&ItemTypeDef> {
        self.items.get(id)
    }

    /// Recipes a book teaches. Empty for unknown items and non-books.
    pub fn book_recipes(&self, id: &ItemTypeId) -> &[RecipeWithDescription] {
        self.items
            .get(id)
            .and_then(|def| def.book.as_ref())
            .map(|book| book.recipes.as_slice())
            .unwrap_or(&[])
    }

    /// Forget every recipe learned by books, keeping the item types.
    pub fn clear_book_recipes(&mut self) {
        for book in self.items.values_mut().filter_map(|def| def.book.as_mut()) {
            book.recipes.clear();
        }
    }

    /// Number of registered item types, including the null sentinel.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemTypes for ItemRegistry {
    fn is_defined(&self, id: &ItemTypeId) -> bool {
        self.items.contains_key(id)
    }

    fn count_by_charges(&self, id: &ItemTypeId) -> bool {
        self.items.get(id).is_some_and(|def| def.count_by_charges)
    }

    fn is_book(&self, id: &ItemTypeId) -> bool {
        self.items.get(id).is_some_and(|def| def.book.is_some())
    }

    fn volume_ml(&self, id: &ItemTypeId) -> u32 {
        self.items.get(id).map_or(0, |def| def.volume_ml)
    }

    fn default_container(&self, id: &ItemTypeId) -> Option<ItemTypeId> {
        self.items.get(id).and_then(|def| def.default_container.clone())
    }

    fn display_name(&self, id: &ItemTypeId) -> String {
        self.items
            .get(id)
            .map_or_else(|| id.0.clone(), |def| def.name.clone())
    }

    fn item_type_ids(&self) -> Vec<ItemTypeId> {
        self.items.keys().cloned().collect()
    }

    fn add_book_recipe(&mut self, book: &ItemTypeId, desc: RecipeWithDescription) {
        let Some(slot) = self.items.get_mut(book).and_then(|def| def.book.as_mut()) else {
            return;
        };
        match slot
            .recipes
            .iter_mut()
            .find(|known| known.recipe == desc.recipe && known.skill_level == desc.skill_level)
        {
            Some(known) => *known = desc,
            None => slot.recipes.push(desc),
        }
    }
}

/// In-memory skill registry.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: BTreeSet<SkillId>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<SkillId>) {
        self.skills.insert(id.into());
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl<S: Into<SkillId>> FromIterator<S> for SkillRegistry {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            skills: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Skills for SkillRegistry {
    fn is_valid(&self, id: &SkillId) -> bool {
        self.skills.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_registry() -> ItemRegistry {
        let mut reg = ItemRegistry::new();
        reg.register(ItemTypeDef::new("water").by_charges().in_container("bottle"));
        reg.register(ItemTypeDef::new("bottle").volume(500));
        reg.register(ItemTypeDef::new("manual").named("carpentry manual").volume(250).book());
        reg
    }

    #[test]
    fn null_sentinel_is_always_defined() {
        let reg = ItemRegistry::new();
        assert!(reg.is_defined(&NULL_ITEM.into()));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn lookups_on_unknown_items_are_neutral() {
        let reg = setup_registry();
        let ghost = ItemTypeId::from("ghost");
        assert!(!reg.is_defined(&ghost));
        assert!(!reg.count_by_charges(&ghost));
        assert!(!reg.is_book(&ghost));
        assert_eq!(reg.volume_ml(&ghost), 0);
        assert_eq!(reg.default_container(&ghost), None);
        assert_eq!(reg.display_name(&ghost), "ghost");
        assert!(reg.book_recipes(&ghost).is_empty());
    }

    #[test]
    fn default_container_is_optional() {
        let reg = setup_registry();
        assert_eq!(reg.default_container(&"water".into()), Some("bottle".into()));
        assert_eq!(reg.default_container(&"bottle".into()), None);
    }

    #[test]
    fn book_recipes_only_attach_to_books() {
        let mut reg = setup_registry();
        let desc = RecipeWithDescription {
            recipe: "table".into(),
            skill_level: 2,
            name: "table".into(),
            hidden: false,
        };
        reg.add_book_recipe(&"manual".into(), desc.clone());
        reg.add_book_recipe(&"bottle".into(), desc.clone());
        assert_eq!(reg.book_recipes(&"manual".into()), &[desc.clone()]);
        assert!(reg.book_recipes(&"bottle".into()).is_empty());

        // Same recipe and level again: replaced, not duplicated.
        reg.add_book_recipe(&"manual".into(), RecipeWithDescription {
            name: "oak table".into(),
            ..desc.clone()
        });
        let known = reg.book_recipes(&"manual".into());
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].name, "oak table");

        // A different level is a separate entry.
        reg.add_book_recipe(&"manual".into(), RecipeWithDescription {
            skill_level: 4,
            ..desc.clone()
        });
        assert_eq!(reg.book_recipes(&"manual".into()).len(), 2);

        reg.clear_book_recipes();
        assert!(reg.book_recipes(&"manual".into()).is_empty());
        assert!(reg.is_book(&"manual".into()));
    }

    #[test]
    fn skill_registry_validity() {
        let skills: SkillRegistry = ["fabrication", "cooking"].into_iter().collect();
        assert!(skills.is_valid(&"cooking".into()));
        assert!(!skills.is_valid(&"juggling".into()));
        assert_eq!(skills.len(), 2);
    }
}
