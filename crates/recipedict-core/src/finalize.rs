//! The finalize pass: runs once per load cycle, after every definition and
//! every collaborator registry has been loaded.
//!
//! 1. **Resolve and validate** both record maps. Each record's requirement
//!    expression is summed into concrete requirements, then the record is
//!    checked against the item, skill and requirement registries. Failing
//!    records are evicted with a diagnostic.
//! 2. **Finish crafting recipes** in ident order: register book knowledge,
//!    resolve default containers, derive autolearn levels, index by category
//!    and component, and clone reversible recipes into the uncraft map.
//! 3. **Synthesize book uncrafts** for books without an explicit one, sized
//!    by page count.

use crate::dictionary::{DictionaryError, Lifecycle, RecipeDictionary, index_record};
use crate::fixed::whole_units;
use crate::id::{ItemTypeId, RecipeKey, SkillId};
use crate::recipe::Recipe;
use crate::registry::{ItemTypes, RecipeWithDescription, Skills};
use crate::requirement::{RequirementCatalog, RequirementData};
use slotmap::SlotMap;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Why a record was dropped during finalize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvictionReason {
    #[error("requirements are blacklisted")]
    Blacklisted,
    #[error("defines invalid result '{0}'")]
    InvalidResult(ItemTypeId),
    #[error("specified charges but result is not counted by charges")]
    ChargesNotStackable,
    #[error("has result_mult but result is not counted by charges")]
    ResultMultNotStackable,
    #[error("defines invalid byproduct '{0}'")]
    InvalidByproduct(ItemTypeId),
    #[error("defines container but not contained")]
    ContainerNotContained,
    #[error("specifies unknown container '{0}'")]
    UnknownContainer(ItemTypeId),
    #[error("uses invalid skill '{0}'")]
    InvalidSkill(SkillId),
    #[error("defines invalid book '{0}'")]
    InvalidBook(ItemTypeId),
}

/// A record removed by finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub ident: String,
    /// Whether it came from the uncraft map.
    pub uncraft: bool,
    pub reason: EvictionReason,
}

/// Summary of one finalize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    pub evicted: Vec<Eviction>,
    /// Reversible recipes cloned into the uncraft map.
    pub reversed: usize,
    /// Uncraft recipes synthesized for books.
    pub book_uncrafts: usize,
}

impl FinalizeReport {
    pub fn was_evicted(&self, ident: &str) -> bool {
        self.evicted.iter().any(|e| e.ident == ident)
    }
}

/// Weighted sum of every referenced requirement set, in expression order.
/// Unknown references contribute nothing.
pub fn resolve_requirements<R>(recipe: &Recipe, catalog: &R) -> RequirementData
where
    R: RequirementCatalog + ?Sized,
{
    recipe
        .reqs
        .iter()
        .fold(RequirementData::default(), |acc, (id, mult)| {
            match catalog.requirement(id) {
                Some(data) => acc + &data.scaled(*mult),
                None => {
                    warn!(recipe = %recipe.ident, requirement = %id, "unknown requirement reference");
                    acc
                }
            }
        })
}

/// Check a record with resolved requirements. Checks run in a fixed order and
/// the first failure wins.
pub fn validate<I, S, R>(
    recipe: &Recipe,
    items: &I,
    skills: &S,
    catalog: &R,
    null_item: &ItemTypeId,
) -> Result<(), EvictionReason>
where
    I: ItemTypes + ?Sized,
    S: Skills + ?Sized,
    R: RequirementCatalog + ?Sized,
{
    if catalog.is_blacklisted(&recipe.requirements) {
        return Err(EvictionReason::Blacklisted);
    }
    if !items.is_defined(&recipe.result) {
        return Err(EvictionReason::InvalidResult(recipe.result.clone()));
    }
    if recipe.charges.is_some() && !items.count_by_charges(&recipe.result) {
        return Err(EvictionReason::ChargesNotStackable);
    }
    if recipe.result_mult != 1 && !items.count_by_charges(&recipe.result) {
        return Err(EvictionReason::ResultMultNotStackable);
    }
    if let Some(bp) = recipe.byproducts.keys().find(|bp| !items.is_defined(bp)) {
        return Err(EvictionReason::InvalidByproduct(bp.clone()));
    }
    if !recipe.contained && recipe.container != *null_item {
        return Err(EvictionReason::ContainerNotContained);
    }
    if recipe.container != *null_item && !items.is_defined(&recipe.container) {
        return Err(EvictionReason::UnknownContainer(recipe.container.clone()));
    }
    let bad_skill = recipe
        .skill_used
        .iter()
        .chain(recipe.required_skills.keys())
        .find(|sk| !skills.is_valid(sk));
    if let Some(skill) = bad_skill {
        return Err(EvictionReason::InvalidSkill(skill.clone()));
    }
    if let Some(book) = recipe.booksets.keys().find(|bk| !items.is_book(bk)) {
        return Err(EvictionReason::InvalidBook(book.clone()));
    }
    Ok(())
}

/// Resolve and validate every record of one owning map, evicting failures
/// from both the map and the arena.
#[allow(clippy::too_many_arguments)]
fn resolve_and_validate<K, I, S, R>(
    store: &mut SlotMap<RecipeKey, Recipe>,
    map: &mut BTreeMap<K, RecipeKey>,
    uncraft: bool,
    items: &I,
    skills: &S,
    catalog: &R,
    null_item: &ItemTypeId,
    report: &mut FinalizeReport,
) where
    K: Ord,
    I: ItemTypes + ?Sized,
    S: Skills + ?Sized,
    R: RequirementCatalog + ?Sized,
{
    map.retain(|_, key| {
        let Some(recipe) = store.get_mut(*key) else {
            return false;
        };
        recipe.requirements = resolve_requirements(recipe, catalog);

        match validate(recipe, items, skills, catalog, null_item) {
            Ok(()) => true,
            Err(reason) => {
                warn!(recipe = %recipe.ident, uncraft, %reason, "evicting recipe");
                report.evicted.push(Eviction {
                    ident: recipe.ident.clone(),
                    uncraft,
                    reason,
                });
                store.remove(*key);
                false
            }
        }
    });
}

impl RecipeDictionary {
    /// Resolve, validate, index and complete every loaded record.
    ///
    /// Every collaborator must be fully populated before this runs. Book
    /// knowledge is appended to `items`. Fails if already finalized in this
    /// load cycle; call [`reset`](Self::reset) to start a new one.
    pub fn finalize<I, S, R>(
        &mut self,
        items: &mut I,
        skills: &S,
        catalog: &R,
    ) -> Result<FinalizeReport, DictionaryError>
    where
        I: ItemTypes + ?Sized,
        S: Skills + ?Sized,
        R: RequirementCatalog + ?Sized,
    {
        if self.state == Lifecycle::Ready {
            return Err(DictionaryError::AlreadyFinalized);
        }
        let mut report = FinalizeReport::default();
        let null_item = self.config.null_item.clone();

        resolve_and_validate(
            &mut self.store,
            &mut self.recipes,
            false,
            &*items,
            skills,
            catalog,
            &null_item,
            &mut report,
        );
        resolve_and_validate(
            &mut self.store,
            &mut self.uncraft,
            true,
            &*items,
            skills,
            catalog,
            &null_item,
            &mut report,
        );

        self.finish_recipes(items, &null_item, &mut report);
        self.synthesize_book_uncrafts(&*items, catalog, &mut report);

        self.state = Lifecycle::Ready;
        info!(
            recipes = self.recipes.len(),
            uncraft = self.uncraft.len(),
            evicted = report.evicted.len(),
            reversed = report.reversed,
            book_uncrafts = report.book_uncrafts,
            "recipe dictionary finalized"
        );
        Ok(report)
    }

    fn finish_recipes<I>(&mut self, items: &mut I, null_item: &ItemTypeId, report: &mut FinalizeReport)
    where
        I: ItemTypes + ?Sized,
    {
        let keys: Vec<RecipeKey> = self.recipes.values().copied().collect();
        for key in keys {
            let Some(recipe) = self.store.get_mut(key) else {
                continue;
            };

            for (book, level) in &recipe.booksets {
                let desc = RecipeWithDescription {
                    recipe: recipe.ident.clone(),
                    skill_level: *level,
                    name: items.display_name(&recipe.result),
                    hidden: false,
                };
                items.add_book_recipe(book, desc);
            }

            if recipe.contained && recipe.container == *null_item {
                recipe.container = items
                    .default_container(&recipe.result)
                    .unwrap_or_else(|| null_item.clone());
            }

            if recipe.autolearn {
                recipe.autolearn_requirements = recipe.required_skills.clone();
                if let Some(skill) = &recipe.skill_used {
                    recipe
                        .autolearn_requirements
                        .insert(skill.clone(), recipe.difficulty);
                }
            }

            index_record(&mut self.category, &mut self.component, key, recipe);

            if recipe.reversible && !self.uncraft.contains_key(&recipe.result) {
                let clone = recipe.clone();
                let result = clone.result.clone();
                let uncraft_key = self.store.insert(clone);
                self.uncraft.insert(result, uncraft_key);
                report.reversed += 1;
            }
        }
    }

    fn synthesize_book_uncrafts<I, R>(&mut self, items: &I, catalog: &R, report: &mut FinalizeReport)
    where
        I: ItemTypes + ?Sized,
        R: RequirementCatalog + ?Sized,
    {
        let template_id = &self.config.book_uncraft_requirement;
        let template = catalog.requirement(template_id).cloned();
        let mut warned = false;

        for id in items.item_type_ids() {
            if !items.is_book(&id) || self.uncraft.contains_key(&id) {
                continue;
            }
            let volume = items.volume_ml(&id);
            if volume == 0 {
                continue;
            }
            if template.is_none() && !warned {
                warn!(requirement = %template_id, "book uncraft requirement missing");
                warned = true;
            }

            let pages = whole_units(volume, self.config.book_page_volume_ml);
            let mut book = Recipe::new_uncraft(id.clone());
            book.container = self.config.null_item.clone();
            book.requirements = template
                .as_ref()
                .map(|data| data.scaled(pages))
                .unwrap_or_default();
            book.time = u32::try_from(pages.saturating_mul(self.config.uncraft_time_per_page))
                .unwrap_or(0);

            debug!(book = %id, pages, time = book.time, "synthesized book uncraft");
            let key = self.store.insert(book);
            self.uncraft.insert(id, key);
            report.book_uncrafts += 1;
        }
    }
}
