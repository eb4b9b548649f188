//! Recipe dictionary core: records, requirement algebra, collaborator
//! registries and the two-phase load/finalize pipeline.
//!
//! # Load Cycle
//!
//! 1. **Load** -- definitions are applied in any order with
//!    [`dictionary::RecipeDictionary::recipe_entry`] /
//!    [`dictionary::RecipeDictionary::uncraft_entry`]; later definitions
//!    override earlier ones field by field.
//! 2. **Finalize** -- once every definition and every collaborator registry
//!    is loaded, [`dictionary::RecipeDictionary::finalize`] resolves
//!    requirement expressions, evicts invalid records, builds the category
//!    and component indices and synthesizes implicit uncraft recipes.
//! 3. **Query** -- lookups never fail; misses return the null recipe or an
//!    empty list.
//! 4. **Reset** -- [`dictionary::RecipeDictionary::reset`] drops everything
//!    before the next data set is loaded.
//!
//! # Key Types
//!
//! - [`recipe::Recipe`] -- a crafting or disassembly record.
//! - [`requirement::RequirementData`] -- component/tool/quality groups with
//!   `+` and [`requirement::RequirementData::scaled`].
//! - [`registry::ItemTypes`], [`registry::Skills`],
//!   [`requirement::RequirementCatalog`] -- collaborator contracts.
//! - [`finalize::FinalizeReport`] -- evictions and synthesized records.

pub mod config;
pub mod dictionary;
pub mod finalize;
pub mod fixed;
pub mod id;
pub mod recipe;
pub mod registry;
pub mod requirement;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
