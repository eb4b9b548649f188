use crate::fixed::Fixed64;
use crate::id::{ItemTypeId, RequirementId, SkillId};
use crate::registry::NULL_ITEM;
use crate::requirement::RequirementData;
use std::collections::{BTreeMap, BTreeSet};

/// A crafting or disassembly ("uncraft") definition.
///
/// Built incrementally by the loader, then resolved and validated in place by
/// [`RecipeDictionary::finalize`](crate::dictionary::RecipeDictionary::finalize).
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// `result + id_suffix`.
    pub ident: String,
    pub result: ItemTypeId,

    pub category: String,
    pub subcategory: String,
    pub flags: BTreeSet<String>,

    pub time: u32,
    pub difficulty: i32,
    /// Charges of the result, when overridden. Only valid for charge-stacking results.
    pub charges: Option<i32>,
    pub result_mult: i32,
    /// Fraction of time saved per batch item once `batch_rsize` is reached.
    pub batch_rscale: Fixed64,
    pub batch_rsize: i32,

    pub skill_used: Option<SkillId>,
    pub required_skills: BTreeMap<SkillId, i32>,
    /// Derive autolearn requirements from the required skills at finalize.
    pub autolearn: bool,
    pub autolearn_requirements: BTreeMap<SkillId, i32>,
    pub learn_by_disassembly: BTreeMap<SkillId, i32>,

    pub contained: bool,
    pub container: ItemTypeId,

    pub byproducts: BTreeMap<ItemTypeId, i32>,
    /// Book item type -> minimum skill level to learn from it.
    pub booksets: BTreeMap<ItemTypeId, i32>,

    /// Unresolved requirement expression: catalog references with multipliers.
    pub reqs: Vec<(RequirementId, i32)>,
    /// Resolved requirements. Only meaningful after finalize.
    pub requirements: RequirementData,

    pub reversible: bool,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            ident: String::new(),
            result: ItemTypeId::from(NULL_ITEM),
            category: String::new(),
            subcategory: String::new(),
            flags: BTreeSet::new(),
            time: 0,
            difficulty: 0,
            charges: None,
            result_mult: 1,
            batch_rscale: Fixed64::ZERO,
            batch_rsize: 0,
            skill_used: None,
            required_skills: BTreeMap::new(),
            autolearn: false,
            autolearn_requirements: BTreeMap::new(),
            learn_by_disassembly: BTreeMap::new(),
            contained: false,
            container: ItemTypeId::from(NULL_ITEM),
            byproducts: BTreeMap::new(),
            booksets: BTreeMap::new(),
            reqs: Vec::new(),
            requirements: RequirementData::default(),
            reversible: false,
        }
    }
}

impl Recipe {
    /// A fresh crafting recipe.
    pub fn new(ident: impl Into<String>, result: impl Into<ItemTypeId>) -> Self {
        Self {
            ident: ident.into(),
            result: result.into(),
            ..Self::default()
        }
    }

    /// A fresh disassembly recipe; these are always reversible.
    pub fn new_uncraft(result: impl Into<ItemTypeId>) -> Self {
        let result = result.into();
        Self {
            ident: result.0.clone(),
            result,
            reversible: true,
            ..Self::default()
        }
    }

    /// The null recipe returned by lookups that miss.
    pub fn is_null(&self) -> bool {
        self.ident.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Time to craft a batch of `batch` results, applying the batch discount
    /// to every item past the first once the batch reaches `batch_rsize`.
    pub fn batch_time(&self, batch: i32) -> u32 {
        let batch = batch.max(1);
        let single = Fixed64::saturating_from_num(self.time);
        if self.batch_rsize <= 0 || batch < self.batch_rsize || self.batch_rscale <= Fixed64::ZERO
        {
            return single
                .saturating_mul(Fixed64::saturating_from_num(batch))
                .saturating_to_num::<u32>();
        }
        let discounted = single * Fixed64::ONE.saturating_sub(self.batch_rscale).max(Fixed64::ZERO);
        let total = single.saturating_add(discounted.saturating_mul(Fixed64::saturating_from_num(batch - 1)));
        total.saturating_to_num::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::percent_to_ratio;

    #[test]
    fn defaults() {
        let r = Recipe::new("plank", "plank");
        assert_eq!(r.difficulty, 0);
        assert_eq!(r.time, 0);
        assert_eq!(r.result_mult, 1);
        assert!(!r.reversible);
        assert!(!r.contained);
        assert_eq!(r.container.as_str(), NULL_ITEM);
        assert!(r.charges.is_none());
        assert!(!r.is_null());
    }

    #[test]
    fn uncraft_defaults_to_reversible() {
        let r = Recipe::new_uncraft("radio");
        assert!(r.reversible);
        assert_eq!(r.ident, "radio");
        assert_eq!(r.result.as_str(), "radio");
    }

    #[test]
    fn default_is_null() {
        assert!(Recipe::default().is_null());
    }

    #[test]
    fn batch_time_without_discount() {
        let mut r = Recipe::new("nail", "nail");
        r.time = 100;
        assert_eq!(r.batch_time(3), 300);
        assert_eq!(r.batch_time(0), 100);
    }

    #[test]
    fn batch_time_with_discount_past_threshold() {
        let mut r = Recipe::new("nail", "nail");
        r.time = 100;
        r.batch_rscale = percent_to_ratio(50);
        r.batch_rsize = 4;
        assert_eq!(r.batch_time(3), 300);
        assert_eq!(r.batch_time(4), 250);
    }
}
