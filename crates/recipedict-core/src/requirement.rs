//! Component/tool requirement sets and the algebra used to resolve recipe
//! requirement expressions.
//!
//! A [`RequirementData`] holds lists of alternative groups: every group must
//! be satisfied, by any one of its alternatives. Sets combine with `+`
//! (groups naming the same alternatives merge by adding quantities, the rest
//! are appended) and scale with [`RequirementData::scaled`].

use crate::id::{ItemTypeId, RequirementId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;

/// Tool charge count meaning "the tool is needed but no charges are used".
pub const NO_CHARGES: i32 = -1;

/// A consumed component alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemComp {
    pub item: ItemTypeId,
    pub count: i32,
}

/// A tool alternative. `charges` is [`NO_CHARGES`] for tools that are only
/// held, not drained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolComp {
    pub item: ItemTypeId,
    pub charges: i32,
}

/// A tool quality alternative. Qualities are never consumed or scaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReq {
    pub id: String,
    pub level: i32,
    pub amount: i32,
}

/// Anything that can appear as an alternative inside a requirement group.
trait Alternative: Clone {
    fn key(&self) -> String;
    fn absorb(&mut self, other: &Self);
    fn scale(&mut self, factor: i32);
}

impl Alternative for ItemComp {
    fn key(&self) -> String {
        self.item.0.clone()
    }

    fn absorb(&mut self, other: &Self) {
        self.count = self.count.saturating_add(other.count);
    }

    fn scale(&mut self, factor: i32) {
        self.count = self.count.saturating_mul(factor);
    }
}

impl Alternative for ToolComp {
    fn key(&self) -> String {
        self.item.0.clone()
    }

    fn absorb(&mut self, other: &Self) {
        self.charges = match (self.charges > 0, other.charges > 0) {
            (true, true) => self.charges.saturating_add(other.charges),
            (false, true) => other.charges,
            _ => self.charges,
        };
    }

    fn scale(&mut self, factor: i32) {
        if self.charges > 0 {
            self.charges = self.charges.saturating_mul(factor);
        }
    }
}

impl Alternative for QualityReq {
    fn key(&self) -> String {
        format!("{}:{}", self.id, self.level)
    }

    fn absorb(&mut self, other: &Self) {
        self.amount = self.amount.max(other.amount);
    }

    fn scale(&mut self, _factor: i32) {}
}

fn group_keys<T: Alternative>(group: &[T]) -> BTreeSet<String> {
    group.iter().map(Alternative::key).collect()
}

/// Union of group lists: a group whose alternatives match an existing group
/// is merged into it, anything else is appended in order.
fn merge_groups<T: Alternative>(lhs: &mut Vec<Vec<T>>, rhs: &[Vec<T>]) {
    for group in rhs {
        let keys = group_keys(group);
        match lhs.iter_mut().find(|g| group_keys(g) == keys) {
            Some(existing) => {
                for alt in group {
                    if let Some(slot) = existing.iter_mut().find(|a| a.key() == alt.key()) {
                        slot.absorb(alt);
                    }
                }
            }
            None => lhs.push(group.clone()),
        }
    }
}

/// A concrete set of component, tool and quality requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementData {
    #[serde(default)]
    pub components: Vec<Vec<ItemComp>>,
    #[serde(default)]
    pub tools: Vec<Vec<ToolComp>>,
    #[serde(default)]
    pub qualities: Vec<Vec<QualityReq>>,
}

impl RequirementData {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.tools.is_empty() && self.qualities.is_empty()
    }

    /// Distinct item types appearing in any component alternative.
    pub fn component_items(&self) -> BTreeSet<&ItemTypeId> {
        self.components.iter().flatten().map(|c| &c.item).collect()
    }

    /// Returns a copy with component counts and charged tool counts
    /// multiplied by `factor`.
    pub fn scaled(&self, factor: i32) -> Self {
        let mut out = self.clone();
        for alt in out.components.iter_mut().flatten() {
            alt.scale(factor);
        }
        for alt in out.tools.iter_mut().flatten() {
            alt.scale(factor);
        }
        out
    }

    /// True when some component group has no alternative outside `blacklist`.
    pub fn is_blacklisted_by(&self, blacklist: &BTreeSet<ItemTypeId>) -> bool {
        self.components
            .iter()
            .any(|group| !group.is_empty() && group.iter().all(|c| blacklist.contains(&c.item)))
    }
}

impl Add<&RequirementData> for RequirementData {
    type Output = RequirementData;

    fn add(mut self, rhs: &RequirementData) -> RequirementData {
        merge_groups(&mut self.components, &rhs.components);
        merge_groups(&mut self.tools, &rhs.tools);
        merge_groups(&mut self.qualities, &rhs.qualities);
        self
    }
}

impl Add for RequirementData {
    type Output = RequirementData;

    fn add(self, rhs: RequirementData) -> RequirementData {
        self + &rhs
    }
}

// ===========================================================================
// Catalog
// ===========================================================================

/// The external catalog of named requirement sets.
pub trait RequirementCatalog {
    /// Look up a named requirement set.
    fn requirement(&self, id: &RequirementId) -> Option<&RequirementData>;

    /// Register (or replace) a named requirement set.
    fn register(&mut self, id: RequirementId, data: RequirementData);

    /// Whether a resolved set is disallowed.
    fn is_blacklisted(&self, data: &RequirementData) -> bool;
}

/// In-memory requirement catalog with an item blacklist.
#[derive(Debug, Clone, Default)]
pub struct RequirementStore {
    sets: BTreeMap<RequirementId, RequirementData>,
    blacklist: BTreeSet<ItemTypeId>,
}

impl RequirementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an item type as disallowed in any recipe requirement.
    pub fn blacklist_item(&mut self, item: impl Into<ItemTypeId>) {
        self.blacklist.insert(item.into());
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl RequirementCatalog for RequirementStore {
    fn requirement(&self, id: &RequirementId) -> Option<&RequirementData> {
        self.sets.get(id)
    }

    fn register(&mut self, id: RequirementId, data: RequirementData) {
        self.sets.insert(id, data);
    }

    fn is_blacklisted(&self, data: &RequirementData) -> bool {
        data.is_blacklisted_by(&self.blacklist)
    }
}
