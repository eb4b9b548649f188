//! Shared fixtures for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::ItemTypeId;
use crate::registry::{ItemRegistry, ItemTypeDef, SkillRegistry};
use crate::requirement::{
    ItemComp, NO_CHARGES, QualityReq, RequirementCatalog, RequirementData, RequirementStore,
    ToolComp,
};

// ===========================================================================
// Requirement constructors
// ===========================================================================

pub fn comp(item: &str, count: i32) -> ItemComp {
    ItemComp {
        item: ItemTypeId::from(item),
        count,
    }
}

pub fn tool(item: &str, charges: i32) -> ToolComp {
    ToolComp {
        item: ItemTypeId::from(item),
        charges,
    }
}

pub fn quality(id: &str, level: i32) -> QualityReq {
    QualityReq {
        id: id.to_string(),
        level,
        amount: 1,
    }
}

/// A requirement set with one component group per entry.
pub fn components(groups: &[&[(&str, i32)]]) -> RequirementData {
    RequirementData {
        components: groups
            .iter()
            .map(|group| group.iter().map(|(item, n)| comp(item, *n)).collect())
            .collect(),
        ..Default::default()
    }
}

// ===========================================================================
// Registries
// ===========================================================================

/// Furniture, liquids and books.
///
/// - `table` ("wooden table"), `plank`, `log`, `nail`, `paper`, `hammer`
/// - `water` stacks by charges and ships in a `bottle`
/// - `manual` is a 250 ml book, `pamphlet` a zero-volume book
pub fn sample_items() -> ItemRegistry {
    let mut reg = ItemRegistry::new();
    reg.register(ItemTypeDef::new("table").named("wooden table").volume(50_000));
    for plain in ["plank", "log", "nail", "paper", "hammer"] {
        reg.register(ItemTypeDef::new(plain).volume(250));
    }
    reg.register(ItemTypeDef::new("water").by_charges().in_container("bottle"));
    reg.register(ItemTypeDef::new("bottle").volume(500));
    reg.register(ItemTypeDef::new("manual").named("carpentry manual").volume(250).book());
    reg.register(ItemTypeDef::new("pamphlet").book());
    reg
}

pub fn sample_skills() -> SkillRegistry {
    ["fabrication", "survival", "cooking"].into_iter().collect()
}

/// `planks` = [[plank x2 | log x1]], hammer; `nails` = [[nail x10]];
/// `uncraft_book` = [[paper x1]].
pub fn sample_catalog() -> RequirementStore {
    let mut store = RequirementStore::new();
    let mut planks = components(&[&[("plank", 2), ("log", 1)]]);
    planks.tools.push(vec![tool("hammer", NO_CHARGES)]);
    store.register("planks".into(), planks);
    store.register("nails".into(), components(&[&[("nail", 10)]]));
    store.register("uncraft_book".into(), components(&[&[("paper", 1)]]));
    store
}
