//! Tunables for loading and finalizing the recipe dictionary.

use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::id::{ItemTypeId, RequirementId};
use crate::registry::NULL_ITEM;
use serde::{Deserialize, Deserializer};

/// Dictionary configuration. Every field has a default, so a config file
/// only needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Upper clamp for recipe difficulty.
    pub max_skill: i32,
    /// Prefix of the per-recipe inline requirement name.
    pub inline_prefix: String,
    /// Book volume that makes up one page when uncrafting books.
    #[serde(deserialize_with = "fixed_from_f64")]
    pub book_page_volume_ml: Fixed64,
    pub uncraft_time_per_page: i32,
    /// Catalog entry scaled by page count for book uncrafts.
    pub book_uncraft_requirement: RequirementId,
    /// The "no container" sentinel.
    pub null_item: ItemTypeId,
}

fn fixed_from_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Fixed64, D::Error> {
    let v = f64::deserialize(de)?;
    Fixed64::checked_from_num(v)
        .ok_or_else(|| serde::de::Error::custom(format!("{v} out of fixed-point range")))
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            max_skill: 10,
            inline_prefix: "inline_recipe_".to_string(),
            book_page_volume_ml: f64_to_fixed64(12.5),
            uncraft_time_per_page: 10,
            book_uncraft_requirement: RequirementId::from("uncraft_book"),
            null_item: ItemTypeId::from(NULL_ITEM),
        }
    }
}

impl DictionaryConfig {
    /// Name of the inline requirement synthesized for a recipe ident.
    pub fn inline_requirement(&self, ident: &str) -> RequirementId {
        RequirementId(format!("{}{ident}", self.inline_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = DictionaryConfig::default();
        assert_eq!(cfg.max_skill, 10);
        assert_eq!(cfg.book_page_volume_ml, Fixed64::from_num(12.5));
        assert_eq!(cfg.uncraft_time_per_page, 10);
        assert_eq!(cfg.book_uncraft_requirement.as_str(), "uncraft_book");
        assert_eq!(cfg.null_item.as_str(), "null");
    }

    #[test]
    fn inline_requirement_name() {
        let cfg = DictionaryConfig::default();
        assert_eq!(cfg.inline_requirement("hammer_v2").as_str(), "inline_recipe_hammer_v2");
    }
}
