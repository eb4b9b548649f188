use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Identifies a recipe record in the dictionary's arena. Generation-checked:
    /// a key for an evicted or deleted record never resolves again.
    pub struct RecipeKey;
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Identifies an item type in the item registry.
    ItemTypeId
}

string_id! {
    /// Identifies a skill in the skill registry.
    SkillId
}

string_id! {
    /// Identifies a named requirement set in the requirement catalog.
    RequirementId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        let a = ItemTypeId::from("hammer");
        let b = ItemTypeId::new("hammer".to_string());
        let c = ItemTypeId::from("saw");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ids_display_as_raw_string() {
        assert_eq!(SkillId::from("fabrication").to_string(), "fabrication");
        assert_eq!(RequirementId::from("uncraft_book").as_str(), "uncraft_book");
    }

    #[test]
    fn ids_are_ordered_for_btree_maps() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(ItemTypeId::from("b"), 2);
        map.insert(ItemTypeId::from("a"), 1);
        let keys: Vec<_> = map.keys().map(ItemTypeId::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
