//! Serde data file structs for recipe definitions and the content they
//! reference.
//!
//! Every field that accepts more than one shape is an untagged enum, so the
//! shape is decided once when the file is parsed. Fields are `Option`s:
//! absent means "leave the record's current value alone".

use recipedict_core::requirement::{ItemComp, QualityReq, RequirementData, ToolComp};
use serde::Deserialize;

// ===========================================================================
// Recipes
// ===========================================================================

/// Whether a definition describes a crafting or a disassembly recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    #[default]
    Recipe,
    Uncraft,
}

/// `skills_required`: `[]` clears, `["skill", 2]` sets one, `[["a", 1], ["b", 2]]` sets many.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillsRequiredData {
    Many(Vec<(String, i32)>),
    One(String, i32),
}

/// `autolearn`: `true`/`false`, or explicit `[["skill", level], ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AutolearnData {
    Flag(bool),
    Explicit(Vec<(String, i32)>),
}

/// `decomp_learn`: a level for the recipe's `skill_used`, or explicit pairs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DecompLearnData {
    Level(i32),
    Explicit(Vec<(String, i32)>),
}

/// A byproduct entry: `["item", count]` or `["item"]` for a count of one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ByproductData {
    Counted(String, i32),
    Single([String; 1]),
}

impl ByproductData {
    pub fn item(&self) -> &str {
        match self {
            ByproductData::Counted(item, _) => item,
            ByproductData::Single([item]) => item,
        }
    }

    pub fn count(&self) -> i32 {
        match self {
            ByproductData::Counted(_, count) => *count,
            ByproductData::Single(_) => 1,
        }
    }
}

/// `using`: one requirement name at multiplier 1, or `[["name", mult], ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UsingData {
    Single(String),
    Weighted(Vec<(String, i32)>),
}

/// A tool quality requirement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QualityData {
    pub id: String,
    #[serde(default = "default_one")]
    pub level: i32,
    #[serde(default = "default_one")]
    pub amount: i32,
}

fn default_one() -> i32 {
    1
}

/// A quality group: a single quality or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QualityGroupData {
    One(QualityData),
    AnyOf(Vec<QualityData>),
}

/// Groups of `[item, count]` alternatives.
pub type ComponentGroupsData = Vec<Vec<(String, i32)>>;

/// Groups of `[item, charges]` alternatives; `-1` uses no charges.
pub type ToolGroupsData = Vec<Vec<(String, i32)>>;

/// Overlay declared component, tool and quality lists onto `base`. Lists that
/// are absent keep their `base` value.
pub fn overlay_requirements(
    mut base: RequirementData,
    components: Option<&ComponentGroupsData>,
    tools: Option<&ToolGroupsData>,
    qualities: Option<&Vec<QualityGroupData>>,
) -> RequirementData {
    if let Some(groups) = components {
        base.components = groups
            .iter()
            .map(|g| {
                g.iter()
                    .map(|(item, count)| ItemComp {
                        item: item.as_str().into(),
                        count: *count,
                    })
                    .collect()
            })
            .collect();
    }
    if let Some(groups) = tools {
        base.tools = groups
            .iter()
            .map(|g| {
                g.iter()
                    .map(|(item, charges)| ToolComp {
                        item: item.as_str().into(),
                        charges: *charges,
                    })
                    .collect()
            })
            .collect();
    }
    if let Some(groups) = qualities {
        base.qualities = groups
            .iter()
            .map(|g| match g {
                QualityGroupData::One(q) => vec![q.to_req()],
                QualityGroupData::AnyOf(qs) => qs.iter().map(QualityData::to_req).collect(),
            })
            .collect();
    }
    base
}

impl QualityData {
    fn to_req(&self) -> QualityReq {
        QualityReq {
            id: self.id.clone(),
            level: self.level,
            amount: self.amount,
        }
    }
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDefinition {
    #[serde(rename = "type", default)]
    pub kind: DefinitionKind,
    pub result: String,
    #[serde(default)]
    pub id_suffix: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub reversible: Option<bool>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub flags: Option<Vec<String>>,
    #[serde(default)]
    pub contained: Option<bool>,
    #[serde(default)]
    pub container: Option<String>,
    /// `[percent, threshold]`.
    #[serde(default)]
    pub batch_time_factors: Option<(i32, i32)>,
    #[serde(default)]
    pub charges: Option<i32>,
    #[serde(default)]
    pub result_mult: Option<i32>,
    #[serde(default)]
    pub skill_used: Option<String>,
    #[serde(default)]
    pub skills_required: Option<SkillsRequiredData>,
    #[serde(default)]
    pub autolearn: Option<AutolearnData>,
    #[serde(default)]
    pub decomp_learn: Option<DecompLearnData>,
    #[serde(default)]
    pub byproducts: Option<Vec<ByproductData>>,
    #[serde(default)]
    pub book_learn: Option<Vec<(String, i32)>>,
    #[serde(default)]
    pub using: Option<UsingData>,
    #[serde(default)]
    pub components: Option<ComponentGroupsData>,
    #[serde(default)]
    pub tools: Option<ToolGroupsData>,
    #[serde(default)]
    pub qualities: Option<Vec<QualityGroupData>>,
}

impl RecipeDefinition {
    /// A definition that only names its result.
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            kind: DefinitionKind::Recipe,
            result: result.into(),
            id_suffix: None,
            category: None,
            subcategory: None,
            reversible: None,
            time: None,
            difficulty: None,
            flags: None,
            contained: None,
            container: None,
            batch_time_factors: None,
            charges: None,
            result_mult: None,
            skill_used: None,
            skills_required: None,
            autolearn: None,
            decomp_learn: None,
            byproducts: None,
            book_learn: None,
            using: None,
            components: None,
            tools: None,
            qualities: None,
        }
    }

    /// The inline requirement this definition declares, overlaid on `base`.
    pub fn inline_requirement(&self, base: RequirementData) -> RequirementData {
        overlay_requirements(
            base,
            self.components.as_ref(),
            self.tools.as_ref(),
            self.qualities.as_ref(),
        )
    }

    /// Whether any component, tool or quality list is declared.
    pub fn declares_inline(&self) -> bool {
        self.components.is_some() || self.tools.is_some() || self.qualities.is_some()
    }

    /// `result + id_suffix`.
    pub fn ident(&self) -> String {
        format!("{}{}", self.result, self.id_suffix.as_deref().unwrap_or(""))
    }
}

// ===========================================================================
// Collaborator content
// ===========================================================================

/// An item type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count_by_charges: bool,
    #[serde(default)]
    pub volume_ml: u32,
    #[serde(default)]
    pub default_container: Option<String>,
    #[serde(default)]
    pub book: bool,
}

/// A skill definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillData {
    pub id: String,
}

/// A named requirement set in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RequirementSetData {
    pub id: String,
    #[serde(default)]
    pub components: Option<ComponentGroupsData>,
    #[serde(default)]
    pub tools: Option<ToolGroupsData>,
    #[serde(default)]
    pub qualities: Option<Vec<QualityGroupData>>,
}

impl RequirementSetData {
    pub fn to_requirement(&self) -> RequirementData {
        overlay_requirements(
            RequirementData::default(),
            self.components.as_ref(),
            self.tools.as_ref(),
            self.qualities.as_ref(),
        )
    }
}
