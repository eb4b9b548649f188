//! Collaborator content loading and whole-directory data sets.
//!
//! A data directory holds one file per base name, in any supported format:
//!
//! | base name      | required | TOML key       |
//! |----------------|----------|----------------|
//! | `config`       | no       | (table)        |
//! | `items`        | yes      | `items`        |
//! | `skills`       | no       | `skills`       |
//! | `requirements` | no       | `requirements` |
//! | `blacklist`    | no       | `blacklist`    |
//! | `recipes`      | no       | `recipes`      |
//! | `uncraft`      | no       | `recipes`      |
//!
//! Every definition in `uncraft` targets the uncraft map regardless of its
//! `type`.

use recipedict_core::dictionary::RecipeDictionary;
use recipedict_core::finalize::FinalizeReport;
use recipedict_core::registry::{BookSlot, ItemRegistry, ItemTypeDef, SkillRegistry};
use recipedict_core::requirement::{RequirementCatalog, RequirementStore};
use std::path::Path;
use tracing::debug;

use crate::loader::{
    DataLoadError, find_data_file, load_config, load_recipe_file, read_list,
    require_data_file,
};
use crate::schema::{ItemData, RequirementSetData, SkillData};

/// A finalized dictionary together with the registries it was checked against.
#[derive(Debug)]
pub struct DataSet {
    pub items: ItemRegistry,
    pub skills: SkillRegistry,
    pub requirements: RequirementStore,
    pub dictionary: RecipeDictionary,
    pub report: FinalizeReport,
}

impl From<&ItemData> for ItemTypeDef {
    fn from(data: &ItemData) -> Self {
        let mut def = ItemTypeDef::new(data.id.as_str()).volume(data.volume_ml);
        if let Some(name) = &data.name {
            def.name = name.clone();
        }
        def.count_by_charges = data.count_by_charges;
        def.default_container = data.default_container.as_deref().map(Into::into);
        if data.book {
            def.book = Some(BookSlot::default());
        }
        def
    }
}

/// Register every item type in a file. Returns the number read.
pub fn load_items(path: &Path, items: &mut ItemRegistry) -> Result<usize, DataLoadError> {
    let list: Vec<ItemData> = read_list(path, "items")?;
    for data in &list {
        items.register(data.into());
    }
    debug!(file = %path.display(), items = list.len(), "loaded items");
    Ok(list.len())
}

/// Register every skill in a file. Returns the number read.
pub fn load_skills(path: &Path, skills: &mut SkillRegistry) -> Result<usize, DataLoadError> {
    let list: Vec<SkillData> = read_list(path, "skills")?;
    for data in &list {
        skills.register(data.id.as_str());
    }
    debug!(file = %path.display(), skills = list.len(), "loaded skills");
    Ok(list.len())
}

/// Register every named requirement set in a file, replacing sets of the
/// same name. Returns the number read.
pub fn load_requirements<C>(path: &Path, catalog: &mut C) -> Result<usize, DataLoadError>
where
    C: RequirementCatalog + ?Sized,
{
    let list: Vec<RequirementSetData> = read_list(path, "requirements")?;
    for data in &list {
        catalog.register(data.id.as_str().into(), data.to_requirement());
    }
    debug!(file = %path.display(), requirements = list.len(), "loaded requirement sets");
    Ok(list.len())
}

/// Blacklist every item type listed in a file.
pub fn load_blacklist(path: &Path, catalog: &mut RequirementStore) -> Result<usize, DataLoadError> {
    let list: Vec<String> = read_list(path, "blacklist")?;
    for item in &list {
        catalog.blacklist_item(item.as_str());
    }
    debug!(file = %path.display(), items = list.len(), "loaded blacklist");
    Ok(list.len())
}

/// Load a complete data set from `dir` and finalize it.
///
/// Collaborator content is loaded first, then recipes, then uncraft
/// definitions, so every registry is populated before finalize runs.
pub fn load_content_dir(dir: &Path) -> Result<DataSet, DataLoadError> {
    let config = match find_data_file(dir, "config")? {
        Some(path) => load_config(&path)?,
        None => Default::default(),
    };

    let mut items = ItemRegistry::new();
    load_items(&require_data_file(dir, "items")?, &mut items)?;

    let mut skills = SkillRegistry::new();
    if let Some(path) = find_data_file(dir, "skills")? {
        load_skills(&path, &mut skills)?;
    }

    let mut requirements = RequirementStore::new();
    if let Some(path) = find_data_file(dir, "requirements")? {
        load_requirements(&path, &mut requirements)?;
    }
    if let Some(path) = find_data_file(dir, "blacklist")? {
        load_blacklist(&path, &mut requirements)?;
    }

    let mut dictionary = RecipeDictionary::with_config(config);
    if let Some(path) = find_data_file(dir, "recipes")? {
        load_recipe_file(&path, &mut dictionary, &mut requirements, false)?;
    }
    if let Some(path) = find_data_file(dir, "uncraft")? {
        load_recipe_file(&path, &mut dictionary, &mut requirements, true)?;
    }

    let report = dictionary.finalize(&mut items, &skills, &requirements)?;

    Ok(DataSet {
        items,
        skills,
        requirements,
        dictionary,
        report,
    })
}
