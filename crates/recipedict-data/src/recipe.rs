//! Applies one recipe definition to the dictionary.
//!
//! Loading is create-or-overwrite: the target record is located by key
//! (`result + id_suffix` for recipes, `result` for uncrafts) or created, and
//! only the fields present in the definition are written. List-shaped fields
//! replace their previous contents wholesale.

use recipedict_core::dictionary::{DictionaryError, RecipeDictionary};
use recipedict_core::fixed::percent_to_ratio;
use recipedict_core::id::{ItemTypeId, RequirementId, SkillId};
use recipedict_core::recipe::Recipe;
use recipedict_core::requirement::RequirementCatalog;

use crate::schema::{
    AutolearnData, DecompLearnData, RecipeDefinition, SkillsRequiredData, UsingData,
};

/// Structural errors that abort a single definition.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("recipe '{recipe}': decomp_learn specified with no skill_used")]
    DecompLearnWithoutSkill { recipe: String },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

fn skill_map<'a>(pairs: impl IntoIterator<Item = &'a (String, i32)>) -> Vec<(SkillId, i32)> {
    pairs
        .into_iter()
        .map(|(skill, level)| (SkillId::from(skill.as_str()), *level))
        .collect()
}

/// Load a definition into the dictionary, registering its inline requirement
/// in `catalog`.
///
/// Fails without touching the dictionary when the definition is structurally
/// invalid.
pub fn load_recipe<C>(
    dict: &mut RecipeDictionary,
    def: &RecipeDefinition,
    uncraft: bool,
    catalog: &mut C,
) -> Result<(), LoadError>
where
    C: RequirementCatalog + ?Sized,
{
    let result = ItemTypeId::from(def.result.as_str());
    let ident = def.ident();

    // A bare decomp_learn level needs a skill, from this definition or an earlier one.
    if matches!(def.decomp_learn, Some(DecompLearnData::Level(_))) && def.skill_used.is_none() {
        let existing = if uncraft {
            dict.find_uncraft(&result)
        } else {
            dict.find(&ident)
        };
        if existing.and_then(|r| r.skill_used.as_ref()).is_none() {
            return Err(LoadError::DecompLearnWithoutSkill { recipe: ident });
        }
    }

    let max_skill = dict.config().max_skill;
    let inline_id = dict.config().inline_requirement(&ident);

    let r = if uncraft {
        dict.uncraft_entry(&result)?
    } else {
        dict.recipe_entry(&ident, &result)?
    };
    r.result = result;
    r.ident = ident;

    if uncraft {
        r.reversible = true;
    } else {
        if let Some(category) = &def.category {
            r.category = category.clone();
        }
        if let Some(subcategory) = &def.subcategory {
            r.subcategory = subcategory.clone();
        }
        if let Some(reversible) = def.reversible {
            r.reversible = reversible;
        }
    }

    if let Some(time) = def.time {
        r.time = time;
    }
    if let Some(difficulty) = def.difficulty {
        r.difficulty = difficulty.clamp(0, max_skill.max(0));
    }
    if let Some(flags) = &def.flags {
        r.flags = flags.iter().cloned().collect();
    }

    if let Some(contained) = def.contained {
        r.contained = contained;
    }
    if let Some(container) = &def.container {
        r.container = ItemTypeId::from(container.as_str());
        r.contained = true;
    }

    if let Some((percent, size)) = def.batch_time_factors {
        r.batch_rscale = percent_to_ratio(percent);
        r.batch_rsize = size;
    }
    // Negative charges mean "unset", so a definition can clear an earlier value.
    if let Some(charges) = def.charges {
        r.charges = (charges >= 0).then_some(charges);
    }
    if let Some(mult) = def.result_mult {
        r.result_mult = mult;
    }
    if let Some(skill) = &def.skill_used {
        r.skill_used = Some(SkillId::from(skill.as_str()));
    }

    apply_skills(r, def);

    if !uncraft {
        if let Some(byproducts) = &def.byproducts {
            r.byproducts.clear();
            for bp in byproducts {
                *r.byproducts.entry(bp.item().into()).or_insert(0) += bp.count();
            }
        }
    }

    if let Some(books) = &def.book_learn {
        r.booksets.clear();
        for (book, level) in books {
            r.booksets.entry(book.as_str().into()).or_insert(*level);
        }
    }

    match &def.using {
        Some(UsingData::Single(id)) => r.reqs = vec![(RequirementId::from(id.as_str()), 1)],
        Some(UsingData::Weighted(list)) => {
            r.reqs = list
                .iter()
                .map(|(id, mult)| (RequirementId::from(id.as_str()), *mult))
                .collect();
        }
        None => {}
    }

    let existing = catalog.requirement(&inline_id).cloned();
    if def.declares_inline() || existing.is_none() {
        catalog.register(inline_id.clone(), def.inline_requirement(existing.unwrap_or_default()));
    }
    if !r.reqs.iter().any(|(id, _)| *id == inline_id) {
        r.reqs.push((inline_id, 1));
    }

    Ok(())
}

/// `skills_required`, `autolearn` and `decomp_learn`.
fn apply_skills(r: &mut Recipe, def: &RecipeDefinition) {
    match &def.skills_required {
        Some(SkillsRequiredData::Many(list)) => {
            r.required_skills = skill_map(list).into_iter().collect();
        }
        Some(SkillsRequiredData::One(skill, level)) => {
            r.required_skills.clear();
            r.required_skills.insert(skill.as_str().into(), *level);
        }
        None => {}
    }

    match &def.autolearn {
        Some(AutolearnData::Flag(flag)) => r.autolearn = *flag,
        Some(AutolearnData::Explicit(list)) => {
            r.autolearn = false;
            r.autolearn_requirements.extend(skill_map(list));
        }
        None => {}
    }

    match &def.decomp_learn {
        Some(DecompLearnData::Level(level)) => {
            r.learn_by_disassembly.clear();
            if let Some(skill) = r.skill_used.clone() {
                r.learn_by_disassembly.insert(skill, *level);
            }
        }
        Some(DecompLearnData::Explicit(list)) => {
            r.learn_by_disassembly = skill_map(list).into_iter().collect();
        }
        None => {}
    }
}
