//! File plumbing: format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers used by the recipe and content loaders.

use recipedict_core::config::DictionaryConfig;
use recipedict_core::dictionary::{DictionaryError, RecipeDictionary};
use recipedict_core::requirement::RequirementCatalog;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::recipe::{LoadError, load_recipe};
use crate::schema::{DefinitionKind, RecipeDefinition};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading data files.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A definition was structurally invalid.
    #[error("in {file}: {source}")]
    Definition { file: PathBuf, source: LoadError },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats
// ===========================================================================

/// Supported data file formats, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    /// Format named by the file's extension.
    pub fn of(path: &Path) -> Result<Format, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Format::ALL
            .into_iter()
            .find(|format| Some(format.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })
    }

    /// Parse a whole document. `origin` only labels errors.
    pub fn parse<T: DeserializeOwned>(self, text: &str, origin: &Path) -> Result<T, DataLoadError> {
        let parsed = match self {
            Format::Ron => ron::from_str(text).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|detail| DataLoadError::Parse {
            file: origin.to_path_buf(),
            detail,
        })
    }

    /// Parse a list. TOML cannot hold a bare top-level array, so there the
    /// list sits under `key` as an array of tables.
    pub fn parse_list<T: DeserializeOwned>(
        self,
        text: &str,
        key: &str,
        origin: &Path,
    ) -> Result<Vec<T>, DataLoadError> {
        if self != Format::Toml {
            return self.parse(text, origin);
        }
        let mut table: toml::Table = self.parse(text, origin)?;
        let list = table.remove(key).ok_or_else(|| DataLoadError::Parse {
            file: origin.to_path_buf(),
            detail: format!("no '{key}' array"),
        })?;
        list.try_into().map_err(|e: toml::de::Error| DataLoadError::Parse {
            file: origin.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

// ===========================================================================
// File discovery and reading
// ===========================================================================

/// Path of the data file called `base_name` in `dir`, in whichever format
/// exists. More than one format for the same name is an error.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = Format::ALL
        .into_iter()
        .map(|format| dir.join(format!("{base_name}.{}", format.extension())))
        .filter(|path| path.is_file());

    match (present.next(), present.next()) {
        (Some(a), Some(b)) => Err(DataLoadError::ConflictingFormats { a, b }),
        (found, _) => Ok(found),
    }
}

/// [`find_data_file`] for files that must exist.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Read and parse one document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = Format::of(path)?;
    format.parse(&std::fs::read_to_string(path)?, path)
}

/// Read and parse a list; `toml_key` names the array in TOML files.
pub fn read_list<T: DeserializeOwned>(path: &Path, toml_key: &str) -> Result<Vec<T>, DataLoadError> {
    let format = Format::of(path)?;
    format.parse_list(&std::fs::read_to_string(path)?, toml_key, path)
}

// ===========================================================================
// Recipe and config files
// ===========================================================================

/// Load every recipe definition in a file (TOML key `recipes`).
///
/// Each definition's `type` decides whether it targets the crafting or the
/// uncraft map, unless `force_uncraft` is set. The first structurally invalid
/// definition aborts the file; definitions before it stay loaded.
pub fn load_recipe_file<C>(
    path: &Path,
    dict: &mut RecipeDictionary,
    catalog: &mut C,
    force_uncraft: bool,
) -> Result<usize, DataLoadError>
where
    C: RequirementCatalog + ?Sized,
{
    let defs: Vec<RecipeDefinition> = read_list(path, "recipes")?;
    for def in &defs {
        let uncraft = force_uncraft || def.kind == DefinitionKind::Uncraft;
        load_recipe(dict, def, uncraft, catalog).map_err(|source| DataLoadError::Definition {
            file: path.to_path_buf(),
            source,
        })?;
    }
    debug!(file = %path.display(), definitions = defs.len(), "loaded recipe file");
    Ok(defs.len())
}

/// Read a [`DictionaryConfig`] from a RON, JSON or TOML file.
pub fn load_config(path: &Path) -> Result<DictionaryConfig, DataLoadError> {
    read_document(path)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use recipedict_core::fixed::fixed64_to_f64;
    use recipedict_core::requirement::RequirementStore;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "recipedict_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // Format
    // -----------------------------------------------------------------------

    #[test]
    fn format_of_path() {
        assert_eq!(Format::of(Path::new("data/recipes.ron")).unwrap(), Format::Ron);
        assert_eq!(Format::of(Path::new("recipes.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::of(Path::new("recipes.json")).unwrap(), Format::Json);
        for bad in ["recipes.yaml", "recipes", "recipes.JSON"] {
            assert!(matches!(
                Format::of(Path::new(bad)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn parse_list_reads_the_same_list_in_every_format() {
        let origin = Path::new("skills");
        let ron = r#"[(id: "cooking")]"#;
        let json = r#"[{"id": "cooking"}]"#;
        let toml = "[[skills]]\nid = \"cooking\"\n";
        for (format, text) in [(Format::Ron, ron), (Format::Json, json), (Format::Toml, toml)] {
            let list: Vec<crate::schema::SkillData> =
                format.parse_list(text, "skills", origin).unwrap();
            assert_eq!(list.len(), 1, "{format:?}");
            assert_eq!(list[0].id, "cooking", "{format:?}");
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        fs::write(dir.join("items.json"), "[]").unwrap();

        assert_eq!(find_data_file(&dir, "items").unwrap(), Some(dir.join("items.json")));
        assert_eq!(find_data_file(&dir, "skills").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("items.ron"), "[]").unwrap();
        fs::write(dir.join("items.json"), "[]").unwrap();

        assert!(matches!(
            find_data_file(&dir, "items"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "items");
        assert!(matches!(result, Err(DataLoadError::MissingRequired { ref file, .. }) if file == "items"));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // read_list / read_document
    // -----------------------------------------------------------------------

    #[test]
    fn read_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("items.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<crate::schema::ItemData>, _> = read_list(&path, "items");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn read_document_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Vec<crate::schema::ItemData>, _> = read_document(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_recipe_file
    // -----------------------------------------------------------------------

    #[test]
    fn load_recipe_file_json() {
        let dir = make_test_dir("recipes_json");
        let path = dir.join("recipes.json");
        fs::write(
            &path,
            r#"[
                {"result": "table", "time": 100, "components": [[["plank", 4]]]},
                {"type": "uncraft", "result": "radio", "time": 30}
            ]"#,
        )
        .unwrap();

        let mut dict = RecipeDictionary::new();
        let mut catalog = RequirementStore::new();
        let n = load_recipe_file(&path, &mut dict, &mut catalog, false).unwrap();
        assert_eq!(n, 2);
        assert_eq!(dict.get("table").time, 100);
        assert_eq!(dict.get_uncraft(&"radio".into()).time, 30);
        assert_eq!(catalog.len(), 2);

        cleanup(&dir);
    }

    #[test]
    fn load_recipe_file_toml_forced_uncraft() {
        let dir = make_test_dir("recipes_toml");
        let path = dir.join("uncraft.toml");
        fs::write(
            &path,
            r#"
[[recipes]]
result = "radio"
time = 30
components = [[["scrap", 2]]]
"#,
        )
        .unwrap();

        let mut dict = RecipeDictionary::new();
        let mut catalog = RequirementStore::new();
        load_recipe_file(&path, &mut dict, &mut catalog, true).unwrap();
        assert!(dict.get("radio").is_null());
        assert!(dict.get_uncraft(&"radio".into()).reversible);

        cleanup(&dir);
    }

    #[test]
    fn load_recipe_file_reports_structural_error() {
        let dir = make_test_dir("recipes_bad");
        let path = dir.join("recipes.json");
        fs::write(&path, r#"[{"result": "radio", "decomp_learn": 2}]"#).unwrap();

        let mut dict = RecipeDictionary::new();
        let mut catalog = RequirementStore::new();
        let err = load_recipe_file(&path, &mut dict, &mut catalog, false).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::Definition {
                source: LoadError::DecompLearnWithoutSkill { .. },
                ..
            }
        ));
        assert!(format!("{err}").contains("decomp_learn"));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_config
    // -----------------------------------------------------------------------

    #[test]
    fn load_config_partial_override() {
        let dir = make_test_dir("config");
        let path = dir.join("config.toml");
        fs::write(&path, "max_skill = 12\nbook_page_volume_ml = 25.0\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.max_skill, 12);
        assert_eq!(fixed64_to_f64(cfg.book_page_volume_ml), 25.0);
        assert_eq!(cfg.uncraft_time_per_page, 10);

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "items".to_string(),
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("items"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::Parse {
            file: PathBuf::from("bad.ron"),
            detail: "syntax error".to_string(),
        };
        assert!(format!("{e}").contains("bad.ron"));
        assert!(format!("{e}").contains("syntax error"));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
    }
}
