//! Data-driven recipe loading: definition schema, file formats, and the
//! loader that applies definitions to a [`RecipeDictionary`].
//!
//! [`RecipeDictionary`]: recipedict_core::dictionary::RecipeDictionary

pub mod content;
pub mod loader;
pub mod recipe;
pub mod schema;

pub use content::{DataSet, load_content_dir};
pub use loader::{DataLoadError, load_config, load_recipe_file};
pub use recipe::{LoadError, load_recipe};
