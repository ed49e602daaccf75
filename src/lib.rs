pub mod book;
pub mod config;
pub mod draft;
pub mod error;
pub mod factory;
pub mod filters;
pub mod medium;
pub mod model;
pub mod reporter;
pub mod samples;
pub mod store;
pub mod validation;

use std::sync::Arc;

use log::debug;

// Re-export commonly used types
pub use book::{RecipeBook, RecipeBookBuilder};
pub use config::{AppConfig, StorageConfig, ValidationRules};
pub use draft::{DraftStore, DRAFT_KEY};
pub use error::{FieldError, MediumError, RecipeError, StoreError, ValidationError};
pub use factory::{create_recipe, IdSource, RecipeFactory, UuidSource};
pub use filters::RecipeFilter;
pub use medium::{FileMedium, KeyValueMedium, MemoryMedium};
pub use model::{Difficulty, RawRecipe, Recipe, RecipeField};
pub use reporter::{ErrorReporter, LogReporter, Notice, RecordingReporter};
pub use store::{RecipeStore, RECIPES_KEY};
pub use validation::{is_valid_url, validate_all};

/// Open the file-backed recipe book described by `config`, seeding the
/// sample recipes on first run.
pub fn open_book(
    config: &AppConfig,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<RecipeBook<FileMedium>, RecipeError> {
    let medium = FileMedium::open(&config.storage.data_dir).map_err(StoreError::from)?;
    book_builder(config, medium, reporter).seed_samples().build()
}

/// Open the file-backed recipe book without seeding. Nothing is read or
/// written until the first store operation.
pub fn open_book_unseeded(
    config: &AppConfig,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<RecipeBook<FileMedium>, RecipeError> {
    let medium = FileMedium::open(&config.storage.data_dir).map_err(StoreError::from)?;
    book_builder(config, medium, reporter).build()
}

fn book_builder(
    config: &AppConfig,
    medium: FileMedium,
    reporter: Arc<dyn ErrorReporter>,
) -> RecipeBookBuilder<FileMedium> {
    debug!("Opening recipe book in {}", config.storage.data_dir.display());
    RecipeBook::builder()
        .medium(medium)
        .config(config)
        .reporter(reporter)
}

/// Open the file-backed draft store described by `config`
pub fn open_drafts(
    config: &AppConfig,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<DraftStore<FileMedium>, RecipeError> {
    let medium = FileMedium::open(&config.storage.data_dir).map_err(StoreError::from)?;
    Ok(DraftStore::with_key(
        medium,
        config.storage.draft_key.clone(),
        reporter,
    ))
}
