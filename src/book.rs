use std::sync::Arc;

use log::info;

use crate::config::{AppConfig, ValidationRules};
use crate::error::{RecipeError, StoreError, ValidationError};
use crate::factory::{IdSource, RecipeFactory, UuidSource};
use crate::filters::RecipeFilter;
use crate::medium::KeyValueMedium;
use crate::model::{RawRecipe, Recipe};
use crate::reporter::{ErrorReporter, LogReporter};
use crate::samples::sample_recipes;
use crate::store::{RecipeStore, RECIPES_KEY};
use crate::validation::validate_all;

/// Create, update, delete and list recipes.
///
/// Every write goes through the factory first, so only validated recipes
/// reach the store. Capacity failures are also shown to the user through
/// the reporter before being returned.
pub struct RecipeBook<M: KeyValueMedium> {
    factory: RecipeFactory,
    store: RecipeStore<M>,
    reporter: Arc<dyn ErrorReporter>,
}

impl<M: KeyValueMedium> RecipeBook<M> {
    /// Creates a new builder for opening a recipe book
    ///
    /// # Example
    /// ```
    /// use recipe_box::{MemoryMedium, RecipeBook};
    ///
    /// let book = RecipeBook::builder()
    ///     .medium(MemoryMedium::new())
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> RecipeBookBuilder<M> {
        RecipeBookBuilder::default()
    }

    /// Validate, assign a fresh id, and store a new recipe.
    ///
    /// Any id in `raw` is ignored; use [`RecipeBook::update`] to replace.
    pub fn create(&mut self, raw: &RawRecipe) -> Result<Recipe, RecipeError> {
        let raw = RawRecipe {
            id: None,
            ..raw.clone()
        };
        let recipe = self.factory.create(&raw)?;
        surface(&self.reporter, self.store.save(recipe.clone()))?;
        info!("Created recipe '{}' ({})", recipe.title, recipe.id);
        Ok(recipe)
    }

    /// Replace the recipe with `id` by a new one built from `raw`
    pub fn update(&mut self, id: &str, raw: &RawRecipe) -> Result<Recipe, RecipeError> {
        if surface(&self.reporter, self.store.get(id))?.is_none() {
            return Err(RecipeError::NotFound(id.to_string()));
        }
        let raw = RawRecipe {
            id: Some(id.to_string()),
            ..raw.clone()
        };
        let recipe = self.factory.create(&raw)?;
        surface(&self.reporter, self.store.save(recipe.clone()))?;
        info!("Updated recipe '{}' ({})", recipe.title, recipe.id);
        Ok(recipe)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RecipeError> {
        if !surface(&self.reporter, self.store.remove(id))? {
            return Err(RecipeError::NotFound(id.to_string()));
        }
        info!("Deleted recipe {}", id);
        Ok(())
    }

    pub fn get(&mut self, id: &str) -> Result<Recipe, RecipeError> {
        surface(&self.reporter, self.store.get(id))?
            .ok_or_else(|| RecipeError::NotFound(id.to_string()))
    }

    /// All recipes matching `filter`, in stored order
    pub fn list(&mut self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeError> {
        let recipes = surface(&self.reporter, self.store.get_all())?;
        Ok(recipes.into_iter().filter(|r| filter.matches(r)).collect())
    }

    /// Form-level check reporting every violation at once
    pub fn validate(&self, raw: &RawRecipe) -> Result<(), ValidationError> {
        validate_all(raw, self.factory.rules())
    }

    pub fn clear(&mut self) -> Result<(), RecipeError> {
        surface(&self.reporter, self.store.clear())
    }

    pub fn store(&self) -> &RecipeStore<M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecipeStore<M> {
        &mut self.store
    }
}

/// Show capacity failures to the user, then hand the error on
fn surface<T>(
    reporter: &Arc<dyn ErrorReporter>,
    result: Result<T, StoreError>,
) -> Result<T, RecipeError> {
    result.map_err(|err| {
        if err.is_capacity() {
            reporter.user_error(&err.to_string());
        }
        RecipeError::StoreError(err)
    })
}

/// Builder for configuring and opening a [`RecipeBook`]
pub struct RecipeBookBuilder<M> {
    medium: Option<M>,
    rules: Option<ValidationRules>,
    recipes_key: Option<String>,
    ids: Option<Box<dyn IdSource>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    seed_samples: bool,
}

impl<M> Default for RecipeBookBuilder<M> {
    fn default() -> Self {
        Self {
            medium: None,
            rules: None,
            recipes_key: None,
            ids: None,
            reporter: None,
            seed_samples: false,
        }
    }
}

impl<M: KeyValueMedium> RecipeBookBuilder<M> {
    /// Set the medium recipes are persisted to (required)
    pub fn medium(mut self, medium: M) -> Self {
        self.medium = Some(medium);
        self
    }

    /// Take validation rules and the recipes key from loaded configuration
    pub fn config(mut self, config: &AppConfig) -> Self {
        self.rules = Some(config.validation.clone());
        self.recipes_key = Some(config.storage.recipes_key.clone());
        self
    }

    pub fn rules(mut self, rules: ValidationRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn recipes_key(mut self, key: impl Into<String>) -> Self {
        self.recipes_key = Some(key.into());
        self
    }

    /// Replace the random id source, e.g. for deterministic tests
    pub fn id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Set the reporter; defaults to [`LogReporter`]
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Seed the built-in sample recipes if the store is empty
    pub fn seed_samples(mut self) -> Self {
        self.seed_samples = true;
        self
    }

    /// Open the book, seeding samples if requested
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - No medium was specified
    /// - Seeding was requested and the seed could not be persisted
    pub fn build(self) -> Result<RecipeBook<M>, RecipeError> {
        let medium = self.medium.ok_or_else(|| {
            RecipeError::BuilderError("No medium specified. Use .medium()".to_string())
        })?;
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(LogReporter) as Arc<dyn ErrorReporter>);
        let rules = self.rules.unwrap_or_default();
        let ids = self
            .ids
            .unwrap_or_else(|| Box::new(UuidSource) as Box<dyn IdSource>);
        let key = self.recipes_key.unwrap_or_else(|| RECIPES_KEY.to_string());

        let mut book = RecipeBook {
            factory: RecipeFactory::with_id_source(rules, ids),
            store: RecipeStore::with_key(medium, key, reporter.clone()),
            reporter,
        };

        if self.seed_samples {
            surface(&book.reporter, book.store.seed(sample_recipes()))?;
        }
        Ok(book)
    }
}
