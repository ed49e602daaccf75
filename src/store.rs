//! Recipe cache backed by a persistent key-value medium.
//!
//! The whole collection lives under one key as a JSON array. The store loads
//! it lazily on first use, keeps it in memory in insertion order, and writes
//! the full array back after every mutation before returning.
//!
//! # Failure behaviour
//!
//! - A stored blob that is not valid UTF-8, or does not parse as a JSON array,
//!   is reported as [`Notice::CorruptedState`], deleted, and replaced by an
//!   empty cache. Callers never see an error for it.
//! - Array elements that do not parse as recipes are dropped and reported as
//!   [`Notice::RecordsDropped`]; the remaining recipes are kept and written
//!   back.
//! - When a write fails the in-memory change is undone before the error is
//!   returned, so the cache always matches what the medium holds.

use std::mem;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{MediumError, StoreError};
use crate::medium::KeyValueMedium;
use crate::model::Recipe;
use crate::reporter::{ErrorReporter, Notice};

/// Default key for the recipe collection
pub const RECIPES_KEY: &str = "recipes";

/// Lifecycle of the in-memory cache. Moves from `Uninitialized` to `Ready`
/// on first access; only a failed [`RecipeStore::clear`] moves it back.
#[derive(Debug)]
enum CacheState {
    Uninitialized,
    Ready(Vec<Recipe>),
}

/// Reverses one cache mutation after a failed write
enum Undo {
    Pop,
    Restore(usize, Recipe),
    Insert(usize, Recipe),
    Clear,
}

impl Undo {
    fn apply(self, recipes: &mut Vec<Recipe>) {
        match self {
            Undo::Pop => {
                recipes.pop();
            }
            Undo::Restore(index, recipe) => recipes[index] = recipe,
            Undo::Insert(index, recipe) => recipes.insert(index, recipe),
            Undo::Clear => recipes.clear(),
        }
    }
}

pub struct RecipeStore<M: KeyValueMedium> {
    medium: M,
    key: String,
    reporter: Arc<dyn ErrorReporter>,
    state: CacheState,
}

impl<M: KeyValueMedium> RecipeStore<M> {
    pub fn new(medium: M, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self::with_key(medium, RECIPES_KEY, reporter)
    }

    pub fn with_key(medium: M, key: impl Into<String>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            medium,
            key: key.into(),
            reporter,
            state: CacheState::Uninitialized,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the persisted collection has been loaded yet
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, CacheState::Ready(_))
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Direct access to the medium. Writing the recipes key through it
    /// bypasses the cache until the store is reopened.
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Snapshot of all recipes in cached order
    pub fn get_all(&mut self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes()?.clone())
    }

    pub fn get(&mut self, id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes()?.iter().find(|r| r.id == id).cloned())
    }

    pub fn len(&mut self) -> Result<usize, StoreError> {
        Ok(self.recipes()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool, StoreError> {
        Ok(self.recipes()?.is_empty())
    }

    /// Insert `recipe`, or replace the stored recipe with the same id in place.
    ///
    /// Only the id is checked here. `recipe` must come from
    /// [`crate::factory::RecipeFactory::create`] and must not have been
    /// edited since; [`crate::book::RecipeBook`] is the entry point that
    /// guarantees this. To change a stored recipe, rebuild it through the
    /// factory from a [`crate::model::RawRecipe`].
    pub fn save(&mut self, recipe: Recipe) -> Result<(), StoreError> {
        if recipe.id.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "recipe must have an id".to_string(),
            ));
        }

        self.load_if_needed()?;
        let Self {
            medium, key, state, ..
        } = self;
        let recipes = ready(state);

        let id = recipe.id.clone();
        let undo = match recipes.iter().position(|r| r.id == recipe.id) {
            Some(index) => Undo::Restore(index, mem::replace(&mut recipes[index], recipe)),
            None => {
                recipes.push(recipe);
                Undo::Pop
            }
        };

        if let Err(err) = persist(medium, key, recipes) {
            warn!("Failed to save recipe '{}': {}", id, err);
            undo.apply(recipes);
            return Err(err);
        }
        debug!("Saved recipe '{}'", id);
        Ok(())
    }

    /// Delete the recipe with `id`. Returns whether anything was removed;
    /// a missing id is not an error and writes nothing.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        if id.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "recipe id must not be empty".to_string(),
            ));
        }

        self.load_if_needed()?;
        let Self {
            medium, key, state, ..
        } = self;
        let recipes = ready(state);

        let Some(index) = recipes.iter().position(|r| r.id == id) else {
            debug!("No recipe '{}' to remove", id);
            return Ok(false);
        };
        let removed = recipes.remove(index);

        if let Err(err) = persist(medium, key, recipes) {
            warn!("Failed to remove recipe '{}': {}", id, err);
            Undo::Insert(index, removed).apply(recipes);
            return Err(err);
        }
        debug!("Removed recipe '{}'", id);
        Ok(true)
    }

    /// Empty the cache and delete the persisted collection.
    ///
    /// Works whether or not the store has been loaded. If the delete fails
    /// the store goes back to unloaded so the next access rereads the medium.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        match self.medium.remove(&self.key) {
            Ok(()) => {
                self.state = CacheState::Ready(Vec::new());
                info!("Cleared all recipes under '{}'", self.key);
                Ok(())
            }
            Err(err) => {
                self.state = CacheState::Uninitialized;
                Err(err.into())
            }
        }
    }

    /// Populate an empty store with `recipes`.
    ///
    /// Does nothing when the store already holds recipes. Entries without an
    /// id are skipped. Writes once if anything was added and returns the
    /// number of recipes inserted.
    pub fn seed<I>(&mut self, seeds: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = Recipe>,
    {
        self.load_if_needed()?;
        let Self {
            medium, key, state, ..
        } = self;
        let recipes = ready(state);

        if !recipes.is_empty() {
            debug!("Store already holds {} recipes, not seeding", recipes.len());
            return Ok(0);
        }

        for recipe in seeds {
            if recipe.id.trim().is_empty() {
                warn!("Skipping seed recipe '{}' without an id", recipe.title);
                continue;
            }
            match recipes.iter_mut().find(|r| r.id == recipe.id) {
                Some(existing) => *existing = recipe,
                None => recipes.push(recipe),
            }
        }

        if recipes.is_empty() {
            return Ok(0);
        }
        if let Err(err) = persist(medium, key, recipes) {
            warn!("Failed to seed recipes: {}", err);
            Undo::Clear.apply(recipes);
            return Err(err);
        }
        info!("Seeded {} recipes", recipes.len());
        Ok(recipes.len())
    }

    fn recipes(&mut self) -> Result<&mut Vec<Recipe>, StoreError> {
        self.load_if_needed()?;
        Ok(ready(&mut self.state))
    }

    fn load_if_needed(&mut self) -> Result<(), StoreError> {
        if let CacheState::Uninitialized = self.state {
            let recipes = self.load()?;
            self.state = CacheState::Ready(recipes);
        }
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<Recipe>, StoreError> {
        let blob = match self.medium.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No stored recipes under '{}'", self.key);
                return Ok(Vec::new());
            }
            Err(err @ MediumError::Undecodable { .. }) => {
                self.discard_corrupted(err.to_string());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&blob) {
            Ok(entries) => entries,
            Err(err) => {
                self.discard_corrupted(err.to_string());
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let mut recipes = Vec::with_capacity(total);
        let mut first_failure = None;
        for entry in entries {
            match serde_json::from_value::<Recipe>(entry) {
                Ok(recipe) => recipes.push(recipe),
                Err(err) => {
                    if first_failure.is_none() {
                        first_failure = Some(err.to_string());
                    }
                }
            }
        }

        if let Some(reason) = first_failure {
            self.reporter.warn(&Notice::RecordsDropped {
                key: self.key.clone(),
                dropped: total - recipes.len(),
                reason,
            });
            // The next successful write replaces the blob anyway
            if let Err(err) = persist(&mut self.medium, &self.key, &recipes) {
                self.reporter.warn(&Notice::DiscardFailed {
                    key: self.key.clone(),
                    reason: err.to_string(),
                });
            }
        }

        info!("Loaded {} recipes from '{}'", recipes.len(), self.key);
        Ok(recipes)
    }

    fn discard_corrupted(&mut self, reason: String) {
        self.reporter.warn(&Notice::CorruptedState {
            key: self.key.clone(),
            reason,
        });
        if let Err(err) = self.medium.remove(&self.key) {
            self.reporter.warn(&Notice::DiscardFailed {
                key: self.key.clone(),
                reason: err.to_string(),
            });
        }
    }
}

fn ready(state: &mut CacheState) -> &mut Vec<Recipe> {
    match state {
        CacheState::Ready(recipes) => recipes,
        CacheState::Uninitialized => unreachable!("recipe cache used before loading"),
    }
}

fn persist<M: KeyValueMedium>(
    medium: &mut M,
    key: &str,
    recipes: &[Recipe],
) -> Result<(), StoreError> {
    let blob = serde_json::to_string(recipes)?;
    medium.set(key, &blob)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::MemoryMedium;
    use crate::model::Difficulty;
    use crate::reporter::RecordingReporter;

    fn recipe(id: &str, title: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: title.to_string(),
            description: "Desc".to_string(),
            ingredients: vec!["a".to_string()],
            steps: vec!["step1".to_string()],
            prep_time: 10,
            cook_time: 20,
            difficulty: Difficulty::Easy,
            image_url: None,
        }
    }

    fn store_with(medium: MemoryMedium) -> (RecipeStore<MemoryMedium>, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        (RecipeStore::new(medium, reporter.clone()), reporter)
    }

    #[test]
    fn test_lazy_initialization() {
        let mut medium = MemoryMedium::new();
        medium
            .set(RECIPES_KEY, &serde_json::to_string(&[recipe("a", "A")]).unwrap())
            .unwrap();
        let (mut store, _) = store_with(medium);

        assert!(!store.is_initialized());
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.is_initialized());
    }

    #[test]
    fn test_cache_not_reloaded_after_init() {
        let (mut store, _) = store_with(MemoryMedium::new());
        store.save(recipe("a", "A")).unwrap();

        store.medium_mut().set(RECIPES_KEY, "[]").unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_save_persists_full_collection() {
        let (mut store, _) = store_with(MemoryMedium::new());
        store.save(recipe("a", "A")).unwrap();
        store.save(recipe("b", "B")).unwrap();

        let blob = store.medium().get(RECIPES_KEY).unwrap().unwrap();
        let stored: Vec<Recipe> = serde_json::from_str(&blob).unwrap();
        assert_eq!(stored, store.get_all().unwrap());
    }

    #[test]
    fn test_upsert_keeps_position() {
        let (mut store, _) = store_with(MemoryMedium::new());
        store.save(recipe("a", "A")).unwrap();
        store.save(recipe("b", "B")).unwrap();
        store.save(recipe("a", "A2")).unwrap();

        let titles: Vec<String> = store.get_all().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A2", "B"]);
    }

    #[test]
    fn test_save_without_id_is_invalid() {
        let (mut store, _) = store_with(MemoryMedium::new());
        let err = store.save(recipe("  ", "No id")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_remove_empty_id_is_invalid() {
        let (mut store, _) = store_with(MemoryMedium::new());
        assert!(matches!(
            store.remove("").unwrap_err(),
            StoreError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_remove_missing_id_writes_nothing() {
        let (mut store, _) = store_with(MemoryMedium::new());
        assert!(!store.remove("ghost").unwrap());
        assert!(!store.medium().contains_key(RECIPES_KEY));
    }

    #[test]
    fn test_corrupted_blob_is_discarded() {
        let mut medium = MemoryMedium::new();
        medium.set(RECIPES_KEY, "{not json").unwrap();
        let (mut store, reporter) = store_with(medium);

        assert!(store.get_all().unwrap().is_empty());
        assert!(!store.medium().contains_key(RECIPES_KEY));
        assert!(matches!(
            reporter.warnings().as_slice(),
            [Notice::CorruptedState { .. }]
        ));
    }

    #[test]
    fn test_non_array_blob_is_corrupted() {
        let mut medium = MemoryMedium::new();
        medium.set(RECIPES_KEY, r#"{"id": "a"}"#).unwrap();
        let (mut store, reporter) = store_with(medium);

        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_bad_elements_are_dropped_and_rest_kept() {
        let good = serde_json::to_value(recipe("a", "A")).unwrap();
        let blob = serde_json::json!([good, {"id": "b", "title": "B"}]).to_string();
        let mut medium = MemoryMedium::new();
        medium.set(RECIPES_KEY, &blob).unwrap();
        let (mut store, reporter) = store_with(medium);

        assert_eq!(store.get_all().unwrap(), vec![recipe("a", "A")]);
        match reporter.warnings().as_slice() {
            [Notice::RecordsDropped { dropped, .. }] => assert_eq!(*dropped, 1),
            other => panic!("unexpected notices: {:?}", other),
        }

        let rewritten = store.medium().get(RECIPES_KEY).unwrap().unwrap();
        let stored: Vec<Recipe> = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(stored, vec![recipe("a", "A")]);
    }

    #[test]
    fn test_clean_blob_is_not_rewritten() {
        let blob = serde_json::to_string(&[recipe("a", "A")]).unwrap();
        let pretty = format!("  {}  ", blob);
        let mut medium = MemoryMedium::new();
        medium.set(RECIPES_KEY, &pretty).unwrap();
        let (mut store, reporter) = store_with(medium);

        assert_eq!(store.len().unwrap(), 1);
        assert!(reporter.warnings().is_empty());
        assert_eq!(store.medium().get(RECIPES_KEY).unwrap(), Some(pretty));
    }

    #[test]
    fn test_capacity_failure_rolls_back_insert() {
        let (mut store, _) = store_with(MemoryMedium::with_quota(400));
        store.save(recipe("a", "A")).unwrap();

        let big = recipe("b", &"x".repeat(500));
        let err = store.save(big).unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(store.get_all().unwrap(), vec![recipe("a", "A")]);
    }

    #[test]
    fn test_capacity_failure_rolls_back_replace() {
        let (mut store, _) = store_with(MemoryMedium::with_quota(400));
        store.save(recipe("a", "A")).unwrap();

        let err = store.save(recipe("a", &"x".repeat(500))).unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(store.get("a").unwrap().unwrap().title, "A");
    }

    #[test]
    fn test_clear_without_init() {
        let mut medium = MemoryMedium::new();
        medium.set(RECIPES_KEY, "[]").unwrap();
        let (mut store, _) = store_with(medium);

        store.clear().unwrap();
        assert!(store.is_initialized());
        assert!(!store.medium().contains_key(RECIPES_KEY));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_seed_skips_entries_without_id() {
        let (mut store, _) = store_with(MemoryMedium::new());
        let inserted = store
            .seed(vec![recipe("", "Nameless"), recipe("a", "A")])
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(store.get_all().unwrap(), vec![recipe("a", "A")]);
    }

    #[test]
    fn test_seed_with_nothing_valid_writes_nothing() {
        let (mut store, _) = store_with(MemoryMedium::new());
        assert_eq!(store.seed(vec![recipe("", "Nameless")]).unwrap(), 0);
        assert!(!store.medium().contains_key(RECIPES_KEY));
    }
}
