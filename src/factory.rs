use log::debug;
use uuid::Uuid;

use crate::config::ValidationRules;
use crate::error::{FieldError, ValidationError};
use crate::model::{Difficulty, RawRecipe, Recipe};
use crate::validation::{FieldChecker, NormalizedFields};

/// Source of fresh recipe ids
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

type CheckedFields = (u32, u32, Difficulty, Option<String>);

/// Builds validated [`Recipe`] values from raw field data
pub struct RecipeFactory {
    rules: ValidationRules,
    ids: Box<dyn IdSource>,
}

impl Default for RecipeFactory {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}

impl RecipeFactory {
    pub fn new(rules: ValidationRules) -> Self {
        Self::with_id_source(rules, Box::new(UuidSource))
    }

    pub fn with_id_source(rules: ValidationRules, ids: Box<dyn IdSource>) -> Self {
        Self { rules, ids }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Trim, validate, and build a recipe.
    ///
    /// Fails on the first rule violation; the returned error holds exactly
    /// one [`FieldError`]. A blank or missing id is replaced by a fresh one.
    pub fn create(&self, raw: &RawRecipe) -> Result<Recipe, ValidationError> {
        let fields = NormalizedFields::from(raw);
        let (prep_time, cook_time, difficulty, image_url) =
            self.check_in_order(&fields).map_err(|err| {
                debug!("Invalid recipe data: {}", err);
                ValidationError::from(err)
            })?;

        let NormalizedFields {
            id,
            title,
            description,
            ingredients,
            steps,
            ..
        } = fields;

        Ok(Recipe {
            id: id.unwrap_or_else(|| self.ids.next_id()),
            title,
            description,
            ingredients,
            steps,
            prep_time,
            cook_time,
            difficulty,
            image_url,
        })
    }

    fn check_in_order(&self, fields: &NormalizedFields) -> Result<CheckedFields, FieldError> {
        let check = FieldChecker::new(&self.rules);
        check.title(&fields.title)?;
        check.description(&fields.description)?;
        check.ingredients(&fields.ingredients)?;
        check.steps(&fields.steps)?;
        let prep_time = check.prep_time(fields.prep_time)?;
        let cook_time = check.cook_time(fields.cook_time)?;
        let difficulty = check.difficulty(&fields.difficulty)?;
        let image_url = check.image_url(&fields.image_url)?;
        Ok((prep_time, cook_time, difficulty, image_url))
    }
}

/// Build a recipe with the default rules and random ids
pub fn create_recipe(raw: &RawRecipe) -> Result<Recipe, ValidationError> {
    RecipeFactory::default().create(raw)
}
