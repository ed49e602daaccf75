//! Field rules for recipe input.
//!
//! Two policies share the same checks:
//! - [`validate_all`] runs every rule and reports all violations at once, for
//!   showing errors next to each form field before submit.
//! - [`crate::factory::RecipeFactory::create`] stops at the first violation.
//!
//! Rules run in a fixed order: title, description, ingredients, steps,
//! prep time, cook time, difficulty, image URL.

use url::Url;

use crate::config::ValidationRules;
use crate::error::{FieldError, ValidationError};
use crate::model::{Difficulty, RawRecipe, RecipeField};

/// Raw fields after whitespace trimming
#[derive(Debug, Clone, Default)]
pub(crate) struct NormalizedFields {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub difficulty: String,
    pub image_url: String,
}

impl From<&RawRecipe> for NormalizedFields {
    fn from(raw: &RawRecipe) -> Self {
        fn trimmed(value: &Option<String>) -> String {
            value.as_deref().map(str::trim).unwrap_or_default().to_string()
        }
        fn trimmed_all(values: &Option<Vec<String>>) -> Vec<String> {
            values
                .iter()
                .flatten()
                .map(|v| v.trim().to_string())
                .collect()
        }

        NormalizedFields {
            id: raw
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            title: trimmed(&raw.title),
            description: trimmed(&raw.description),
            ingredients: trimmed_all(&raw.ingredients),
            steps: trimmed_all(&raw.steps),
            prep_time: raw.prep_time,
            cook_time: raw.cook_time,
            // Difficulty is matched exactly, never trimmed.
            difficulty: raw.difficulty.clone().unwrap_or_default(),
            image_url: trimmed(&raw.image_url),
        }
    }
}

/// Applies [`ValidationRules`] to normalized fields, one check per field
pub(crate) struct FieldChecker<'a> {
    rules: &'a ValidationRules,
}

impl<'a> FieldChecker<'a> {
    pub fn new(rules: &'a ValidationRules) -> Self {
        Self { rules }
    }

    pub fn title(&self, title: &str) -> Result<(), FieldError> {
        let (min, max) = (self.rules.title_min_length, self.rules.title_max_length);
        if !within(title.chars().count(), min, max) {
            return Err(FieldError::new(
                RecipeField::Title,
                format!("Title must be between {}-{} characters", min, max),
            ));
        }
        Ok(())
    }

    pub fn description(&self, description: &str) -> Result<(), FieldError> {
        let (min, max) = (
            self.rules.description_min_length,
            self.rules.description_max_length,
        );
        if !within(description.chars().count(), min, max) {
            return Err(FieldError::new(
                RecipeField::Description,
                format!("Description must be between {}-{} characters", min, max),
            ));
        }
        Ok(())
    }

    pub fn ingredients(&self, ingredients: &[String]) -> Result<(), FieldError> {
        check_list(
            RecipeField::Ingredients,
            "Ingredients",
            "Ingredient",
            ingredients,
            self.rules.ingredients_min,
            self.rules.ingredients_max,
        )
    }

    pub fn steps(&self, steps: &[String]) -> Result<(), FieldError> {
        check_list(
            RecipeField::Steps,
            "Steps",
            "Step",
            steps,
            self.rules.steps_min,
            self.rules.steps_max,
        )
    }

    pub fn prep_time(&self, minutes: Option<i64>) -> Result<u32, FieldError> {
        check_minutes(
            RecipeField::PrepTime,
            "Preparation time",
            minutes,
            self.rules.prep_time_min,
            self.rules.prep_time_max,
        )
    }

    pub fn cook_time(&self, minutes: Option<i64>) -> Result<u32, FieldError> {
        check_minutes(
            RecipeField::CookTime,
            "Cooking time",
            minutes,
            self.rules.cook_time_min,
            self.rules.cook_time_max,
        )
    }

    pub fn difficulty(&self, difficulty: &str) -> Result<Difficulty, FieldError> {
        difficulty.parse().map_err(|_| {
            let allowed: Vec<&str> = Difficulty::ALL.iter().map(Difficulty::as_str).collect();
            FieldError::new(
                RecipeField::Difficulty,
                format!("Difficulty must be one of: {}", allowed.join(", ")),
            )
        })
    }

    /// An empty URL means the recipe has no image
    pub fn image_url(&self, image_url: &str) -> Result<Option<String>, FieldError> {
        if image_url.is_empty() {
            return Ok(None);
        }
        if !is_valid_url(image_url) {
            return Err(FieldError::new(
                RecipeField::ImageUrl,
                "Image URL is not valid",
            ));
        }
        Ok(Some(image_url.to_string()))
    }

    /// Runs every check and collects the violations in rule order
    pub fn check_all(&self, fields: &NormalizedFields) -> Vec<FieldError> {
        [
            self.title(&fields.title).err(),
            self.description(&fields.description).err(),
            self.ingredients(&fields.ingredients).err(),
            self.steps(&fields.steps).err(),
            self.prep_time(fields.prep_time).err(),
            self.cook_time(fields.cook_time).err(),
            self.difficulty(&fields.difficulty).err(),
            self.image_url(&fields.image_url).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn within(value: usize, min: usize, max: usize) -> bool {
    (min..=max).contains(&value)
}

fn check_list(
    field: RecipeField,
    plural: &str,
    singular: &str,
    items: &[String],
    min: usize,
    max: usize,
) -> Result<(), FieldError> {
    if !within(items.len(), min, max) {
        return Err(FieldError::new(
            field,
            format!("{} must contain between {} and {} items", plural, min, max),
        ));
    }
    if let Some(pos) = items.iter().position(|item| item.is_empty()) {
        return Err(FieldError::new(
            field,
            format!("{} {} must not be empty", singular, pos + 1),
        ));
    }
    Ok(())
}

fn check_minutes(
    field: RecipeField,
    label: &str,
    minutes: Option<i64>,
    min: u32,
    max: u32,
) -> Result<u32, FieldError> {
    minutes
        .filter(|m| (i64::from(min)..=i64::from(max)).contains(m))
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| {
            FieldError::new(
                field,
                format!("{} must be between {} and {} minutes", label, min, max),
            )
        })
}

/// Accepts only well-formed `http` and `https` URLs
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Checks every field rule and reports all violations together.
///
/// Intended for form-level feedback before submit. Does not build a recipe.
pub fn validate_all(raw: &RawRecipe, rules: &ValidationRules) -> Result<(), ValidationError> {
    let fields = NormalizedFields::from(raw);
    let errors = FieldChecker::new(rules).check_all(&fields);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}
