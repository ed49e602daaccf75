use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// How demanding a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown difficulty: {}", s))
    }
}

/// A validated recipe as held by the store and written to the medium.
///
/// Values are produced by [`crate::factory::RecipeFactory`]; the store keeps
/// them as-is and never revalidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub difficulty: Difficulty,
    #[serde(
        rename = "imageURL",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub image_url: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Loosely typed recipe fields as they come from a form or a JSON file.
///
/// Every field is optional. Times are signed so negative input reaches
/// validation instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub steps: Option<Vec<String>>,
    #[serde(default)]
    pub prep_time: Option<i64>,
    #[serde(default)]
    pub cook_time: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl From<&Recipe> for RawRecipe {
    fn from(recipe: &Recipe) -> Self {
        RawRecipe {
            id: Some(recipe.id.clone()),
            title: Some(recipe.title.clone()),
            description: Some(recipe.description.clone()),
            ingredients: Some(recipe.ingredients.clone()),
            steps: Some(recipe.steps.clone()),
            prep_time: Some(i64::from(recipe.prep_time)),
            cook_time: Some(i64::from(recipe.cook_time)),
            difficulty: Some(recipe.difficulty.to_string()),
            image_url: recipe.image_url.clone(),
        }
    }
}

/// Names the recipe fields that validation reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    Title,
    Description,
    Ingredients,
    Steps,
    PrepTime,
    CookTime,
    Difficulty,
    ImageUrl,
}

impl RecipeField {
    /// Field name as used in forms and in the serialized record
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeField::Title => "title",
            RecipeField::Description => "description",
            RecipeField::Ingredients => "ingredients",
            RecipeField::Steps => "steps",
            RecipeField::PrepTime => "prepTime",
            RecipeField::CookTime => "cookTime",
            RecipeField::Difficulty => "difficulty",
            RecipeField::ImageUrl => "imageURL",
        }
    }
}

impl fmt::Display for RecipeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tea() -> Recipe {
        Recipe {
            id: "tea-1".to_string(),
            title: "Tea".to_string(),
            description: "Hot tea".to_string(),
            ingredients: vec!["water".to_string(), "tea bag".to_string()],
            steps: vec!["Boil water".to_string(), "Steep bag".to_string()],
            prep_time: 2,
            cook_time: 3,
            difficulty: Difficulty::Easy,
            image_url: None,
        }
    }

    #[test]
    fn test_recipe_uses_camel_case_layout() {
        let json = serde_json::to_value(tea()).unwrap();
        assert_eq!(json["prepTime"], 2);
        assert_eq!(json["cookTime"], 3);
        assert_eq!(json["difficulty"], "easy");
        assert!(json.get("imageURL").is_none());
    }

    #[test]
    fn test_empty_image_url_reads_as_none() {
        let json = r#"{
            "id": "x", "title": "T", "description": "D",
            "ingredients": ["a"], "steps": ["b"],
            "prepTime": 1, "cookTime": 1, "difficulty": "hard",
            "imageURL": ""
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.image_url, None);
        assert_eq!(recipe.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("Easy".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_raw_recipe_accepts_partial_input() {
        let raw: RawRecipe = serde_json::from_str(r#"{"title": "Only a title", "prepTime": -4}"#).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Only a title"));
        assert_eq!(raw.prep_time, Some(-4));
        assert!(raw.ingredients.is_none());
    }

    #[test]
    fn test_raw_recipe_from_recipe() {
        let recipe = tea();
        let raw = RawRecipe::from(&recipe);
        assert_eq!(raw.id.as_deref(), Some("tea-1"));
        assert_eq!(raw.difficulty.as_deref(), Some("easy"));
        assert_eq!(raw.cook_time, Some(3));
    }
}
