use std::ops::RangeInclusive;

use crate::model::{Difficulty, Recipe};

/// Criteria for narrowing a recipe list. All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    search: String,
    difficulty: Option<Difficulty>,
    prep_time: Option<RangeInclusive<u32>>,
    cook_time: Option<RangeInclusive<u32>>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive text matched against title, description and
    /// ingredients. Blank text matches everything.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.search = term.as_ref().trim().to_lowercase();
        self
    }

    pub fn difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn prep_time(mut self, min: u32, max: u32) -> Self {
        self.prep_time = Some(min..=max);
        self
    }

    pub fn cook_time(mut self, min: u32, max: u32) -> Self {
        self.cook_time = Some(min..=max);
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_search(recipe)
            && self.difficulty.map_or(true, |d| recipe.difficulty == d)
            && self
                .prep_time
                .as_ref()
                .map_or(true, |range| range.contains(&recipe.prep_time))
            && self
                .cook_time
                .as_ref()
                .map_or(true, |range| range.contains(&recipe.cook_time))
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.as_str();
        recipe.title.to_lowercase().contains(term)
            || recipe.description.to_lowercase().contains(term)
            || recipe
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(term))
    }

    /// Matching recipes, in their original order
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}
