//! Recipes featured in the app's cooking section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{CategoryId, RecipeId, RecipeStatus, Validate, ValidationErrors, Validator};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time_minutes: u32,
    pub servings: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: RecipeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time_minutes: u32,
    pub servings: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: RecipeStatus,
}

impl Validate for RecipeInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("title", &self.title)
            .min_len("title", &self.title, 3)
            .max_len("title", &self.title, 120)
            .check(
                "ingredients",
                self.ingredients.iter().any(|i| !i.trim().is_empty()),
                "Add at least one ingredient",
            )
            .required("instructions", &self.instructions)
            .min_len("instructions", &self.instructions, 10)
            .at_least("prep_time_minutes", self.prep_time_minutes, 1)
            .at_least("servings", self.servings, 1)
            .url("image_url", self.image_url.as_deref().unwrap_or_default())
            .finish()
    }
}

fn clean_ingredients(ingredients: Vec<String>) -> Vec<String> {
    ingredients
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

impl Resource for Recipe {
    type Id = RecipeId;
    type Input = RecipeInput;

    const NAME: &'static str = "recipe";
    const ID_PREFIX: &'static str = "rec";
    const LIST_PATH: &'static str = "/recipe";
    const CREATE_PATH: &'static str = "/recipe";
    const ITEM_PREFIX: &'static str = "/recipe";

    fn id(&self) -> &RecipeId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.ingredients.iter().map(String::as_str));
        fields
    }

    fn from_input(id: RecipeId, input: RecipeInput, now: DateTime<Utc>) -> Self {
        let mut recipe = Self {
            id,
            title: String::new(),
            description: None,
            category_id: None,
            ingredients: Vec::new(),
            instructions: String::new(),
            prep_time_minutes: input.prep_time_minutes,
            servings: input.servings,
            image_url: None,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        recipe.apply_input(input, now);
        recipe
    }

    fn apply_input(&mut self, input: RecipeInput, now: DateTime<Utc>) {
        self.title = input.title.trim().to_string();
        self.description = non_blank(input.description);
        self.category_id = input.category_id.filter(|c| !c.as_str().is_empty());
        self.ingredients = clean_ingredients(input.ingredients);
        self.instructions = input.instructions.trim().to_string();
        self.prep_time_minutes = input.prep_time_minutes;
        self.servings = input.servings;
        self.image_url = non_blank(input.image_url);
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.recipes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> RecipeInput {
        RecipeInput {
            title: "Egusi soup".into(),
            description: None,
            category_id: None,
            ingredients: vec!["Ground melon seeds".into(), "  ".into(), "Spinach".into()],
            instructions: "Fry the egusi paste, add stock, simmer, then fold in the spinach.".into(),
            prep_time_minutes: 45,
            servings: 4,
            image_url: None,
            status: RecipeStatus::Draft,
        }
    }

    #[test]
    fn test_valid_and_blank_ingredients_dropped() {
        let input = input();
        assert!(input.validate().is_ok());

        let recipe = Recipe::from_input(RecipeId::new("rec_1"), input, Utc::now());
        assert_eq!(recipe.ingredients, vec!["Ground melon seeds", "Spinach"]);
        assert!(recipe.matches_search("spinach"));
    }

    #[test]
    fn test_numeric_minimums() {
        let errors = RecipeInput {
            prep_time_minutes: 0,
            servings: 0,
            ingredients: vec![],
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("servings"), Some("Servings must be at least 1"));
        assert_eq!(
            errors.first("prep_time_minutes"),
            Some("Prep time minutes must be at least 1")
        );
        assert_eq!(errors.first("ingredients"), Some("Add at least one ingredient"));
    }
}
