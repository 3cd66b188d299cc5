//! Recipe pages. Ingredients are edited one per line.

use dashdesk_core::{CategoryId, RecipeStatus, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Recipe, RecipeInput};

use super::resources::{AdminPage, Detail};

impl AdminPage for Recipe {
    const SLUG: &'static str = "recipes";
    const TITLE: &'static str = "Recipes";
    const LABEL: &'static str = "Recipe";

    fn table() -> DataTableConfig {
        DataTableConfig::new("recipes")
            .column(TableColumn::new("title", "Title"))
            .column(TableColumn::new("category_id", "Category"))
            .column(TableColumn::numeric("prep_time_minutes", "Prep time"))
            .column(TableColumn::numeric("servings", "Servings"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<RecipeStatus>("Status")
            .search_placeholder("Search title or ingredient...")
            .empty_state("No recipes found", None)
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.title),
            Cell::optional(self.category_id.as_ref().map(CategoryId::as_str)),
            Cell::text(format!("{} min", self.prep_time_minutes)),
            Cell::text(self.servings.to_string()),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.title.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::new("Description", Cell::optional(self.description.as_deref())),
            Detail::new(
                "Category",
                Cell::optional(self.category_id.as_ref().map(CategoryId::as_str)),
            ),
            Detail::text("Ingredients", self.ingredients.join(", ")),
            Detail::text("Instructions", &self.instructions),
            Detail::text("Prep time", format!("{} min", self.prep_time_minutes)),
            Detail::text("Servings", self.servings.to_string()),
            Detail::new("Image", Cell::optional(self.image_url.as_deref())),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("servings", "2")
            .with("status", RecipeStatus::Draft.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("description", self.description.clone().unwrap_or_default())
            .with(
                "category_id",
                self.category_id.as_ref().map(CategoryId::as_str).unwrap_or_default(),
            )
            .with("ingredients", self.ingredients.join("\n"))
            .with("instructions", &self.instructions)
            .with("prep_time_minutes", self.prep_time_minutes.to_string())
            .with("servings", self.servings.to_string())
            .with("image_url", self.image_url.clone().unwrap_or_default())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("title", "Title", values).required(),
            FormField::textarea("description", "Description", values),
            FormField::text("category_id", "Category ID", values),
            FormField::textarea("ingredients", "Ingredients", values)
                .required()
                .help("One ingredient per line."),
            FormField::textarea("instructions", "Instructions", values).required(),
            FormField::number("prep_time_minutes", "Prep time (minutes)", values).required(),
            FormField::number("servings", "Servings", values).required(),
            FormField::url("image_url", "Image URL", values),
            FormField::choice::<RecipeStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<RecipeInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let ingredients = form
            .text("ingredients")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let input = RecipeInput {
            title: form.text("title"),
            description: form.optional("description"),
            category_id: form.optional("category_id").map(CategoryId::new),
            ingredients,
            instructions: form.text("instructions"),
            prep_time_minutes: form.whole_number("prep_time_minutes"),
            servings: form.whole_number("servings"),
            image_url: form.optional("image_url"),
            status: form.choice("status", RecipeStatus::Draft),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredients_one_per_line() {
        let values = Recipe::default_values()
            .with("title", "Egusi soup")
            .with("ingredients", "Egusi\n\n  Palm oil \r\nSpinach")
            .with("instructions", "Fry the egusi, add stock and greens.")
            .with("prep_time_minutes", "45");
        let input = Recipe::parse_form(&values).unwrap();
        assert_eq!(input.ingredients, vec!["Egusi", "Palm oil", "Spinach"]);
        assert_eq!(input.category_id, None);
        assert_eq!(input.servings, 2);
    }

    #[test]
    fn test_missing_prep_time() {
        let values = Recipe::default_values().with("title", "Egusi soup");
        let errors = Recipe::parse_form(&values).unwrap_err();
        assert_eq!(
            errors.first("prep_time_minutes"),
            Some("Prep time minutes is required")
        );
        assert_eq!(errors.first("ingredients"), Some("Add at least one ingredient"));
    }
}
