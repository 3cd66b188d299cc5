//! Menu category and subcategory pages.

use dashdesk_core::{ActiveStatus, CategoryId, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Category, CategoryInput, Subcategory, SubcategoryInput};

use super::resources::{AdminPage, Detail};

impl AdminPage for Category {
    const SLUG: &'static str = "categories";
    const TITLE: &'static str = "Categories";
    const LABEL: &'static str = "Category";

    fn table() -> DataTableConfig {
        DataTableConfig::new("categories")
            .column(TableColumn::numeric("sort_order", "Order"))
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("description", "Description"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<ActiveStatus>("Status")
            .search_placeholder("Search name or description...")
            .empty_state("No categories found", None)
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.sort_order.to_string()),
            Cell::text(&self.name),
            Cell::optional(self.description.as_deref()),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::new("Description", Cell::optional(self.description.as_deref())),
            Detail::new("Image", Cell::optional(self.image_url.as_deref())),
            Detail::text("Sort order", self.sort_order.to_string()),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("sort_order", "0")
            .with("status", ActiveStatus::Active.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("description", self.description.clone().unwrap_or_default())
            .with("image_url", self.image_url.clone().unwrap_or_default())
            .with("sort_order", self.sort_order.to_string())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", values).required(),
            FormField::textarea("description", "Description", values),
            FormField::url("image_url", "Image URL", values),
            FormField::number("sort_order", "Sort order", values).required(),
            FormField::choice::<ActiveStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<CategoryInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = CategoryInput {
            name: form.text("name"),
            description: form.optional("description"),
            image_url: form.optional("image_url"),
            sort_order: form.whole_number("sort_order"),
            status: form.choice("status", ActiveStatus::Active),
        };
        form.finish(input)
    }
}

impl AdminPage for Subcategory {
    const SLUG: &'static str = "subcategories";
    const TITLE: &'static str = "Subcategories";
    const LABEL: &'static str = "Subcategory";

    fn table() -> DataTableConfig {
        DataTableConfig::new("subcategories")
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("category_id", "Category"))
            .column(TableColumn::new("description", "Description"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<ActiveStatus>("Status")
            .search_placeholder("Search name or category...")
            .empty_state("No subcategories found", None)
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.name),
            Cell::text(self.category_id.as_str()),
            Cell::optional(self.description.as_deref()),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Category", self.category_id.as_str()),
            Detail::new("Description", Cell::optional(self.description.as_deref())),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new().with("status", ActiveStatus::Active.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("category_id", self.category_id.as_str())
            .with("name", &self.name)
            .with("description", self.description.clone().unwrap_or_default())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("category_id", "Category ID", values).required(),
            FormField::text("name", "Name", values).required(),
            FormField::textarea("description", "Description", values),
            FormField::choice::<ActiveStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<SubcategoryInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = SubcategoryInput {
            category_id: CategoryId::new(form.text("category_id")),
            name: form.text("name"),
            description: form.optional("description"),
            status: form.choice("status", ActiveStatus::Active),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_form() {
        let values = Category::default_values()
            .with("name", "Soups")
            .with("image_url", "");
        let input = Category::parse_form(&values).unwrap();
        assert_eq!(input.sort_order, 0);
        assert_eq!(input.image_url, None);
    }

    #[test]
    fn test_subcategory_form() {
        let values = Subcategory::default_values()
            .with("category_id", "cat_01")
            .with("name", "Pepper soup");
        let input = Subcategory::parse_form(&values).unwrap();
        assert_eq!(input.category_id.as_str(), "cat_01");
        assert_eq!(input.status, ActiveStatus::Active);
    }

    #[test]
    fn test_tables_line_up() {
        assert_eq!(Category::table().columns.len(), 4);
        assert_eq!(Subcategory::table().columns.len(), 4);
        assert_eq!(Subcategory::SLUG, "subcategories");
    }
}
