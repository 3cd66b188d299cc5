//! Home screen banner pages.

use dashdesk_core::{ActiveStatus, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Banner, BannerInput};

use super::resources::{AdminPage, Detail};

impl AdminPage for Banner {
    const SLUG: &'static str = "banners";
    const TITLE: &'static str = "Banners";
    const LABEL: &'static str = "Banner";

    fn table() -> DataTableConfig {
        DataTableConfig::new("banners")
            .column(TableColumn::numeric("position", "Position"))
            .column(TableColumn::new("title", "Title"))
            .column(TableColumn::new("link_url", "Link"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<ActiveStatus>("Status")
            .search_placeholder("Search title...")
            .empty_state("No banners yet", Some("Banners appear on the app's home screen."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.position.to_string()),
            Cell::text(&self.title),
            Cell::optional(self.link_url.as_deref()),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.title.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Image", &self.image_url),
            Detail::new("Link", Cell::optional(self.link_url.as_deref())),
            Detail::text("Position", self.position.to_string()),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("position", "1")
            .with("status", ActiveStatus::Active.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("image_url", &self.image_url)
            .with("link_url", self.link_url.clone().unwrap_or_default())
            .with("position", self.position.to_string())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("title", "Title", values).required(),
            FormField::url("image_url", "Image URL", values).required(),
            FormField::url("link_url", "Link URL", values)
                .help("Where the banner leads when tapped."),
            FormField::number("position", "Position", values)
                .required()
                .help("Lower numbers show first."),
            FormField::choice::<ActiveStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<BannerInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = BannerInput {
            title: form.text("title"),
            image_url: form.text("image_url"),
            link_url: form.optional("link_url"),
            position: form.whole_number("position"),
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
    fn test_parse_form() {
        let values = Banner::default_values()
            .with("title", "Free delivery weekend")
            .with("image_url", "https://cdn.dashdesk.dev/banners/free.png");
        let input = Banner::parse_form(&values).unwrap();
        assert_eq!(input.position, 1);
        assert_eq!(input.link_url, None);
    }

    #[test]
    fn test_negative_position_rejected() {
        let values = Banner::default_values()
            .with("title", "Free delivery weekend")
            .with("position", "-2");
        let errors = Banner::parse_form(&values).unwrap_err();
        assert_eq!(errors.first("position"), Some("Position must be a whole number"));
        assert!(errors.has("image_url"));
    }
}
