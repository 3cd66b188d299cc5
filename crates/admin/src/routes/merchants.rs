//! Merchant onboarding and management pages.

use rust_decimal::Decimal;

use dashdesk_core::{MerchantStatus, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Merchant, MerchantInput};

use super::resources::{AdminPage, Detail};

/// Commission shown as a percentage, e.g. `15%`.
fn commission(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

fn rating(rating: Option<Decimal>) -> Cell {
    Cell::optional(rating.map(|r| format!("{:.1}", r.round_dp(1))))
}

impl AdminPage for Merchant {
    const SLUG: &'static str = "merchants";
    const TITLE: &'static str = "Merchants";
    const LABEL: &'static str = "Merchant";

    fn table() -> DataTableConfig {
        DataTableConfig::new("merchants")
            .column(TableColumn::new("business_name", "Business"))
            .column(TableColumn::new("owner_name", "Owner"))
            .column(TableColumn::new("cuisine", "Cuisine"))
            .column(TableColumn::numeric("commission_rate", "Commission"))
            .column(TableColumn::numeric("rating", "Rating"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<MerchantStatus>("Status")
            .search_placeholder("Search business, owner, email or cuisine...")
            .empty_state("No merchants found", Some("Try a different search or filter."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.business_name),
            Cell::text(&self.owner_name),
            Cell::text(&self.cuisine),
            Cell::text(commission(self.commission_rate)),
            rating(self.rating),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.business_name.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Owner", &self.owner_name),
            Detail::text("Email", &self.email),
            Detail::text("Phone", &self.phone),
            Detail::text("Address", &self.address),
            Detail::text("Cuisine", &self.cuisine),
            Detail::text("Commission", commission(self.commission_rate)),
            Detail::new("Rating", rating(self.rating)),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Joined", Cell::date(&self.created_at)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("commission_rate", "15")
            .with("status", MerchantStatus::Pending.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("business_name", &self.business_name)
            .with("owner_name", &self.owner_name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("address", &self.address)
            .with("cuisine", &self.cuisine)
            .with("commission_rate", self.commission_rate.normalize().to_string())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("business_name", "Business name", values).required(),
            FormField::text("owner_name", "Owner name", values).required(),
            FormField::email("email", "Email", values).required(),
            FormField::tel("phone", "Phone", values).required(),
            FormField::textarea("address", "Address", values).required(),
            FormField::text("cuisine", "Cuisine", values).required(),
            FormField::decimal("commission_rate", "Commission (%)", values)
                .required()
                .help("Share of each order kept by the marketplace, 0 to 100."),
            FormField::choice::<MerchantStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<MerchantInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = MerchantInput {
            business_name: form.text("business_name"),
            owner_name: form.text("owner_name"),
            email: form.text("email"),
            phone: form.text("phone"),
            address: form.text("address"),
            cuisine: form.text("cuisine"),
            commission_rate: form.decimal("commission_rate"),
            status: form.choice("status", MerchantStatus::Pending),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_helpers() {
        assert_eq!(commission(Decimal::new(1250, 2)), "12.5%");
        assert_eq!(rating(Some(Decimal::new(467, 2))).text, "4.7");
        assert_eq!(rating(None).text, "—");
    }

    #[test]
    fn test_parse_form_reports_bad_commission() {
        let values = Merchant::default_values()
            .with("business_name", "Mama Put Kitchen")
            .with("commission_rate", "fifteen");
        let errors = Merchant::parse_form(&values).unwrap_err();
        assert_eq!(
            errors.first("commission_rate"),
            Some("Commission rate must be a number")
        );
        assert!(errors.has("owner_name"));
        assert!(!errors.has("business_name"));
    }

    #[test]
    fn test_defaults_parse_status() {
        let values = Merchant::default_values()
            .with("business_name", "Suya Spot")
            .with("owner_name", "Musa Bello")
            .with("email", "musa@suyaspot.ng")
            .with("phone", "08030001111")
            .with("address", "3 Admiralty Way, Lekki")
            .with("cuisine", "Grill");
        let input = Merchant::parse_form(&values).unwrap();
        assert_eq!(input.status, MerchantStatus::Pending);
        assert_eq!(input.commission_rate, Decimal::from(15));
    }
}
