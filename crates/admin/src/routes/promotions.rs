//! Promotion code pages.

use chrono::{Duration, Utc};

use dashdesk_core::{DiscountType, PromotionStatus, ValidationErrors};

use crate::components::form::datetime_value;
use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Promotion, PromotionInput};

use super::resources::{AdminPage, Detail};

impl Promotion {
    fn usage(&self) -> String {
        self.usage_limit.map_or_else(
            || self.used_count.to_string(),
            |limit| format!("{} / {limit}", self.used_count),
        )
    }
}

impl AdminPage for Promotion {
    const SLUG: &'static str = "promotions";
    const TITLE: &'static str = "Promotions";
    const LABEL: &'static str = "Promotion";

    fn table() -> DataTableConfig {
        DataTableConfig::new("promotions")
            .column(TableColumn::new("code", "Code"))
            .column(TableColumn::new("title", "Title"))
            .column(TableColumn::numeric("discount", "Discount"))
            .column(TableColumn::numeric("usage", "Used"))
            .column(TableColumn::new("starts_at", "Starts"))
            .column(TableColumn::new("ends_at", "Ends"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<PromotionStatus>("Status")
            .search_placeholder("Search code or title...")
            .empty_state("No promotions found", None)
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.code),
            Cell::text(&self.title),
            Cell::text(self.discount_display()),
            Cell::text(self.usage()),
            Cell::date(&self.starts_at),
            Cell::date(&self.ends_at),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.code.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Title", &self.title),
            Detail::new("Description", Cell::optional(self.description.as_deref())),
            Detail::text("Discount", self.discount_display()),
            Detail::new(
                "Minimum order",
                Cell::optional(self.min_order_amount.map(|p| p.display())),
            ),
            Detail::text("Used", self.usage()),
            Detail::new("Starts", Cell::date(&self.starts_at)),
            Detail::new("Ends", Cell::date(&self.ends_at)),
            Detail::new("Status", Cell::status(self.status)),
            Detail::text(
                "Redeemable now",
                if self.is_live(Utc::now()) { "Yes" } else { "No" },
            ),
        ]
    }

    fn default_values() -> FormValues {
        let starts_at = Utc::now();
        FormValues::new()
            .with("discount_type", DiscountType::Percentage.as_str())
            .with("starts_at", datetime_value(&starts_at))
            .with("ends_at", datetime_value(&(starts_at + Duration::days(30))))
            .with("status", PromotionStatus::Scheduled.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("code", &self.code)
            .with("title", &self.title)
            .with("description", self.description.clone().unwrap_or_default())
            .with("discount_type", self.discount_type.as_str())
            .with("discount_value", self.discount_value.normalize().to_string())
            .with(
                "min_order_amount",
                self.min_order_amount
                    .map(|p| format!("{:.2}", p.amount()))
                    .unwrap_or_default(),
            )
            .with(
                "usage_limit",
                self.usage_limit.map(|l| l.to_string()).unwrap_or_default(),
            )
            .with("starts_at", datetime_value(&self.starts_at))
            .with("ends_at", datetime_value(&self.ends_at))
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("code", "Code", values)
                .required()
                .help("3 to 20 uppercase letters and digits."),
            FormField::text("title", "Title", values).required(),
            FormField::textarea("description", "Description", values),
            FormField::choice::<DiscountType>("discount_type", "Discount type", values),
            FormField::decimal("discount_value", "Discount value", values).required(),
            FormField::decimal("min_order_amount", "Minimum order amount", values),
            FormField::number("usage_limit", "Usage limit", values)
                .help("Leave blank for unlimited redemptions."),
            FormField::datetime("starts_at", "Starts at (UTC)", values).required(),
            FormField::datetime("ends_at", "Ends at (UTC)", values).required(),
            FormField::choice::<PromotionStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<PromotionInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = PromotionInput {
            code: form.text("code").to_uppercase(),
            title: form.text("title"),
            description: form.optional("description"),
            discount_type: form.choice("discount_type", DiscountType::Percentage),
            discount_value: form.decimal("discount_value"),
            min_order_amount: form.optional_price("min_order_amount"),
            usage_limit: form.optional_whole_number("usage_limit"),
            starts_at: form.datetime("starts_at"),
            ends_at: form.datetime("ends_at"),
            status: form.choice("status", PromotionStatus::Scheduled),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dashdesk_core::Price;
    use rust_decimal::Decimal;

    use super::*;

    fn values() -> FormValues {
        FormValues::new()
            .with("code", "rainy5")
            .with("title", "Rainy day treat")
            .with("discount_type", "fixed")
            .with("discount_value", "5")
            .with("min_order_amount", "20")
            .with("usage_limit", "")
            .with("starts_at", "2026-11-01T08:00")
            .with("ends_at", "2026-11-30T23:59")
            .with("status", "active")
    }

    #[test]
    fn test_parse_form() {
        let input = Promotion::parse_form(&values()).unwrap();
        assert_eq!(input.code, "RAINY5");
        assert_eq!(input.discount_type, DiscountType::Fixed);
        assert_eq!(input.discount_value, Decimal::from(5));
        assert_eq!(input.min_order_amount, Some(Price::from_cents(2000)));
        assert_eq!(input.usage_limit, None);
        assert_eq!(datetime_value(&input.ends_at), "2026-11-30T23:59");
    }

    #[test]
    fn test_bad_dates_are_field_errors() {
        let errors = Promotion::parse_form(&values().with("starts_at", "next week")).unwrap_err();
        assert_eq!(
            errors.first("starts_at"),
            Some("Starts at must be a date and time")
        );
    }

    #[test]
    fn test_usage_text() {
        let input = Promotion::parse_form(&values().with("usage_limit", "50")).unwrap();
        let promotion = <Promotion as crate::marketplace::Resource>::from_input(
            dashdesk_core::PromotionId::new("promo_9"),
            input,
            Utc::now(),
        );
        assert_eq!(promotion.usage(), "0 / 50");
        assert_eq!(promotion.form_values().get("usage_limit"), "50");
        assert_eq!(promotion.form_values().get("min_order_amount"), "20.00");
    }
}
