//! Rider fleet pages.

use dashdesk_core::{RiderStatus, ValidationErrors, VehicleType};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Rider, RiderInput};

use super::resources::{AdminPage, Detail};

impl AdminPage for Rider {
    const SLUG: &'static str = "riders";
    const TITLE: &'static str = "Riders";
    const LABEL: &'static str = "Rider";

    fn table() -> DataTableConfig {
        DataTableConfig::new("riders")
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("phone", "Phone"))
            .column(TableColumn::new("vehicle_type", "Vehicle"))
            .column(TableColumn::new("license_plate", "Plate"))
            .column(TableColumn::numeric("completed_deliveries", "Deliveries"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<RiderStatus>("Status")
            .search_placeholder("Search name, email, phone or plate...")
            .empty_state("No riders found", Some("Try a different search or filter."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.name),
            Cell::text(&self.phone),
            Cell::text(self.vehicle_type.label()),
            Cell::optional(self.license_plate.as_deref()),
            Cell::text(self.completed_deliveries.to_string()),
            Cell::status(self.status),
        ]
    }

    fn heading(&self) -> String {
        self.name.clone()
    }

    fn details(&self) -> Vec<Detail> {
        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::text("Email", &self.email),
            Detail::text("Phone", &self.phone),
            Detail::text("Vehicle", self.vehicle_type.label()),
            Detail::new("License plate", Cell::optional(self.license_plate.as_deref())),
            Detail::new(
                "Rating",
                Cell::optional(self.rating.map(|r| format!("{:.1}", r.round_dp(1)))),
            ),
            Detail::text("Completed deliveries", self.completed_deliveries.to_string()),
            Detail::new("Status", Cell::status(self.status)),
            Detail::new("Joined", Cell::date(&self.created_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("vehicle_type", VehicleType::Motorcycle.as_str())
            .with("status", RiderStatus::Offline.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("vehicle_type", self.vehicle_type.as_str())
            .with("license_plate", self.license_plate.clone().unwrap_or_default())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("name", "Full name", values).required(),
            FormField::email("email", "Email", values).required(),
            FormField::tel("phone", "Phone", values).required(),
            FormField::choice::<VehicleType>("vehicle_type", "Vehicle", values),
            FormField::text("license_plate", "License plate", values)
                .help("Required for everything except bicycles."),
            FormField::choice::<RiderStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<RiderInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = RiderInput {
            name: form.text("name"),
            email: form.text("email"),
            phone: form.text("phone"),
            vehicle_type: form.choice("vehicle_type", VehicleType::Motorcycle),
            license_plate: form.optional("license_plate"),
            status: form.choice("status", RiderStatus::Offline),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dashdesk_core::Validate;

    use super::*;

    #[test]
    fn test_parse_form_leaves_plate_rule_to_validation() {
        let values = Rider::default_values()
            .with("name", "Kelechi Obi")
            .with("email", "kelechi@riders.dashdesk.dev")
            .with("phone", "08031234567");
        let input = Rider::parse_form(&values).unwrap();
        assert_eq!(input.vehicle_type, VehicleType::Motorcycle);
        assert_eq!(input.license_plate, None);
        assert!(input.validate().unwrap_err().has("license_plate"));
    }

    #[test]
    fn test_bad_vehicle_type() {
        let values = Rider::default_values().with("vehicle_type", "hovercraft");
        let errors = Rider::parse_form(&values).unwrap_err();
        assert_eq!(errors.first("vehicle_type"), Some("Choose a valid vehicle type"));
    }
}
