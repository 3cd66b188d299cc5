//! Customer management pages.

use dashdesk_core::{CustomerStatus, ValidationErrors};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Customer, CustomerInput};

use super::resources::{AdminPage, Detail};

impl AdminPage for Customer {
    const SLUG: &'static str = "customers";
    const TITLE: &'static str = "Customers";
    const LABEL: &'static str = "Customer";

    fn table() -> DataTableConfig {
        DataTableConfig::new("customers")
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("phone", "Phone"))
            .column(TableColumn::numeric("total_orders", "Orders"))
            .column(TableColumn::numeric("total_spent", "Spent"))
            .column(TableColumn::new("status", "Status"))
            .status_filter::<CustomerStatus>("Status")
            .search_placeholder("Search name, email or phone...")
            .empty_state("No customers found", Some("Try a different search or filter."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.name),
            Cell::text(&self.email),
            Cell::text(&self.phone),
            Cell::text(self.total_orders.to_string()),
            Cell::text(self.total_spent.display()),
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
            Detail::new("Address", Cell::optional(self.address.as_deref())),
            Detail::new("Status", Cell::status(self.status)),
            Detail::text("Orders", self.total_orders.to_string()),
            Detail::text("Total spent", self.total_spent.display()),
            Detail::new("Joined", Cell::date(&self.created_at)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new().with("status", CustomerStatus::Active.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("address", self.address.clone().unwrap_or_default())
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, _editing: bool) -> Vec<FormField> {
        vec![
            FormField::text("name", "Full name", values).required(),
            FormField::email("email", "Email", values).required(),
            FormField::tel("phone", "Phone", values).required(),
            FormField::textarea("address", "Address", values),
            FormField::choice::<CustomerStatus>("status", "Status", values),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<CustomerInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let input = CustomerInput {
            name: form.text("name"),
            email: form.text("email"),
            phone: form.text("phone"),
            address: form.optional("address"),
            status: form.choice("status", CustomerStatus::Active),
        };
        form.finish(input)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dashdesk_core::CustomerId;

    use super::*;
    use crate::routes::resources::item_href;

    fn values() -> FormValues {
        FormValues::new()
            .with("name", " Amara Okafor ")
            .with("email", "amara@example.com")
            .with("phone", "+234 801 234 5678")
            .with("address", "")
            .with("status", "blocked")
    }

    #[test]
    fn test_parse_form() {
        let input = Customer::parse_form(&values()).unwrap();
        assert_eq!(input.name, "Amara Okafor");
        assert_eq!(input.address, None);
        assert_eq!(input.status, CustomerStatus::Blocked);
    }

    #[test]
    fn test_unknown_status_is_a_field_error() {
        let errors = Customer::parse_form(&values().with("status", "vip")).unwrap_err();
        assert_eq!(errors.first("status"), Some("Choose a valid status"));
    }

    #[test]
    fn test_row_matches_columns() {
        let now = chrono::Utc::now();
        let customer = <Customer as crate::marketplace::Resource>::from_input(
            CustomerId::new("cus_1"),
            Customer::parse_form(&values()).unwrap(),
            now,
        );
        assert_eq!(customer.row().len(), Customer::table().columns.len());
        assert_eq!(item_href::<Customer>(&customer.id), "/customers/cus_1");
        assert_eq!(Customer::form_fields(&customer.form_values(), true)[4].value, "blocked");
    }

    #[test]
    fn test_item_href_round_trips_through_path() {
        assert_eq!(
            item_href::<Customer>(&CustomerId::new("a b+c")),
            "/customers/a%20b+c"
        );
        assert_eq!(item_href::<Customer>(&CustomerId::new("..")), "/customers");
    }
}
