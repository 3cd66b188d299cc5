//! Customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{CustomerId, CustomerStatus, Price, Validate, ValidationErrors, Validator};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

/// A customer as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: CustomerStatus,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub total_spent: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable customer fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: CustomerStatus,
}

impl Validate for CustomerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("name", &self.name)
            .min_len("name", &self.name, 2)
            .max_len("name", &self.name, 100)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("phone", &self.phone)
            .phone("phone", &self.phone)
            .max_len("address", self.address.as_deref().unwrap_or_default(), 200)
            .finish()
    }
}

impl Resource for Customer {
    type Id = CustomerId;
    type Input = CustomerInput;

    const NAME: &'static str = "customer";
    const ID_PREFIX: &'static str = "cus";
    const LIST_PATH: &'static str = "/customer/list";
    const CREATE_PATH: &'static str = "/customer";
    const ITEM_PREFIX: &'static str = "/customer";

    fn id(&self) -> &CustomerId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }

    fn from_input(id: CustomerId, input: CustomerInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: non_blank(input.address),
            status: input.status,
            total_orders: 0,
            total_spent: Price::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: CustomerInput, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.email = input.email.trim().to_string();
        self.phone = input.phone.trim().to_string();
        self.address = non_blank(input.address);
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.customers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> CustomerInput {
        CustomerInput {
            name: "Amara Okafor".into(),
            email: "amara@example.com".into(),
            phone: "+234 801 234 5678".into(),
            address: Some("  ".into()),
            status: CustomerStatus::Active,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_reports_every_bad_field() {
        let errors = CustomerInput {
            name: "A".into(),
            email: "amara.example.com".into(),
            phone: "12".into(),
            ..input()
        }
        .validate()
        .unwrap_err();

        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_from_input_trims_and_resets_totals() {
        let customer = Customer::from_input(CustomerId::new("cus_1"), input(), Utc::now());
        assert_eq!(customer.address, None);
        assert_eq!(customer.total_orders, 0);
        assert_eq!(customer.created_at, customer.updated_at);
    }

    #[test]
    fn test_deserializes_api_record() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": "cus_9",
            "name": "Tunde Bello",
            "email": "tunde@example.com",
            "phone": "08012345678",
            "status": "blocked",
            "totalSpent": "120.50",
            "createdAt": "2026-03-01T10:00:00Z",
            "updatedAt": "2026-03-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(customer.status, CustomerStatus::Blocked);
        assert_eq!(customer.total_spent.display(), "$120.50");
        assert_eq!(customer.total_orders, 0);
    }
}
