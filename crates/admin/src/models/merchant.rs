//! Merchants (restaurants and shops selling through the marketplace).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dashdesk_core::{MerchantId, MerchantStatus, Validate, ValidationErrors, Validator};

use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: MerchantId,
    pub business_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cuisine: String,
    /// Percentage of each order kept by the marketplace.
    pub commission_rate: Decimal,
    #[serde(default)]
    pub rating: Option<Decimal>,
    pub status: MerchantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInput {
    pub business_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cuisine: String,
    pub commission_rate: Decimal,
    pub status: MerchantStatus,
}

impl Validate for MerchantInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("business_name", &self.business_name)
            .min_len("business_name", &self.business_name, 2)
            .max_len("business_name", &self.business_name, 120)
            .required("owner_name", &self.owner_name)
            .min_len("owner_name", &self.owner_name, 2)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("phone", &self.phone)
            .phone("phone", &self.phone)
            .required("address", &self.address)
            .min_len("address", &self.address, 5)
            .required("cuisine", &self.cuisine)
            .range(
                "commission_rate",
                self.commission_rate,
                Decimal::ZERO,
                Decimal::ONE_HUNDRED,
            )
            .finish()
    }
}

impl Resource for Merchant {
    type Id = MerchantId;
    type Input = MerchantInput;

    const NAME: &'static str = "merchant";
    const ID_PREFIX: &'static str = "mer";
    const LIST_PATH: &'static str = "/merchant/list";
    const CREATE_PATH: &'static str = "/merchant";
    const ITEM_PREFIX: &'static str = "/merchant";

    fn id(&self) -> &MerchantId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.business_name.as_str(),
            self.owner_name.as_str(),
            self.email.as_str(),
            self.cuisine.as_str(),
        ]
    }

    fn from_input(id: MerchantId, input: MerchantInput, now: DateTime<Utc>) -> Self {
        let mut merchant = Self {
            id,
            business_name: String::new(),
            owner_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            cuisine: String::new(),
            commission_rate: Decimal::ZERO,
            rating: None,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        merchant.apply_input(input, now);
        merchant
    }

    fn apply_input(&mut self, input: MerchantInput, now: DateTime<Utc>) {
        self.business_name = input.business_name.trim().to_string();
        self.owner_name = input.owner_name.trim().to_string();
        self.email = input.email.trim().to_string();
        self.phone = input.phone.trim().to_string();
        self.address = input.address.trim().to_string();
        self.cuisine = input.cuisine.trim().to_string();
        self.commission_rate = input.commission_rate;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.merchants
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> MerchantInput {
        MerchantInput {
            business_name: "Mama Put Kitchen".into(),
            owner_name: "Ngozi Eze".into(),
            email: "hello@mamaput.ng".into(),
            phone: "+234 803 000 1111".into(),
            address: "12 Allen Avenue, Ikeja".into(),
            cuisine: "Nigerian".into(),
            commission_rate: Decimal::from(15),
            status: MerchantStatus::Pending,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_business_name_minimum_length() {
        let errors = MerchantInput {
            business_name: "M".into(),
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.first("business_name"),
            Some("Business name must be at least 2 characters")
        );
    }

    #[test]
    fn test_commission_bounds() {
        let errors = MerchantInput {
            commission_rate: Decimal::from(101),
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.first("commission_rate"),
            Some("Commission rate must be between 0 and 100")
        );
    }

    #[test]
    fn test_update_keeps_rating() {
        let now = Utc::now();
        let mut merchant = Merchant::from_input(MerchantId::new("mer_1"), input(), now);
        merchant.rating = Some(Decimal::new(45, 1));

        merchant.apply_input(
            MerchantInput {
                status: MerchantStatus::Approved,
                ..input()
            },
            now,
        );
        assert_eq!(merchant.status, MerchantStatus::Approved);
        assert_eq!(merchant.rating, Some(Decimal::new(45, 1)));
    }
}
