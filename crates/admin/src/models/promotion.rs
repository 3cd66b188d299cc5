//! Promotion codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dashdesk_core::{
    DiscountType, Price, PromotionId, PromotionStatus, Validate, ValidationErrors, Validator,
};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: PromotionId,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default)]
    pub min_order_amount: Option<Price>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: PromotionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// Discount as shown in tables: `15%` or `$5.00`.
    #[must_use]
    pub fn discount_display(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{}%", self.discount_value.normalize()),
            DiscountType::Fixed => Price::new(self.discount_value).display(),
        }
    }

    /// Whether the promotion can be redeemed at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == PromotionStatus::Active
            && self.starts_at <= now
            && now < self.ends_at
            && self.usage_limit.is_none_or(|limit| self.used_count < limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionInput {
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: PromotionStatus,
}

impl Validate for PromotionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let code = self.code.trim();
        let validator = Validator::new()
            .required("code", code)
            .min_len("code", code, 3)
            .max_len("code", code, 20)
            .check(
                "code",
                code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "Code may only contain uppercase letters and digits",
            )
            .required("title", &self.title)
            .min_len("title", &self.title, 3)
            .max_len("description", self.description.as_deref().unwrap_or_default(), 500);

        let validator = match self.discount_type {
            DiscountType::Percentage => validator.check(
                "discount_value",
                self.discount_value > Decimal::ZERO && self.discount_value <= Decimal::ONE_HUNDRED,
                "Percentage discount must be greater than 0 and at most 100",
            ),
            DiscountType::Fixed => validator.positive("discount_value", self.discount_value),
        };

        validator
            .check(
                "min_order_amount",
                self.min_order_amount.is_none_or(|p| !p.is_negative()),
                "Minimum order amount cannot be negative",
            )
            .check(
                "usage_limit",
                self.usage_limit != Some(0),
                "Usage limit must be at least 1",
            )
            .check(
                "ends_at",
                self.ends_at > self.starts_at,
                "End date must be after the start date",
            )
            .finish()
    }
}

impl Resource for Promotion {
    type Id = PromotionId;
    type Input = PromotionInput;

    const NAME: &'static str = "promotion";
    const ID_PREFIX: &'static str = "promo";
    const LIST_PATH: &'static str = "/promotions/";
    const CREATE_PATH: &'static str = "/promotions/";
    const ITEM_PREFIX: &'static str = "/promotions";

    fn id(&self) -> &PromotionId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.title.as_str()]
    }

    fn from_input(id: PromotionId, input: PromotionInput, now: DateTime<Utc>) -> Self {
        let mut promotion = Self {
            id,
            code: String::new(),
            title: String::new(),
            description: None,
            discount_type: input.discount_type,
            discount_value: input.discount_value,
            min_order_amount: None,
            usage_limit: None,
            used_count: 0,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        promotion.apply_input(input, now);
        promotion
    }

    fn apply_input(&mut self, input: PromotionInput, now: DateTime<Utc>) {
        self.code = input.code.trim().to_string();
        self.title = input.title.trim().to_string();
        self.description = non_blank(input.description);
        self.discount_type = input.discount_type;
        self.discount_value = input.discount_value;
        self.min_order_amount = input.min_order_amount;
        self.usage_limit = input.usage_limit;
        self.starts_at = input.starts_at;
        self.ends_at = input.ends_at;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.promotions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn input() -> PromotionInput {
        let starts_at = Utc::now();
        PromotionInput {
            code: "WELCOME10".into(),
            title: "Welcome offer".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            min_order_amount: Some(Price::from_cents(2000)),
            usage_limit: Some(500),
            starts_at,
            ends_at: starts_at + Duration::days(30),
            status: PromotionStatus::Active,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_end_must_follow_start() {
        let base = input();
        let errors = PromotionInput {
            ends_at: base.starts_at,
            ..base
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.first("ends_at"),
            Some("End date must be after the start date")
        );
    }

    #[test]
    fn test_code_format() {
        let errors = PromotionInput {
            code: "welcome-10".into(),
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.first("code"),
            Some("Code may only contain uppercase letters and digits")
        );

        let errors = PromotionInput {
            code: "AB".into(),
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("code"), Some("Code must be at least 3 characters"));
    }

    #[test]
    fn test_discount_bounds() {
        let over = PromotionInput {
            discount_value: Decimal::from(150),
            ..input()
        };
        assert!(over.validate().unwrap_err().has("discount_value"));

        let fixed = PromotionInput {
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(150),
            ..input()
        };
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn test_discount_display_and_liveness() {
        let now = Utc::now();
        let mut promotion = Promotion::from_input(PromotionId::new("promo_1"), input(), now);
        assert_eq!(promotion.discount_display(), "10%");
        assert!(promotion.is_live(now + Duration::minutes(1)));

        promotion.used_count = 500;
        assert!(!promotion.is_live(now + Duration::minutes(1)));

        promotion.discount_type = DiscountType::Fixed;
        promotion.discount_value = Decimal::new(550, 2);
        assert_eq!(promotion.discount_display(), "$5.50");
    }
}
