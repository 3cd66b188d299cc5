//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{
    CustomerId, MerchantId, OrderId, OrderStatus, PaymentMethod, Price, RiderId, Validate,
    ValidationErrors, Validator,
};

use crate::marketplace::{EntityStore, MockData, Resource};

/// Most units of one item a single order line may carry.
pub const MAX_ITEM_QUANTITY: u32 = 10_000;

/// Upper bound for a unit price or delivery fee entered in the admin.
pub const MAX_UNIT_PRICE: Price = Price::from_cents(100_000_000);

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    /// `unit_price * quantity`, or `None` if it does not fit.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.unit_price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub merchant_id: MerchantId,
    #[serde(default)]
    pub rider_id: Option<RiderId>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub delivery_fee: Price,
    pub subtotal: Price,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|i| i.quantity)
            .fold(0, u32::saturating_add)
    }

    // Validated inputs stay far below the decimal range; anything else
    // saturates rather than failing the request.
    fn recompute_totals(&mut self) {
        self.subtotal = self
            .items
            .iter()
            .map(|i| i.line_total().unwrap_or(Price::MAX))
            .sum();
        self.total = self
            .subtotal
            .checked_add(self.delivery_fee)
            .unwrap_or(Price::MAX);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_id: CustomerId,
    pub merchant_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<RiderId>,
    pub items: Vec<OrderItem>,
    pub delivery_fee: Price,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub status: OrderStatus,
}

impl Validate for OrderInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut item_errors = ValidationErrors::new();
        for (n, item) in self.items.iter().enumerate() {
            let line = n + 1;
            if item.name.trim().is_empty() {
                item_errors.add("items", format!("Item {line} needs a name"));
            }
            if item.quantity == 0 {
                item_errors.add("items", format!("Item {line} quantity must be at least 1"));
            } else if item.quantity > MAX_ITEM_QUANTITY {
                item_errors.add(
                    "items",
                    format!("Item {line} quantity must be at most {MAX_ITEM_QUANTITY}"),
                );
            }
            if item.unit_price.is_negative() {
                item_errors.add("items", format!("Item {line} price cannot be negative"));
            } else if item.unit_price > MAX_UNIT_PRICE {
                item_errors.add(
                    "items",
                    format!("Item {line} price must be at most {MAX_UNIT_PRICE}"),
                );
            }
        }

        Validator::new()
            .required("customer_id", self.customer_id.as_str())
            .required("merchant_id", self.merchant_id.as_str())
            .check("items", !self.items.is_empty(), "Add at least one item")
            .extend(item_errors)
            .range("delivery_fee", self.delivery_fee, Price::ZERO, MAX_UNIT_PRICE)
            .required("delivery_address", &self.delivery_address)
            .min_len("delivery_address", &self.delivery_address, 5)
            .finish()
    }
}

impl Resource for Order {
    type Id = OrderId;
    type Input = OrderInput;

    const NAME: &'static str = "order";
    const ID_PREFIX: &'static str = "ord";
    const LIST_PATH: &'static str = "/order/list";
    const CREATE_PATH: &'static str = "/order";
    const ITEM_PREFIX: &'static str = "/order";

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.order_number.as_str(),
            self.customer_id.as_str(),
            self.merchant_id.as_str(),
            self.delivery_address.as_str(),
        ]
    }

    fn from_input(id: OrderId, input: OrderInput, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            id,
            order_number: format!("ORD-{}", now.format("%y%m%d-%H%M%S")),
            customer_id: input.customer_id.clone(),
            merchant_id: input.merchant_id.clone(),
            rider_id: None,
            items: Vec::new(),
            delivery_fee: Price::ZERO,
            subtotal: Price::ZERO,
            total: Price::ZERO,
            payment_method: input.payment_method,
            delivery_address: String::new(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        order.apply_input(input, now);
        order
    }

    fn apply_input(&mut self, input: OrderInput, now: DateTime<Utc>) {
        self.customer_id = input.customer_id;
        self.merchant_id = input.merchant_id;
        self.rider_id = input.rider_id;
        self.items = input.items;
        self.delivery_fee = input.delivery_fee;
        self.payment_method = input.payment_method;
        self.delivery_address = input.delivery_address.trim().to_string();
        self.status = input.status;
        self.updated_at = now;
        self.recompute_totals();
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.orders
    }

    fn check_update(&self, input: &OrderInput) -> Result<(), ValidationErrors> {
        if self.status.can_transition_to(input.status) {
            Ok(())
        } else {
            Err(ValidationErrors::single(
                "status",
                format!(
                    "An order cannot move from {} to {}",
                    self.status.label(),
                    input.status.label()
                ),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: u32, cents: i64) -> OrderItem {
        OrderItem {
            name: name.into(),
            quantity,
            unit_price: Price::from_cents(cents),
        }
    }

    fn input(status: OrderStatus) -> OrderInput {
        OrderInput {
            customer_id: CustomerId::new("cus_1"),
            merchant_id: MerchantId::new("mer_1"),
            rider_id: None,
            items: vec![item("Jollof rice", 2, 1250), item("Chapman", 1, 450)],
            delivery_fee: Price::from_cents(300),
            payment_method: PaymentMethod::Card,
            delivery_address: "4 Marina Road, Lagos".into(),
            status,
        }
    }

    #[test]
    fn test_totals_are_computed() {
        let order = Order::from_input(OrderId::new("ord_1"), input(OrderStatus::Pending), Utc::now());
        assert_eq!(order.subtotal, Price::from_cents(2950));
        assert_eq!(order.total, Price::from_cents(3250));
        assert_eq!(order.item_count(), 3);
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[test]
    fn test_requires_items() {
        let errors = OrderInput {
            items: vec![],
            ..input(OrderStatus::Pending)
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("items"), Some("Add at least one item"));
    }

    #[test]
    fn test_item_rules() {
        let errors = OrderInput {
            items: vec![item("", 0, -5)],
            ..input(OrderStatus::Pending)
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first("items"), Some("Item 1 needs a name"));
    }

    #[test]
    fn test_huge_lines_are_rejected() {
        let items = crate::routes::orders::parse_items(
            "4294967295 x Rice @ 79228162514264337593543950335",
        )
        .unwrap();
        let input = OrderInput {
            items,
            ..input(OrderStatus::Pending)
        };

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.first("items"),
            Some("Item 1 quantity must be at most 10000")
        );

        // Applied without validation the totals saturate instead of panicking.
        let order = Order::from_input(OrderId::new("ord_big"), input, Utc::now());
        assert_eq!(order.subtotal, Price::MAX);
        assert_eq!(order.total, Price::MAX);
    }

    #[test]
    fn test_limits_are_inclusive() {
        let input = OrderInput {
            items: vec![OrderItem {
                name: "Catering tray".into(),
                quantity: MAX_ITEM_QUANTITY,
                unit_price: MAX_UNIT_PRICE,
            }],
            delivery_fee: MAX_UNIT_PRICE,
            ..input(OrderStatus::Pending)
        };
        assert!(input.validate().is_ok());

        let order = Order::from_input(OrderId::new("ord_tray"), input, Utc::now());
        assert_eq!(order.subtotal, Price::from_cents(1_000_000_000_000));
    }

    #[test]
    fn test_delivery_fee_bounds() {
        let errors = OrderInput {
            delivery_fee: Price::from_cents(-1),
            ..input(OrderStatus::Pending)
        }
        .validate()
        .unwrap_err();
        assert!(errors.has("delivery_fee"));
    }

    #[test]
    fn test_status_changes_follow_lifecycle() {
        let order = Order::from_input(OrderId::new("ord_1"), input(OrderStatus::Pending), Utc::now());

        assert!(order.check_update(&input(OrderStatus::Confirmed)).is_ok());
        assert!(order.check_update(&input(OrderStatus::Cancelled)).is_ok());

        let errors = order.check_update(&input(OrderStatus::Delivered)).unwrap_err();
        assert_eq!(
            errors.first("status"),
            Some("An order cannot move from Pending to Delivered")
        );
    }
}
