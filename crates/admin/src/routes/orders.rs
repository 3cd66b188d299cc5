//! Order management pages.
//!
//! Line items are edited as plain text, one item per line:
//!
//! ```text
//! 2 x Jollof rice @ 8.50
//! Chapman @ 4.50
//! ```
//!
//! A missing quantity means one.

use rust_decimal::Decimal;

use dashdesk_core::{
    CustomerId, MerchantId, OrderStatus, PaymentMethod, Price, RiderId, ValidationErrors,
};

use crate::components::{Cell, DataTableConfig, FormField, FormParser, FormValues, TableColumn};
use crate::models::{Order, OrderInput, OrderItem};

use super::resources::{AdminPage, Detail};

/// Parse the items textarea. Errors are per line, 1-based.
pub fn parse_items(text: &str) -> Result<Vec<OrderItem>, Vec<String>> {
    let mut items = Vec::new();
    let mut errors = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_item(line) {
            Ok(item) => items.push(item),
            Err(message) => errors.push(format!("Line {}: {message}", n + 1)),
        }
    }

    if errors.is_empty() { Ok(items) } else { Err(errors) }
}

fn parse_item(line: &str) -> Result<OrderItem, &'static str> {
    let (left, price) = line
        .rsplit_once('@')
        .ok_or("expected \"quantity x name @ price\"")?;
    let unit_price: Decimal = price
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| "price must be a number")?;

    let left = left.trim();
    let (quantity, name) = left
        .split_once(['x', 'X', '×'])
        .and_then(|(qty, name)| Some((qty.trim().parse::<u32>().ok()?, name.trim())))
        .unwrap_or((1, left));

    Ok(OrderItem {
        name: name.to_string(),
        quantity,
        unit_price: Price::new(unit_price),
    })
}

/// Items as textarea lines.
#[must_use]
pub fn format_items(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} x {} @ {:.2}",
                item.quantity,
                item.name,
                item.unit_price.amount()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl AdminPage for Order {
    const SLUG: &'static str = "orders";
    const TITLE: &'static str = "Orders";
    const LABEL: &'static str = "Order";

    fn table() -> DataTableConfig {
        DataTableConfig::new("orders")
            .column(TableColumn::new("order_number", "Order"))
            .column(TableColumn::new("customer_id", "Customer"))
            .column(TableColumn::new("merchant_id", "Merchant"))
            .column(TableColumn::numeric("items", "Items"))
            .column(TableColumn::numeric("total", "Total"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("created_at", "Placed"))
            .status_filter::<OrderStatus>("Status")
            .search_placeholder("Search order number, customer, merchant or address...")
            .empty_state("No orders found", Some("Try a different search or filter."))
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.order_number),
            Cell::text(self.customer_id.as_str()),
            Cell::text(self.merchant_id.as_str()),
            Cell::text(self.item_count().to_string()),
            Cell::text(self.total.display()),
            Cell::status(self.status),
            Cell::date(&self.created_at),
        ]
    }

    fn heading(&self) -> String {
        format!("Order {}", self.order_number)
    }

    fn details(&self) -> Vec<Detail> {
        let items = self
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} x {} ({})",
                    item.quantity,
                    item.name,
                    item.line_total().map_or_else(|| "—".to_string(), |p| p.display())
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            Detail::text("ID", self.id.as_str()),
            Detail::new("Status", Cell::status(self.status)),
            Detail::text("Customer", self.customer_id.as_str()),
            Detail::text("Merchant", self.merchant_id.as_str()),
            Detail::new("Rider", Cell::optional(self.rider_id.as_ref().map(RiderId::as_str))),
            Detail::text("Items", items),
            Detail::text("Subtotal", self.subtotal.display()),
            Detail::text("Delivery fee", self.delivery_fee.display()),
            Detail::text("Total", self.total.display()),
            Detail::text("Payment", self.payment_method.label()),
            Detail::text("Delivery address", &self.delivery_address),
            Detail::new("Placed", Cell::date(&self.created_at)),
            Detail::new("Last updated", Cell::date(&self.updated_at)),
        ]
    }

    fn default_values() -> FormValues {
        FormValues::new()
            .with("delivery_fee", "0.00")
            .with("payment_method", PaymentMethod::Card.as_str())
            .with("status", OrderStatus::Pending.as_str())
    }

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("customer_id", self.customer_id.as_str())
            .with("merchant_id", self.merchant_id.as_str())
            .with(
                "rider_id",
                self.rider_id.as_ref().map(RiderId::as_str).unwrap_or_default(),
            )
            .with("items", format_items(&self.items))
            .with("delivery_fee", format!("{:.2}", self.delivery_fee.amount()))
            .with("payment_method", self.payment_method.as_str())
            .with("delivery_address", &self.delivery_address)
            .with("status", self.status.as_str())
    }

    fn form_fields(values: &FormValues, editing: bool) -> Vec<FormField> {
        let status_help = if editing {
            "Orders move one step at a time and can be cancelled until delivered."
        } else {
            "New orders usually start as pending."
        };
        vec![
            FormField::text("customer_id", "Customer ID", values).required(),
            FormField::text("merchant_id", "Merchant ID", values).required(),
            FormField::text("rider_id", "Rider ID", values).help("Leave blank until assigned."),
            FormField::textarea("items", "Items", values)
                .required()
                .help("One per line, e.g. \"2 x Jollof rice @ 8.50\"."),
            FormField::decimal("delivery_fee", "Delivery fee", values).required(),
            FormField::choice::<PaymentMethod>("payment_method", "Payment method", values),
            FormField::textarea("delivery_address", "Delivery address", values).required(),
            FormField::choice::<OrderStatus>("status", "Status", values).help(status_help),
        ]
    }

    fn parse_form(values: &FormValues) -> Result<OrderInput, ValidationErrors> {
        let mut form = FormParser::new(values);
        let items = parse_items(&form.text("items")).unwrap_or_else(|errors| {
            for error in errors {
                form.error("items", error);
            }
            Vec::new()
        });
        let input = OrderInput {
            customer_id: CustomerId::new(form.text("customer_id")),
            merchant_id: MerchantId::new(form.text("merchant_id")),
            rider_id: form.optional("rider_id").map(RiderId::new),
            items,
            delivery_fee: form.price("delivery_fee"),
            payment_method: form.choice("payment_method", PaymentMethod::Card),
            delivery_address: form.text("delivery_address"),
            status: form.choice("status", OrderStatus::Pending),
        };
        form.finish(input)
    }
}
