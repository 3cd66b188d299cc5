//! Static mock dataset.
//!
//! A YAML fixture with sample records for every entity plus the credentials
//! accepted by the mock login. The bundled fixture is compiled into the
//! binary; another one can be loaded from disk.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use dashdesk_core::{AdminUserId, Email};

use super::{EntityStore, Resource};
use crate::models::{
    AdminUser, Banner, Category, Customer, Merchant, Order, Promotion, Recipe, Rider,
    Subcategory, SupportTicket,
};

/// Fixture shipped with the admin binary.
pub const BUNDLED_FIXTURE: &str = include_str!("../../fixtures/mock_data.yaml");

/// Errors loading a fixture.
#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Login accepted by the mock backend.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockCredential {
    pub email: String,
    pub password: String,
    pub user_id: AdminUserId,
}

impl std::fmt::Debug for MockCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCredential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Parsed fixture file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockFixture {
    pub customers: Vec<Customer>,
    pub merchants: Vec<Merchant>,
    pub riders: Vec<Rider>,
    pub orders: Vec<Order>,
    pub promotions: Vec<Promotion>,
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub recipes: Vec<Recipe>,
    pub users: Vec<AdminUser>,
    #[serde(alias = "supportTickets")]
    pub tickets: Vec<SupportTicket>,
    pub credentials: Vec<MockCredential>,
}

impl MockFixture {
    /// Parse the fixture compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the bundled YAML is malformed.
    pub fn bundled() -> Result<Self, MockDataError> {
        Self::from_yaml(BUNDLED_FIXTURE)
    }

    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the YAML does not match the fixture shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, MockDataError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read, or `Parse`.
    pub fn from_path(path: &Path) -> Result<Self, MockDataError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| MockDataError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Record counts per entity, in navigation order.
    #[must_use]
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("customers", self.customers.len()),
            ("merchants", self.merchants.len()),
            ("riders", self.riders.len()),
            ("orders", self.orders.len()),
            ("promotions", self.promotions.len()),
            ("banners", self.banners.len()),
            ("categories", self.categories.len()),
            ("subcategories", self.subcategories.len()),
            ("recipes", self.recipes.len()),
            ("users", self.users.len()),
            ("tickets", self.tickets.len()),
        ]
    }

    /// Consistency problems: duplicate ids, malformed emails, dangling
    /// references and unusable credentials.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let customers = unique_ids(&self.customers, &mut problems);
        let merchants = unique_ids(&self.merchants, &mut problems);
        let riders = unique_ids(&self.riders, &mut problems);
        unique_ids(&self.orders, &mut problems);
        unique_ids(&self.promotions, &mut problems);
        unique_ids(&self.banners, &mut problems);
        let categories = unique_ids(&self.categories, &mut problems);
        unique_ids(&self.subcategories, &mut problems);
        unique_ids(&self.recipes, &mut problems);
        let users = unique_ids(&self.users, &mut problems);
        unique_ids(&self.tickets, &mut problems);

        let emails = self
            .customers
            .iter()
            .map(|c| (Customer::NAME, c.id.as_str(), c.email.as_str()))
            .chain(self.merchants.iter().map(|m| (Merchant::NAME, m.id.as_str(), m.email.as_str())))
            .chain(self.riders.iter().map(|r| (Rider::NAME, r.id.as_str(), r.email.as_str())))
            .chain(self.users.iter().map(|u| (AdminUser::NAME, u.id.as_str(), u.email.as_str())));
        for (entity, id, email) in emails {
            if let Err(e) = Email::parse(email) {
                problems.push(format!("{entity} {id}: {e}"));
            }
        }

        for order in &self.orders {
            if !customers.contains(order.customer_id.as_str()) {
                problems.push(format!("order {}: unknown customer {}", order.id, order.customer_id));
            }
            if !merchants.contains(order.merchant_id.as_str()) {
                problems.push(format!("order {}: unknown merchant {}", order.id, order.merchant_id));
            }
            if let Some(rider) = &order.rider_id
                && !riders.contains(rider.as_str())
            {
                problems.push(format!("order {}: unknown rider {rider}", order.id));
            }
            if order.items.is_empty() {
                problems.push(format!("order {}: has no items", order.id));
            }
        }

        for sub in &self.subcategories {
            if !categories.contains(sub.category_id.as_str()) {
                problems.push(format!("subcategory {}: unknown category {}", sub.id, sub.category_id));
            }
        }

        for recipe in &self.recipes {
            if let Some(category) = &recipe.category_id
                && !categories.contains(category.as_str())
            {
                problems.push(format!("recipe {}: unknown category {category}", recipe.id));
            }
        }

        for ticket in &self.tickets {
            if let Some(assignee) = &ticket.assigned_to
                && !users.contains(assignee.as_str())
            {
                problems.push(format!("support ticket {}: unknown assignee {assignee}", ticket.id));
            }
        }

        let mut codes = HashSet::new();
        for promotion in &self.promotions {
            if !codes.insert(promotion.code.as_str()) {
                problems.push(format!("promotion {}: duplicate code {}", promotion.id, promotion.code));
            }
            if promotion.ends_at <= promotion.starts_at {
                problems.push(format!("promotion {}: ends before it starts", promotion.id));
            }
        }

        for credential in &self.credentials {
            match self.users.iter().find(|u| u.id == credential.user_id) {
                None => problems.push(format!(
                    "credential {}: unknown user {}",
                    credential.email, credential.user_id
                )),
                Some(user) if !user.email.eq_ignore_ascii_case(&credential.email) => {
                    problems.push(format!(
                        "credential {}: email does not match user {}",
                        credential.email, user.id
                    ));
                }
                Some(_) => {}
            }
        }

        problems
    }

    /// Move the records into per-entity stores.
    #[must_use]
    pub fn into_data(self) -> MockData {
        MockData {
            customers: EntityStore::new(self.customers),
            merchants: EntityStore::new(self.merchants),
            riders: EntityStore::new(self.riders),
            orders: EntityStore::new(self.orders),
            promotions: EntityStore::new(self.promotions),
            banners: EntityStore::new(self.banners),
            categories: EntityStore::new(self.categories),
            subcategories: EntityStore::new(self.subcategories),
            recipes: EntityStore::new(self.recipes),
            users: EntityStore::new(self.users),
            tickets: EntityStore::new(self.tickets),
            credentials: self.credentials,
        }
    }
}

fn unique_ids<'a, T: Resource>(items: &'a [T], problems: &mut Vec<String>) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id().as_ref()) {
            problems.push(format!("{} {}: duplicate id", T::NAME, item.id()));
        }
    }
    seen
}

/// Live mock dataset: one store per entity.
#[derive(Debug)]
pub struct MockData {
    pub customers: EntityStore<Customer>,
    pub merchants: EntityStore<Merchant>,
    pub riders: EntityStore<Rider>,
    pub orders: EntityStore<Order>,
    pub promotions: EntityStore<Promotion>,
    pub banners: EntityStore<Banner>,
    pub categories: EntityStore<Category>,
    pub subcategories: EntityStore<Subcategory>,
    pub recipes: EntityStore<Recipe>,
    pub users: EntityStore<AdminUser>,
    pub tickets: EntityStore<SupportTicket>,
    credentials: Vec<MockCredential>,
}

impl MockData {
    /// Stores seeded from the bundled fixture.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the bundled YAML is malformed.
    pub fn bundled() -> Result<Self, MockDataError> {
        Ok(MockFixture::bundled()?.into_data())
    }

    /// Credential registered for `email`, compared case-insensitively.
    #[must_use]
    pub fn credential(&self, email: &str) -> Option<&MockCredential> {
        let email = email.trim();
        self.credentials
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_fixture_is_consistent() {
        let fixture = MockFixture::bundled().unwrap();
        assert_eq!(fixture.problems(), Vec::<String>::new());
        assert!(fixture.counts().iter().all(|(_, n)| *n > 0));
        assert!(!fixture.credentials.is_empty());
    }

    #[test]
    fn test_problems_report_dangling_references() {
        let yaml = r#"
categories: []
subcategories:
  - id: sub_1
    categoryId: cat_missing
    name: Soups
    status: active
    createdAt: 2026-01-01T00:00:00Z
    updatedAt: 2026-01-01T00:00:00Z
  - id: sub_1
    categoryId: cat_missing
    name: Stews
    status: active
    createdAt: 2026-01-01T00:00:00Z
    updatedAt: 2026-01-01T00:00:00Z
credentials:
  - email: ghost@dashdesk.dev
    password: whatever1
    userId: adm_ghost
"#;
        let problems = MockFixture::from_yaml(yaml).unwrap().problems();
        assert_eq!(
            problems,
            vec![
                "subcategory sub_1: duplicate id".to_string(),
                "subcategory sub_1: unknown category cat_missing".to_string(),
                "subcategory sub_1: unknown category cat_missing".to_string(),
                "credential ghost@dashdesk.dev: unknown user adm_ghost".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_yaml() {
        let err = MockFixture::from_yaml("customers: 12").unwrap_err();
        assert!(matches!(err, MockDataError::Parse(_)));
    }

    #[test]
    fn test_credential_lookup_ignores_case() {
        let data = MockData::bundled().unwrap();
        let first = MockFixture::bundled().unwrap().credentials.remove(0);
        assert!(data.credential(&first.email.to_uppercase()).is_some());
        assert!(data.credential("nobody@dashdesk.dev").is_none());
    }
}
