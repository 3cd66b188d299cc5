//! Menu categories and their subcategories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{ActiveStatus, CategoryId, SubcategoryId, Validate, ValidationErrors, Validator};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: u32,
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub sort_order: u32,
    pub status: ActiveStatus,
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("name", &self.name)
            .min_len("name", &self.name, 2)
            .max_len("name", &self.name, 60)
            .max_len("description", self.description.as_deref().unwrap_or_default(), 300)
            .url("image_url", self.image_url.as_deref().unwrap_or_default())
            .finish()
    }
}

impl Resource for Category {
    type Id = CategoryId;
    type Input = CategoryInput;

    const NAME: &'static str = "category";
    const ID_PREFIX: &'static str = "cat";
    const LIST_PATH: &'static str = "/category/";
    const CREATE_PATH: &'static str = "/category/";
    const ITEM_PREFIX: &'static str = "/category";

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn from_input(id: CategoryId, input: CategoryInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            image_url: non_blank(input.image_url),
            sort_order: input.sort_order,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: CategoryInput, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.description = non_blank(input.description);
        self.image_url = non_blank(input.image_url);
        self.sort_order = input.sort_order;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.categories
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryInput {
    pub category_id: CategoryId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ActiveStatus,
}

impl Validate for SubcategoryInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("category_id", self.category_id.as_str())
            .required("name", &self.name)
            .min_len("name", &self.name, 2)
            .max_len("name", &self.name, 60)
            .max_len("description", self.description.as_deref().unwrap_or_default(), 300)
            .finish()
    }
}

impl Resource for Subcategory {
    type Id = SubcategoryId;
    type Input = SubcategoryInput;

    const NAME: &'static str = "subcategory";
    const ID_PREFIX: &'static str = "sub";
    const LIST_PATH: &'static str = "/subcategory/";
    const CREATE_PATH: &'static str = "/subcategory/";
    const ITEM_PREFIX: &'static str = "/subcategory";

    fn id(&self) -> &SubcategoryId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category_id.as_str()]
    }

    fn from_input(id: SubcategoryId, input: SubcategoryInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: SubcategoryInput, now: DateTime<Utc>) {
        self.category_id = input.category_id;
        self.name = input.name.trim().to_string();
        self.description = non_blank(input.description);
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.subcategories
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_rules() {
        let errors = CategoryInput {
            name: " ".into(),
            description: None,
            image_url: Some("not a url".into()),
            sort_order: 0,
            status: ActiveStatus::Active,
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("name"), Some("Name is required"));
        assert!(errors.has("image_url"));
    }

    #[test]
    fn test_subcategory_needs_parent() {
        let errors = SubcategoryInput {
            category_id: CategoryId::new(""),
            name: "Pepper soups".into(),
            description: None,
            status: ActiveStatus::Active,
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("category_id"), Some("Category id is required"));
    }
}
