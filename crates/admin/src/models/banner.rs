//! Home screen banners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashdesk_core::{ActiveStatus, BannerId, Validate, ValidationErrors, Validator};

use super::non_blank;
use crate::marketplace::{EntityStore, MockData, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    /// Slot on the home screen, lowest first.
    #[serde(default)]
    pub position: u32,
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub position: u32,
    pub status: ActiveStatus,
}

impl Validate for BannerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("title", &self.title)
            .min_len("title", &self.title, 3)
            .max_len("title", &self.title, 80)
            .required("image_url", &self.image_url)
            .url("image_url", &self.image_url)
            .url("link_url", self.link_url.as_deref().unwrap_or_default())
            .finish()
    }
}

impl Resource for Banner {
    type Id = BannerId;
    type Input = BannerInput;

    const NAME: &'static str = "banner";
    const ID_PREFIX: &'static str = "ban";
    const LIST_PATH: &'static str = "/banners/";
    const CREATE_PATH: &'static str = "/banners/";
    const ITEM_PREFIX: &'static str = "/banners";

    fn id(&self) -> &BannerId {
        &self.id
    }

    fn status_key(&self) -> &'static str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn from_input(id: BannerId, input: BannerInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title.trim().to_string(),
            image_url: input.image_url.trim().to_string(),
            link_url: non_blank(input.link_url),
            position: input.position,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: BannerInput, now: DateTime<Utc>) {
        self.title = input.title.trim().to_string();
        self.image_url = input.image_url.trim().to_string();
        self.link_url = non_blank(input.link_url);
        self.position = input.position;
        self.status = input.status;
        self.updated_at = now;
    }

    fn store(data: &MockData) -> &EntityStore<Self> {
        &data.banners
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_must_be_http() {
        let errors = BannerInput {
            title: "Weekend feast".into(),
            image_url: "banners/feast.png".into(),
            link_url: Some("javascript:alert(1)".into()),
            position: 1,
            status: ActiveStatus::Active,
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            errors.first("image_url"),
            Some("Image url must be a valid http(s) URL")
        );
        assert!(errors.has("link_url"));
    }

    #[test]
    fn test_link_is_optional() {
        let input = BannerInput {
            title: "Weekend feast".into(),
            image_url: "https://cdn.dashdesk.dev/banners/feast.png".into(),
            link_url: None,
            position: 2,
            status: ActiveStatus::Inactive,
        };
        assert!(input.validate().is_ok());
    }
}
