//! Per-entity wiring: endpoints, mock storage and local mutations.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use dashdesk_core::{Validate, ValidationErrors};

use url::Url;

use super::{ApiError, EntityStore, MockData};

/// An entity the admin panel can list, show, create, update and delete.
///
/// Implementors describe where the entity lives on the API and how a form
/// input becomes a record when the mock backend applies it locally.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Typed identifier.
    type Id: Clone
        + PartialEq
        + Display
        + AsRef<str>
        + From<String>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Create/update payload.
    type Input: Clone + Serialize + Validate + Send + Sync;

    /// Singular name used in messages ("customer").
    const NAME: &'static str;
    /// Prefix for locally generated ids ("cus").
    const ID_PREFIX: &'static str;
    /// List endpoint.
    const LIST_PATH: &'static str;
    /// Create endpoint.
    const CREATE_PATH: &'static str;
    /// Item endpoints are `{ITEM_PREFIX}/{id}`.
    const ITEM_PREFIX: &'static str;

    fn id(&self) -> &Self::Id;

    /// Wire value of the record's status, matched by the status filter.
    fn status_key(&self) -> &'static str;

    /// Fields searched by the free-text filter.
    fn search_fields(&self) -> Vec<&str>;

    /// Build a record from a validated input (mock create).
    fn from_input(id: Self::Id, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Merge a validated input into this record (mock update).
    fn apply_input(&mut self, input: Self::Input, now: DateTime<Utc>);

    /// The mock store holding this entity.
    fn store(data: &MockData) -> &EntityStore<Self>;

    /// Rules that only apply when creating.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    fn validate_new(input: &Self::Input) -> Result<(), ValidationErrors> {
        input.validate()
    }

    /// Rules that depend on the record being updated.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    fn check_update(&self, _input: &Self::Input) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Case-insensitive match of `needle` against [`Resource::search_fields`].
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Fresh id for a locally created record.
    #[must_use]
    fn generate_id() -> Self::Id {
        Self::Id::from(format!(
            "{}_{}",
            Self::ID_PREFIX,
            uuid::Uuid::new_v4().simple()
        ))
    }

    /// Endpoint for one record, with the id encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for ids that cannot name a record (empty, `.` or
    /// `..`), so a request never leaves the entity's path.
    fn item_path(id: &Self::Id) -> Result<String, ApiError> {
        let segment = path_segment(id.as_ref())
            .ok_or_else(|| ApiError::NotFound(format!("{} {id}", Self::NAME)))?;
        Ok(format!("{}/{segment}", Self::ITEM_PREFIX.trim_end_matches('/')))
    }
}

/// Percent-encode `raw` as one URL path segment.
///
/// `None` for empty and dot segments, which URL resolution would collapse.
#[must_use]
pub fn path_segment(raw: &str) -> Option<String> {
    if matches!(raw, "" | "." | "..") {
        return None;
    }
    let mut url = Url::parse("http://segment.invalid/").ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(raw);
    url.path().strip_prefix('/').map(str::to_string)
}
