//! Marketplace data access.
//!
//! The admin panel never owns data. Every entity lives behind the marketplace
//! REST API, or, for demos and tests, in an in-memory mock dataset. Both sit
//! behind [`Backend`], so route handlers are written once per entity.
//!
//! # Wire format
//!
//! - Base URL and `X-API-Key` are fixed per deployment
//! - `Authorization: Bearer <token>` carries the admin's session token
//! - Responses are wrapped as `{ "status": ..., "data": ..., "message": ... }`
//! - Lists are either a bare array or a paginated object

pub mod auth;
pub mod backend;
pub mod client;
pub mod mock;
pub mod resource;
pub mod store;

pub use auth::LoginSession;
pub use backend::{Backend, MockBackend};
pub use client::ApiClient;
pub use mock::{MockCredential, MockData, MockDataError, MockFixture};
pub use resource::Resource;
pub use store::{EntityStore, StoreError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dashdesk_core::ValidationErrors;

/// Errors that can occur when talking to the marketplace.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the API key or the session token.
    #[error("Unauthorized: session expired or invalid credentials")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// API returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered 2xx but the envelope reports a failure.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload failed validation before it was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    /// Whether the caller should be sent back to the login page.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message suitable for an error toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the marketplace API".to_string(),
            Self::Unauthorized => "Your session has expired, please sign in again".to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::RateLimited(secs) => format!("Too many requests, try again in {secs}s"),
            Self::Api { message, .. } | Self::Rejected(message) => message.clone(),
            Self::Parse(_) => "Unexpected response from the marketplace API".to_string(),
            Self::Validation(errors) => errors.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id}")),
        }
    }
}

/// `status` field of the response envelope.
///
/// Deployments disagree on its shape, so booleans, strings and numeric codes
/// are all accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiStatus {
    Flag(bool),
    Code(i64),
    Text(String),
}

impl ApiStatus {
    /// Whether the envelope reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Flag(ok) => *ok,
            Self::Code(code) => (200..300).contains(code),
            Self::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "success" | "ok" | "true"
            ),
        }
    }
}

impl Default for ApiStatus {
    fn default() -> Self {
        Self::Flag(true)
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: ApiStatus,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap `data`, turning a failing status into [`ApiError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the status is not a success, or `Parse` when a
    /// successful envelope carries no data.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.status.is_success() {
            return Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "The request was rejected".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Parse("response envelope has no data".to_string()))
    }
}

/// List payload: a bare array or one of the paginated shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paged(PagedList<T>),
    Plain(Vec<T>),
}

/// Paginated list as returned by list endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    #[serde(alias = "data", alias = "results")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "perPage", alias = "pageSize")]
    pub limit: Option<u32>,
}

impl<T> ListPayload<T> {
    /// Normalize into a [`Page`], filling gaps from the query that produced it.
    ///
    /// A bare array is the whole result set, so it becomes a single page.
    #[must_use]
    pub fn into_page(self, query: &ListQuery) -> Page<T> {
        match self {
            Self::Plain(items) => {
                let total = items.len() as u64;
                let per_page = u32::try_from(items.len()).unwrap_or(u32::MAX);
                Page {
                    items,
                    total,
                    page: 1,
                    per_page: per_page.max(query.per_page).max(1),
                }
            }
            Self::Paged(list) => Page {
                total: list.total.unwrap_or(list.items.len() as u64),
                page: list.page.unwrap_or(query.page).max(1),
                per_page: list.limit.unwrap_or(query.per_page).max(1),
                items: list.items,
            },
        }
    }
}

/// Table query: 1-based page, page size, free-text search, status filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    /// First page with `per_page` rows and no filters.
    #[must_use]
    pub const fn first(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            search: None,
            status: None,
        }
    }

    /// Restrict to one status value.
    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    /// Restrict to rows matching `search`.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    /// Query-string pairs sent to list endpoints.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.per_page.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Number of pages, at least one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        u32::try_from(self.total.div_ceil(per_page).max(1)).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}
