//! Local entity state for the mock backend.
//!
//! An [`EntityStore`] is the in-memory list behind one entity type, with the
//! loading flag and last error a page shows while an operation is pending.
//! Creates append, updates merge by id, deletes filter by id.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use super::{ListQuery, Page, Resource};

/// Errors from local store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

/// In-memory list of records with a loading flag.
#[derive(Debug)]
pub struct EntityStore<T> {
    state: RwLock<StoreState<T>>,
}

#[derive(Debug)]
struct StoreState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T: Resource> EntityStore<T> {
    /// Create a store seeded with `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                items,
                loading: false,
                error: None,
            }),
        }
    }

    /// Whether an operation is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Message of the last failed operation, cleared by the next success.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Run `op` with the loading flag set, after waiting `latency`.
    ///
    /// # Errors
    ///
    /// Returns whatever `op` returns; the error text is kept as the last error.
    pub async fn track<R, E, F>(&self, latency: Duration, op: F) -> Result<R, E>
    where
        E: std::fmt::Display,
        F: Future<Output = Result<R, E>>,
    {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let result = op.await;

        let mut state = self.state.write().await;
        state.loading = false;
        if let Err(e) = &result {
            state.error = Some(e.to_string());
        }
        result
    }

    /// Snapshot of every record.
    pub async fn all(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// Filter by search and status, then cut out the requested page.
    pub async fn query(&self, query: &ListQuery) -> Page<T> {
        let state = self.state.read().await;
        let status = query.status.as_deref().filter(|s| !s.is_empty());
        let search = query.search.as_deref().unwrap_or_default();

        let matching: Vec<&T> = state
            .items
            .iter()
            .filter(|item| status.is_none_or(|s| item.status_key().eq_ignore_ascii_case(s)))
            .filter(|item| item.matches_search(search))
            .collect();

        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let skip = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);

        Page {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(skip)
                .take(per_page as usize)
                .cloned()
                .collect(),
            page,
            per_page,
        }
    }

    /// Find a record by id.
    pub async fn get(&self, id: &T::Id) -> Option<T> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Append a record.
    pub async fn insert(&self, item: T) -> T {
        self.state.write().await.items.push(item.clone());
        item
    }

    /// Merge changes into the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    pub async fn update<F>(&self, id: &T::Id, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        apply(item);
        Ok(item.clone())
    }

    /// Drop the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    pub async fn remove(&self, id: &T::Id) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        if state.items.len() == before {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }
}

fn not_found<T: Resource>(id: &T::Id) -> StoreError {
    StoreError::NotFound {
        entity: T::NAME,
        id: id.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use dashdesk_core::{ActiveStatus, BannerId};

    use super::*;
    use crate::models::{Banner, BannerInput};

    fn banner(id: &str, title: &str, status: ActiveStatus) -> Banner {
        Banner::from_input(
            BannerId::new(id),
            BannerInput {
                title: title.to_string(),
                image_url: "https://cdn.dashdesk.dev/banners/a.png".to_string(),
                link_url: None,
                position: 1,
                status,
            },
            Utc::now(),
        )
    }

    fn store() -> EntityStore<Banner> {
        EntityStore::new(vec![
            banner("b1", "Summer Deals", ActiveStatus::Active),
            banner("b2", "Free Delivery", ActiveStatus::Inactive),
            banner("b3", "Summer Salads", ActiveStatus::Active),
        ])
    }

    #[tokio::test]
    async fn test_insert_appends() {
        let store = store();
        store.insert(banner("b4", "New", ActiveStatus::Active)).await;

        let all = store.all().await;
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].id.as_str(), "b4");
    }

    #[tokio::test]
    async fn test_update_merges_by_id() {
        let store = store();
        let updated = store
            .update(&BannerId::new("b2"), |b| b.title = "Free Delivery Week".into())
            .await
            .unwrap();
        assert_eq!(updated.title, "Free Delivery Week");

        let all = store.all().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].title, "Free Delivery Week");
        assert_eq!(all[0].title, "Summer Deals");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let err = store()
            .update(&BannerId::new("nope"), |_| {})
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "banner nope not found");
    }

    #[tokio::test]
    async fn test_remove_filters_by_id() {
        let store = store();
        store.remove(&BannerId::new("b1")).await.unwrap();
        assert!(store.get(&BannerId::new("b1")).await.is_none());
        assert_eq!(store.len().await, 2);

        assert!(store.remove(&BannerId::new("b1")).await.is_err());
    }

    #[tokio::test]
    async fn test_query_filters_and_paginates() {
        let store = store();

        let page = store.query(&ListQuery::first(20).with_search("summer")).await;
        assert_eq!(page.total, 2);

        let page = store.query(&ListQuery::first(20).with_status("inactive")).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "b2");

        let page = store
            .query(&ListQuery {
                page: 2,
                per_page: 2,
                search: None,
                status: None,
            })
            .await;
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "b3");
    }

    #[tokio::test]
    async fn test_track_toggles_loading_and_records_error() {
        let store = store();
        assert!(!store.is_loading().await);

        let result: Result<(), StoreError> = store
            .track(Duration::ZERO, async {
                Err(StoreError::NotFound {
                    entity: "banner",
                    id: "x".into(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(!store.is_loading().await);
        assert_eq!(store.last_error().await.as_deref(), Some("banner x not found"));

        let ok: Result<u8, StoreError> = store.track(Duration::ZERO, async { Ok(1) }).await;
        assert_eq!(ok.unwrap(), 1);
        assert!(store.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_track_sets_loading_while_pending() {
        let store = std::sync::Arc::new(store());
        let inner = std::sync::Arc::clone(&store);

        let observed: Result<bool, StoreError> = store
            .track(Duration::ZERO, async move { Ok(inner.is_loading().await) })
            .await;
        assert!(observed.unwrap());
    }
}
