//! Data source selection: remote REST API or in-memory mock dataset.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::instrument;

use dashdesk_core::Validate;

use super::{ApiClient, ApiError, ListQuery, LoginSession, MockData, Page, Resource};

/// Where entity operations are sent.
///
/// Handlers call the generic methods here and never care which variant is
/// active. Every operation validates its input before anything is sent.
#[derive(Clone, Debug)]
pub enum Backend {
    Remote(ApiClient),
    Mock(MockBackend),
}

/// Mock backend: shared stores plus a simulated delay on every operation.
#[derive(Clone, Debug)]
pub struct MockBackend {
    data: Arc<MockData>,
    latency: Duration,
}

impl MockBackend {
    #[must_use]
    pub fn new(data: MockData, latency: Duration) -> Self {
        Self {
            data: Arc::new(data),
            latency,
        }
    }

    /// The underlying stores.
    #[must_use]
    pub fn data(&self) -> &MockData {
        &self.data
    }
}

impl Backend {
    /// Mock backend over `data`.
    #[must_use]
    pub fn mock(data: MockData, latency: Duration) -> Self {
        Self::Mock(MockBackend::new(data, latency))
    }

    /// Whether this is the in-memory mock.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }

    /// Authenticate an admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for unknown emails, wrong passwords or inactive
    /// accounts.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, ApiError> {
        match self {
            Self::Remote(client) => client.login(email, password).await,
            Self::Mock(mock) => {
                let users = &mock.data.users;
                users
                    .track(mock.latency, async {
                        let credential = mock
                            .data
                            .credential(email)
                            .filter(|c| c.password == password)
                            .ok_or(ApiError::Unauthorized)?;
                        let now = Utc::now();
                        let user = users
                            .update(&credential.user_id, |u| u.last_login_at = Some(now))
                            .await
                            .map_err(|_| ApiError::Unauthorized)?;
                        if !user.is_active() {
                            return Err(ApiError::Unauthorized);
                        }
                        Ok::<_, ApiError>(LoginSession {
                            token: uuid::Uuid::new_v4().to_string(),
                            refresh_token: Some(uuid::Uuid::new_v4().to_string()),
                            user,
                        })
                    })
                    .await
            }
        }
    }

    /// End the admin's session on the API. Best effort.
    pub async fn logout(&self, token: &str) {
        if let Self::Remote(client) = self
            && let Err(e) = client.logout(token).await
        {
            tracing::warn!(error = %e, "Remote logout failed");
        }
    }

    /// Readiness probe. The mock is always ready; the remote API must answer.
    pub async fn is_ready(&self) -> bool {
        match self {
            Self::Remote(client) => match client.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Marketplace API unreachable");
                    false
                }
            },
            Self::Mock(_) => true,
        }
    }

    /// One page of `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    #[instrument(skip(self, token), fields(entity = T::NAME))]
    pub async fn list<T: Resource>(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        match self {
            Self::Remote(client) => client.list(Some(token), T::LIST_PATH, query).await,
            Self::Mock(mock) => {
                let store = T::store(&mock.data);
                store
                    .track(Duration::ZERO, async {
                        Ok::<_, ApiError>(store.query(query).await)
                    })
                    .await
            }
        }
    }

    /// A single `T` by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such record exists.
    #[instrument(skip(self, token), fields(entity = T::NAME, id = %id))]
    pub async fn get<T: Resource>(&self, token: &str, id: &T::Id) -> Result<T, ApiError> {
        match self {
            Self::Remote(client) => client.get(Some(token), &T::item_path(id)?).await,
            Self::Mock(mock) => T::store(&mock.data)
                .get(id)
                .await
                .ok_or_else(|| ApiError::NotFound(format!("{} {id}", T::NAME))),
        }
    }

    /// Validate and create a `T`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before sending anything if the input is invalid.
    #[instrument(skip(self, token, input), fields(entity = T::NAME))]
    pub async fn create<T: Resource>(&self, token: &str, input: T::Input) -> Result<T, ApiError> {
        T::validate_new(&input)?;

        match self {
            Self::Remote(client) => client.post(Some(token), T::CREATE_PATH, &input).await,
            Self::Mock(mock) => {
                let store = T::store(&mock.data);
                store
                    .track(mock.latency, async {
                        let record = T::from_input(T::generate_id(), input, Utc::now());
                        Ok::<_, ApiError>(store.insert(record).await)
                    })
                    .await
            }
        }
    }

    /// Validate and update the `T` with `id`.
    ///
    /// The current record is fetched first so rules that depend on it, such
    /// as order status transitions, can run.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the input is invalid, `NotFound` if the record
    /// is gone.
    #[instrument(skip(self, token, input), fields(entity = T::NAME, id = %id))]
    pub async fn update<T: Resource>(
        &self,
        token: &str,
        id: &T::Id,
        input: T::Input,
    ) -> Result<T, ApiError> {
        input.validate()?;
        let current: T = self.get(token, id).await?;
        current.check_update(&input)?;

        match self {
            Self::Remote(client) => client.put(Some(token), &T::item_path(id)?, &input).await,
            Self::Mock(mock) => {
                let store = T::store(&mock.data);
                store
                    .track(mock.latency, async {
                        let now = Utc::now();
                        Ok::<_, ApiError>(store.update(id, |item| item.apply_input(input, now)).await?)
                    })
                    .await
            }
        }
    }

    /// Delete the `T` with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    #[instrument(skip(self, token), fields(entity = T::NAME, id = %id))]
    pub async fn delete<T: Resource>(&self, token: &str, id: &T::Id) -> Result<(), ApiError> {
        match self {
            Self::Remote(client) => client.delete(Some(token), &T::item_path(id)?).await,
            Self::Mock(mock) => {
                let store = T::store(&mock.data);
                store
                    .track(mock.latency, async {
                        Ok::<_, ApiError>(store.remove(id).await?)
                    })
                    .await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dashdesk_core::{CustomerId, CustomerStatus, OrderId, OrderStatus};

    use super::*;
    use crate::models::{Customer, CustomerInput, Order, OrderInput};

    fn backend() -> Backend {
        Backend::mock(MockData::bundled().unwrap(), Duration::ZERO)
    }

    fn remote(server: &wiremock::MockServer) -> Backend {
        let config = crate::config::MarketplaceApiConfig {
            base_url: url::Url::parse(&format!("{}/v1", server.uri())).unwrap(),
            api_key: secrecy::SecretString::from("mk_test_7Hq2pLx9Zr4vB1nT"),
            timeout: Duration::from_secs(5),
        };
        Backend::Remote(ApiClient::new(&config).unwrap())
    }

    fn customer_input(email: &str) -> CustomerInput {
        CustomerInput {
            name: "Zainab Musa".into(),
            email: email.into(),
            phone: "+234 809 555 0101".into(),
            address: None,
            status: CustomerStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_mock_login() {
        let backend = backend();
        let session = backend
            .login("superadmin@dashdesk.dev", "dashdesk-demo")
            .await
            .unwrap();
        assert!(session.user.permissions.manage_users);
        assert!(session.user.last_login_at.is_some());

        let err = backend
            .login("superadmin@dashdesk.dev", "wrong")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_inactive_admin_cannot_log_in() {
        let err = backend()
            .login("former@dashdesk.dev", "dashdesk-demo")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_create_validates_before_storing() {
        let backend = backend();
        let before = backend
            .list::<Customer>("t", &ListQuery::first(100))
            .await
            .unwrap()
            .total;

        let err = backend
            .create::<Customer>("t", customer_input("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e.has("email")));

        let created = backend
            .create::<Customer>("t", customer_input("zainab@example.com"))
            .await
            .unwrap();
        assert!(created.id.as_str().starts_with("cus_"));

        let page = backend.list::<Customer>("t", &ListQuery::first(100)).await.unwrap();
        assert_eq!(page.total, before + 1);
        assert_eq!(page.items.last().unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let backend = backend();
        let id = CustomerId::new("cus_1001");

        let updated = backend
            .update::<Customer>("t", &id, customer_input("zainab@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.email, "zainab@example.com");
        assert_eq!(backend.get::<Customer>("t", &id).await.unwrap().name, "Zainab Musa");

        backend.delete::<Customer>("t", &id).await.unwrap();
        let err = backend.get::<Customer>("t", &id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = backend.delete::<Customer>("t", &id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_order_update_enforces_lifecycle() {
        let backend = backend();
        let id = OrderId::new("ord_5001");
        let order: Order = backend.get("t", &id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let input = OrderInput {
            customer_id: order.customer_id.clone(),
            merchant_id: order.merchant_id.clone(),
            rider_id: order.rider_id.clone(),
            items: order.items.clone(),
            delivery_fee: order.delivery_fee,
            payment_method: order.payment_method,
            delivery_address: order.delivery_address.clone(),
            status: OrderStatus::Delivered,
        };
        let err = backend.update::<Order>("t", &id, input.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e.has("status")));

        let confirmed = backend
            .update::<Order>(
                "t",
                &id,
                OrderInput {
                    status: OrderStatus::Confirmed,
                    ..input
                },
            )
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_remote_item_ids_stay_in_one_segment() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/order/a%20b"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": true, "data": null })),
            )
            .expect(1)
            .mount(&server)
            .await;
        let backend = remote(&server);

        backend.delete::<Order>("t", &OrderId::new("a b")).await.unwrap();

        for id in ["..", "."] {
            let err = backend.get::<Order>("t", &OrderId::new(id)).await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)), "{id}");
            let err = backend.delete::<Order>("t", &OrderId::new(id)).await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)), "{id}");
        }
    }
}
