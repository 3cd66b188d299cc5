//! Marketplace API probes.
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_API_URL` / `MARKETPLACE_API_KEY` - API location and key
//! - `DASHDESK_ADMIN_EMAIL` / `DASHDESK_ADMIN_PASSWORD` - Admin to sign in as

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use dashdesk_admin::config::{ConfigError, MarketplaceApiConfig};
use dashdesk_admin::marketplace::{ApiClient, ApiError, Backend, ListQuery, Resource};
use dashdesk_admin::models::{
    AdminUser, Banner, Category, Customer, Merchant, Order, Promotion, Recipe, Rider, Subcategory,
    SupportTicket,
};

/// Errors from `api` commands.
#[derive(Debug, Error)]
pub enum ApiCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn required_env(name: &'static str) -> Result<String, ApiCommandError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiCommandError::MissingEnvVar(name))
}

/// Log the total for one entity. Sections the admin may not open are
/// reported and skipped.
async fn report<T: Resource>(backend: &Backend, token: &str) -> Result<(), ApiError> {
    match backend.list::<T>(token, &ListQuery::first(1)).await {
        Ok(page) => {
            info!("  {}: {}", T::NAME, page.total);
            Ok(())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(e) => {
            warn!("  {}: unavailable ({e})", T::NAME);
            Ok(())
        }
    }
}

/// Sign in and print record totals per entity.
///
/// # Errors
///
/// Returns an error if configuration is missing, sign-in fails or the token
/// is rejected part-way through.
pub async fn stats() -> Result<(), ApiCommandError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = MarketplaceApiConfig::from_env()?;
    let email = required_env("DASHDESK_ADMIN_EMAIL")?;
    let password = SecretString::from(required_env("DASHDESK_ADMIN_PASSWORD")?);

    let backend = Backend::Remote(ApiClient::new(&config)?);
    info!(api = %config.base_url, "Signing in as {email}");
    let login = backend.login(&email, password.expose_secret()).await?;
    let token = login.token.as_str();

    info!("Record totals");
    info!("=============");
    report::<Customer>(&backend, token).await?;
    report::<Merchant>(&backend, token).await?;
    report::<Rider>(&backend, token).await?;
    report::<Order>(&backend, token).await?;
    report::<Promotion>(&backend, token).await?;
    report::<Banner>(&backend, token).await?;
    report::<Category>(&backend, token).await?;
    report::<Subcategory>(&backend, token).await?;
    report::<Recipe>(&backend, token).await?;
    report::<SupportTicket>(&backend, token).await?;
    report::<AdminUser>(&backend, token).await?;

    backend.logout(token).await;
    Ok(())
}
