//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness (marketplace reachable)
//!
//! # Dashboard
//! GET  /                       - Stat cards and recent orders
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Sign in with email and password
//! POST /auth/logout            - Sign out
//!
//! # Entities (see `resources`)
//! /customers /merchants /riders /orders /promotions /banners
//! /categories /subcategories /recipes /support /users
//! ```

use axum::Router;

use crate::models::{
    AdminUser, Banner, Category, Customer, Merchant, Order, Promotion, Recipe, Rider, Subcategory,
    SupportTicket,
};
use crate::state::AppState;

pub mod auth;
mod banners;
mod categories;
mod customers;
pub mod dashboard;
pub mod layout;
mod merchants;
pub mod orders;
mod promotions;
mod recipes;
pub mod resources;
mod riders;
mod support;
mod users;

use resources::resource_routes;

/// Every page route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(resource_routes::<Customer>())
        .merge(resource_routes::<Merchant>())
        .merge(resource_routes::<Rider>())
        .merge(resource_routes::<Order>())
        .merge(resource_routes::<Promotion>())
        .merge(resource_routes::<Banner>())
        .merge(resource_routes::<Category>())
        .merge(resource_routes::<Subcategory>())
        .merge(resource_routes::<Recipe>())
        .merge(resource_routes::<SupportTicket>())
        .merge(resource_routes::<AdminUser>())
}
