//! DashDesk Admin library.
//!
//! Server-rendered back office for the DashDesk delivery marketplace. All
//! data lives behind the marketplace REST API; a bundled mock dataset stands
//! in for it during development and tests.
//!
//! # Security
//!
//! Admins sign in against the marketplace API and every section is gated by
//! the permission flags on their account. The bearer token never leaves the
//! server-side session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod marketplace;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use app::build_app;
