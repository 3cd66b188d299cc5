//! DashDesk Core - Shared types library.
//!
//! This crate provides common types used across all DashDesk components:
//! - `admin` - Back-office web application for the delivery marketplace
//! - `cli` - Command-line tools for fixture checks and API probes
//!
//! # Architecture
//!
//! The core crate contains only types, rules and pure functions - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`validation`] - Form validation rules applied before submission
//! - [`permissions`] - Permission flags, combinators and the route table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod permissions;
pub mod types;
pub mod validation;

pub use permissions::{Permission, Permissions, has_all, has_any, has_permission, route_permission};
pub use types::*;
pub use validation::{Validate, ValidationErrors, Validator, humanize};
