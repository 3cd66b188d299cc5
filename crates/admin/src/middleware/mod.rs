//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (strict CSP for admin)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Permission guard (403 for sections the admin may not open)

pub mod auth;
pub mod permission;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_auth_state, set_auth_state};
pub use permission::require_route_permission;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, push_toast, take_toast};
