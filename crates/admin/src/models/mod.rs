//! Marketplace records mirrored from the API.
//!
//! Each entity has a record type (what the API returns) and an input type
//! (what a form submits). Inputs implement [`dashdesk_core::Validate`]; the
//! record implements [`crate::marketplace::Resource`] so the same handlers
//! and backends serve every entity.

pub mod admin_user;
pub mod banner;
pub mod category;
pub mod customer;
pub mod merchant;
pub mod order;
pub mod promotion;
pub mod recipe;
pub mod rider;
pub mod session;
pub mod support;

pub use admin_user::{AdminUser, AdminUserInput};
pub use banner::{Banner, BannerInput};
pub use category::{Category, CategoryInput, Subcategory, SubcategoryInput};
pub use customer::{Customer, CustomerInput};
pub use merchant::{Merchant, MerchantInput};
pub use order::{Order, OrderInput, OrderItem};
pub use promotion::{Promotion, PromotionInput};
pub use recipe::{Recipe, RecipeInput};
pub use rider::{Rider, RiderInput};
pub use session::{AuthState, CurrentAdmin, Toast, ToastKind, keys as session_keys};
pub use support::{SupportTicket, SupportTicketInput};

/// Trimmed copy of an optional text field, `None` when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
