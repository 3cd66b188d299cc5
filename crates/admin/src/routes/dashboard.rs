//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use dashdesk_core::{OrderStatus, Permission, Price, PromotionStatus, TicketStatus, has_all};

use crate::components::Cell;
use crate::error::AppError;
use crate::filters;
use crate::marketplace::{ApiError, ListQuery, Resource};
use crate::middleware::RequireAdminAuth;
use crate::models::{Customer, Merchant, Order, Promotion, Rider, SupportTicket};
use crate::state::AppState;

use super::layout::PageContext;
use super::resources::{AdminPage, expire_session, item_href};

/// Orders fetched when summing delivered revenue.
const REVENUE_SAMPLE: u32 = 100;

/// Orders fetched to pick the most recent ones from.
const RECENT_SAMPLE: u32 = 50;

const RECENT_ORDERS: usize = 5;

/// Revenue is both order data and a report.
const REVENUE_PERMISSIONS: &[Permission] = &[Permission::ManageOrders, Permission::ViewReports];

/// One stat card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub href: String,
}

/// Recent order row.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub href: String,
    pub number: String,
    pub customer: String,
    pub total: String,
    pub status: Cell,
    pub placed: Cell,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            href: item_href::<Order>(&order.id),
            number: order.order_number.clone(),
            customer: order.customer_id.to_string(),
            total: order.total.display(),
            status: Cell::status(order.status),
            placed: Cell::date(&order.created_at),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub cards: Vec<StatCard>,
    pub recent_orders: Vec<RecentOrderView>,
    /// Whether the admin may see orders at all.
    pub show_orders: bool,
}

/// Result of one stat lookup; `None` when the admin may not see it.
type Stat<T> = Option<Result<T, ApiError>>;

/// Total number of `T` rows, optionally restricted to `status`.
async fn total<T: Resource>(
    state: &AppState,
    token: &str,
    allowed: bool,
    status: Option<&str>,
) -> Stat<u64> {
    if !allowed {
        return None;
    }
    let mut query = ListQuery::first(1);
    if let Some(status) = status {
        query = query.with_status(status);
    }
    Some(state.backend().list::<T>(token, &query).await.map(|page| page.total))
}

/// Revenue from delivered orders in the first [`REVENUE_SAMPLE`] of them.
async fn delivered_revenue(state: &AppState, token: &str, allowed: bool) -> Stat<Price> {
    if !allowed {
        return None;
    }
    let query = ListQuery::first(REVENUE_SAMPLE).with_status(OrderStatus::Delivered.as_str());
    Some(
        state
            .backend()
            .list::<Order>(token, &query)
            .await
            .map(|page| page.items.iter().map(|o| o.total).sum()),
    )
}

async fn recent_orders(state: &AppState, token: &str, allowed: bool) -> Stat<Vec<Order>> {
    if !allowed {
        return None;
    }
    let query = ListQuery::first(RECENT_SAMPLE);
    Some(state.backend().list::<Order>(token, &query).await.map(|page| {
        let mut orders = page.items;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(RECENT_ORDERS);
        orders
    }))
}

fn is_unauthorized<T>(stat: &Stat<T>) -> bool {
    matches!(stat, Some(Err(e)) if e.is_unauthorized())
}

/// Card for a stat, or nothing when the admin may not see it. Failed lookups
/// show a dash.
fn card<T>(
    label: &'static str,
    href: String,
    stat: Stat<T>,
    format: impl FnOnce(T) -> String,
) -> Option<StatCard> {
    let value = match stat? {
        Ok(value) => format(value),
        Err(e) => {
            tracing::warn!(error = %e, stat = label, "Dashboard stat unavailable");
            "—".to_string()
        }
    };
    Some(StatCard { label, value, href })
}

fn filtered<T: AdminPage>(status: &str) -> String {
    format!("/{}?status={status}", T::SLUG)
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Dashboard page handler.
#[instrument(skip_all, fields(admin_id = %auth.user.id))]
pub async fn dashboard(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let user = &auth.user;
    let token = auth.token.as_str();
    let orders_allowed = user.can(Permission::ManageOrders);
    let tickets_allowed = user.can(Permission::ManageSupport);

    let (customers, merchants, riders, orders, pending, revenue, promotions, open, working, recent) = tokio::join!(
        total::<Customer>(&state, token, user.can(Permission::ManageCustomers), None),
        total::<Merchant>(&state, token, user.can(Permission::ManageMerchants), None),
        total::<Rider>(&state, token, user.can(Permission::ManageRiders), None),
        total::<Order>(&state, token, orders_allowed, None),
        total::<Order>(&state, token, orders_allowed, Some(OrderStatus::Pending.as_str())),
        delivered_revenue(&state, token, has_all(&user.permissions, REVENUE_PERMISSIONS)),
        total::<Promotion>(
            &state,
            token,
            user.can(Permission::ManagePromotions),
            Some(PromotionStatus::Active.as_str()),
        ),
        total::<SupportTicket>(&state, token, tickets_allowed, Some(TicketStatus::Open.as_str())),
        total::<SupportTicket>(
            &state,
            token,
            tickets_allowed,
            Some(TicketStatus::InProgress.as_str()),
        ),
        recent_orders(&state, token, orders_allowed),
    );

    let counts = [&customers, &merchants, &riders, &orders, &pending, &promotions, &open, &working];
    if counts.iter().any(|s| is_unauthorized(s))
        || is_unauthorized(&revenue)
        || is_unauthorized(&recent)
    {
        return expire_session(&session).await;
    }

    // Tickets still waiting on someone: open plus in progress.
    let unresolved = match (open, working) {
        (Some(Ok(a)), Some(Ok(b))) => Some(Ok(a + b)),
        (Some(Err(e)), _) | (_, Some(Err(e))) => Some(Err(e)),
        _ => None,
    };

    let count = |n: u64| n.to_string();
    let cards = [
        card("Customers", format!("/{}", Customer::SLUG), customers, count),
        card("Merchants", format!("/{}", Merchant::SLUG), merchants, count),
        card("Riders", format!("/{}", Rider::SLUG), riders, count),
        card("Orders", format!("/{}", Order::SLUG), orders, count),
        card("Pending orders", filtered::<Order>("pending"), pending, count),
        card(
            "Delivered revenue",
            filtered::<Order>("delivered"),
            revenue,
            |p: Price| p.display(),
        ),
        card("Active promotions", filtered::<Promotion>("active"), promotions, count),
        card("Open tickets", format!("/{}", SupportTicket::SLUG), unresolved, count),
    ]
    .into_iter()
    .flatten()
    .collect();

    let recent_orders = match recent {
        Some(Ok(orders)) => orders.iter().map(RecentOrderView::from).collect(),
        Some(Err(e)) => {
            AppError::from(e).report();
            vec![]
        }
        None => vec![],
    };

    DashboardTemplate {
        ctx: PageContext::new(&session, &auth, "/", "Dashboard").await,
        cards,
        recent_orders,
        show_orders: orders_allowed,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_hides_forbidden_stats() {
        let stat: Stat<u64> = None;
        assert_eq!(card("Riders", "/riders".into(), stat, |n| n.to_string()), None);
    }

    #[test]
    fn test_card_shows_dash_on_failure() {
        let stat: Stat<u64> = Some(Err(ApiError::RateLimited(5)));
        let card = card("Orders", "/orders".into(), stat, |n| n.to_string()).unwrap_or_else(|| {
            panic!("card should be shown");
        });
        assert_eq!(card.value, "—");
    }

    #[test]
    fn test_filtered_link() {
        assert_eq!(filtered::<Order>("pending"), "/orders?status=pending");
    }
}
