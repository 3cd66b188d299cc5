//! Generic list / detail / form pages for marketplace entities.
//!
//! Every entity gets the same seven routes under `/{slug}`. Handlers are
//! written once against [`AdminPage`]; each entity module only describes
//! its table columns, detail rows and form.
//!
//! ```text
//! GET  /{slug}              - Table with search, status filter, pagination
//! GET  /{slug}/new          - Create form
//! POST /{slug}              - Create
//! GET  /{slug}/{id}         - Detail
//! GET  /{slug}/{id}/edit    - Edit form
//! POST /{slug}/{id}         - Update
//! POST /{slug}/{id}/delete  - Delete
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dashdesk_core::ValidationErrors;

use crate::components::form::{unmatched_errors, with_errors};
use crate::components::{
    Cell, DataTableConfig, FormField, FormValues, PaginationView, TableRow, TableView,
};
use crate::error::AppError;
use crate::filters;
use crate::marketplace::resource::path_segment;
use crate::marketplace::{ApiError, ListQuery, Page, Resource};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{RequireAdminAuth, clear_auth_state, push_toast};
use crate::models::{AuthState, Toast};
use crate::state::AppState;

use super::layout::{PageContext, render_app_error, render_error_page};

/// One label/value row on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub label: &'static str,
    pub cell: Cell,
}

impl Detail {
    #[must_use]
    pub fn new(label: &'static str, cell: Cell) -> Self {
        Self { label, cell }
    }

    #[must_use]
    pub fn text(label: &'static str, text: impl Into<String>) -> Self {
        Self::new(label, Cell::text(text))
    }
}

/// How an entity is presented in the admin.
pub trait AdminPage: Resource {
    /// URL segment, e.g. `customers`.
    const SLUG: &'static str;
    /// Plural heading.
    const TITLE: &'static str;
    /// Singular label used in buttons and toasts.
    const LABEL: &'static str;

    fn table() -> DataTableConfig;

    /// Cells in the order of [`AdminPage::table`]'s columns.
    fn row(&self) -> Vec<Cell>;

    /// Heading for the detail and edit pages.
    fn heading(&self) -> String;

    fn details(&self) -> Vec<Detail>;

    /// Initial values of the create form.
    fn default_values() -> FormValues {
        FormValues::new()
    }

    /// Current values for the edit form.
    fn form_values(&self) -> FormValues;

    fn form_fields(values: &FormValues, editing: bool) -> Vec<FormField>;

    /// Turn submitted values into the entity's input.
    ///
    /// # Errors
    ///
    /// Returns field errors for values that do not parse or break the
    /// input's rules.
    fn parse_form(values: &FormValues) -> Result<Self::Input, ValidationErrors>;
}

/// Routes for one entity.
pub fn resource_routes<T: AdminPage>() -> Router<AppState> {
    let base = format!("/{}", T::SLUG);
    Router::new()
        .route(&base, get(index::<T>).post(create::<T>))
        .route(&format!("{base}/new"), get(new::<T>))
        .route(&format!("{base}/{{id}}"), get(show::<T>).post(update::<T>))
        .route(&format!("{base}/{{id}}/edit"), get(edit::<T>))
        .route(&format!("{base}/{{id}}/delete"), post(delete::<T>))
}

/// Table query parameters; anything malformed falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    /// Page number, at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_deref().map_or("", str::trim)
    }

    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().map_or("", str::trim)
    }

    /// Backend query for these parameters.
    #[must_use]
    pub fn to_query(&self, per_page: u32) -> ListQuery {
        let mut query = ListQuery::first(per_page);
        query.page = self.page();
        if !self.search().is_empty() {
            query = query.with_search(self.search());
        }
        if !self.status().is_empty() {
            query = query.with_status(self.status());
        }
        query
    }
}

/// Path of the detail page for `id`.
///
/// Ids that cannot be a path segment (`.`, `..`) link back to the table.
#[must_use]
pub fn item_href<T: AdminPage>(id: &T::Id) -> String {
    path_segment(id.as_ref()).map_or_else(
        || format!("/{}", T::SLUG),
        |segment| format!("/{}/{segment}", T::SLUG),
    )
}

// =============================================================================
// Templates
// =============================================================================

/// Resource table page.
#[derive(Template, WebTemplate)]
#[template(path = "resources/index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
    pub slug: &'static str,
    pub label: &'static str,
    pub table: TableView,
}

/// Create / edit form page.
#[derive(Template, WebTemplate)]
#[template(path = "resources/form.html")]
pub struct FormTemplate {
    pub ctx: PageContext,
    pub heading: String,
    pub label: &'static str,
    pub action: String,
    pub cancel_href: String,
    pub fields: Vec<FormField>,
    /// Errors for fields the form does not render.
    pub form_errors: Vec<String>,
    pub editing: bool,
}

/// Detail page.
#[derive(Template, WebTemplate)]
#[template(path = "resources/show.html")]
pub struct ShowTemplate {
    pub ctx: PageContext,
    pub slug: &'static str,
    pub label: &'static str,
    pub heading: String,
    pub details: Vec<Detail>,
    pub edit_href: String,
    pub delete_action: String,
}

// =============================================================================
// Shared Responses
// =============================================================================

/// The API no longer accepts the admin's token: drop the session and start over.
pub async fn expire_session(session: &Session) -> Response {
    if let Err(e) = clear_auth_state(session).await {
        AppError::from(e).report();
    }
    push_toast(session, Toast::error("Your session has expired. Please sign in again.")).await;
    Redirect::to(LOGIN_PATH).into_response()
}

async fn render_form<T: AdminPage>(
    session: &Session,
    auth: &AuthState,
    status: StatusCode,
    editing: Option<&T::Id>,
    heading: String,
    values: &FormValues,
    errors: &ValidationErrors,
) -> Response {
    let (action, path, cancel_href) = editing.map_or_else(
        || {
            let base = format!("/{}", T::SLUG);
            (base.clone(), format!("{base}/new"), base)
        },
        |id| {
            let href = item_href::<T>(id);
            (href.clone(), format!("{href}/edit"), href)
        },
    );
    let fields = with_errors(T::form_fields(values, editing.is_some()), errors);
    let template = FormTemplate {
        ctx: PageContext::new(session, auth, &path, &heading).await,
        form_errors: unmatched_errors(&fields, errors),
        heading,
        label: T::LABEL,
        action,
        cancel_href,
        fields,
        editing: editing.is_some(),
    };
    (status, template).into_response()
}

/// Response for a failed lookup on a detail or edit page.
async fn lookup_failed<T: AdminPage>(
    session: &Session,
    auth: &AuthState,
    id: &str,
    error: ApiError,
) -> Response {
    match error {
        ApiError::Unauthorized => expire_session(session).await,
        ApiError::NotFound(_) => {
            render_error_page(
                session,
                auth,
                StatusCode::NOT_FOUND,
                &format!("{} not found", T::LABEL),
                &format!("There is no {} with id {id}.", T::NAME),
            )
            .await
        }
        other => render_app_error(session, auth, &AppError::from(other)).await,
    }
}

/// Response for a rejected create or update.
async fn save_failed<T: AdminPage>(
    session: &Session,
    auth: &AuthState,
    editing: Option<&T::Id>,
    heading: String,
    values: &FormValues,
    error: ApiError,
) -> Response {
    match error {
        ApiError::Unauthorized => expire_session(session).await,
        ApiError::Validation(errors) => {
            render_form::<T>(
                session,
                auth,
                StatusCode::UNPROCESSABLE_ENTITY,
                editing,
                heading,
                values,
                &errors,
            )
            .await
        }
        other => {
            let error = AppError::from(other);
            error.report();
            push_toast(session, Toast::error(error.public_message())).await;
            let status = error.status();
            render_form::<T>(
                session,
                auth,
                status,
                editing,
                heading,
                values,
                &ValidationErrors::new(),
            )
            .await
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Resource table.
#[instrument(skip_all, fields(entity = T::NAME))]
pub async fn index<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Response {
    let base = format!("/{}", T::SLUG);
    let query = params.to_query(state.config().page_size);

    let page = match state.backend().list::<T>(&auth.token, &query).await {
        Ok(page) => page,
        Err(ApiError::Unauthorized) => return expire_session(&session).await,
        Err(e) => {
            let error = AppError::from(e);
            error.report();
            push_toast(&session, Toast::error(error.public_message())).await;
            Page {
                items: vec![],
                total: 0,
                page: 1,
                per_page: query.per_page,
            }
        }
    };

    let rows = page
        .items
        .iter()
        .map(|item| TableRow {
            href: item_href::<T>(item.id()),
            cells: item.row(),
        })
        .collect();
    let pagination = PaginationView::new(&base, &page, params.search(), params.status());

    IndexTemplate {
        ctx: PageContext::new(&session, &auth, &base, T::TITLE).await,
        slug: T::SLUG,
        label: T::LABEL,
        table: TableView::new(T::table(), rows, pagination, params.search(), params.status()),
    }
    .into_response()
}

/// Create form.
pub async fn new<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    session: Session,
) -> Response {
    render_form::<T>(
        &session,
        &auth,
        StatusCode::OK,
        None,
        format!("New {}", T::NAME),
        &T::default_values(),
        &ValidationErrors::new(),
    )
    .await
}

/// Create a record.
#[instrument(skip_all, fields(entity = T::NAME))]
pub async fn create<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(values): Form<FormValues>,
) -> Response {
    let heading = format!("New {}", T::NAME);
    let input = match T::parse_form(&values) {
        Ok(input) => input,
        Err(errors) => {
            return render_form::<T>(
                &session,
                &auth,
                StatusCode::UNPROCESSABLE_ENTITY,
                None,
                heading,
                &values,
                &errors,
            )
            .await;
        }
    };

    match state.backend().create::<T>(&auth.token, input).await {
        Ok(record) => {
            tracing::info!(id = %record.id(), "Created {}", T::NAME);
            push_toast(&session, Toast::success(format!("{} created", T::LABEL))).await;
            Redirect::to(&item_href::<T>(record.id())).into_response()
        }
        Err(e) => save_failed::<T>(&session, &auth, None, heading, &values, e).await,
    }
}

/// Detail page.
#[instrument(skip_all, fields(entity = T::NAME, id = %id))]
pub async fn show<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let record_id = T::Id::from(id.clone());
    let record: T = match state.backend().get(&auth.token, &record_id).await {
        Ok(record) => record,
        Err(e) => return lookup_failed::<T>(&session, &auth, &id, e).await,
    };

    let href = item_href::<T>(&record_id);
    let heading = record.heading();
    ShowTemplate {
        ctx: PageContext::new(&session, &auth, &href, &heading).await,
        slug: T::SLUG,
        label: T::LABEL,
        heading,
        details: record.details(),
        edit_href: format!("{href}/edit"),
        delete_action: format!("{href}/delete"),
    }
    .into_response()
}

/// Edit form, pre-filled from the current record.
#[instrument(skip_all, fields(entity = T::NAME, id = %id))]
pub async fn edit<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let record_id = T::Id::from(id.clone());
    let record: T = match state.backend().get(&auth.token, &record_id).await {
        Ok(record) => record,
        Err(e) => return lookup_failed::<T>(&session, &auth, &id, e).await,
    };

    render_form::<T>(
        &session,
        &auth,
        StatusCode::OK,
        Some(&record_id),
        format!("Edit {}", record.heading()),
        &record.form_values(),
        &ValidationErrors::new(),
    )
    .await
}

/// Update a record.
#[instrument(skip_all, fields(entity = T::NAME, id = %id))]
pub async fn update<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(values): Form<FormValues>,
) -> Response {
    let record_id = T::Id::from(id);
    let heading = format!("Edit {} {record_id}", T::NAME);
    let input = match T::parse_form(&values) {
        Ok(input) => input,
        Err(errors) => {
            return render_form::<T>(
                &session,
                &auth,
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(&record_id),
                heading,
                &values,
                &errors,
            )
            .await;
        }
    };

    match state.backend().update::<T>(&auth.token, &record_id, input).await {
        Ok(record) => {
            tracing::info!("Updated {}", T::NAME);
            push_toast(&session, Toast::success(format!("{} updated", T::LABEL))).await;
            Redirect::to(&item_href::<T>(record.id())).into_response()
        }
        Err(e) => save_failed::<T>(&session, &auth, Some(&record_id), heading, &values, e).await,
    }
}

/// Delete a record.
#[instrument(skip_all, fields(entity = T::NAME, id = %id))]
pub async fn delete<T: AdminPage>(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let record_id = T::Id::from(id);
    let index = format!("/{}", T::SLUG);

    match state.backend().delete::<T>(&auth.token, &record_id).await {
        Ok(()) => {
            tracing::info!("Deleted {}", T::NAME);
            push_toast(&session, Toast::success(format!("{} deleted", T::LABEL))).await;
            Redirect::to(&index).into_response()
        }
        Err(ApiError::Unauthorized) => expire_session(&session).await,
        Err(e @ ApiError::NotFound(_)) => {
            push_toast(&session, Toast::error(e.user_message())).await;
            Redirect::to(&index).into_response()
        }
        Err(e) => {
            let error = AppError::from(e);
            error.report();
            push_toast(&session, Toast::error(error.public_message())).await;
            Redirect::to(&item_href::<T>(&record_id)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_fall_back_to_defaults() {
        let params = ListParams {
            page: Some("zero".into()),
            search: Some("  ".into()),
            status: None,
        };
        assert_eq!(params.to_query(20), ListQuery::first(20));

        let params = ListParams {
            page: Some("3".into()),
            search: Some(" ngozi ".into()),
            status: Some("active".into()),
        };
        let query = params.to_query(10);
        assert_eq!(query.page, 3);
        assert_eq!(query.search.as_deref(), Some("ngozi"));
        assert_eq!(query.status.as_deref(), Some("active"));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let params = ListParams {
            page: Some("0".into()),
            ..ListParams::default()
        };
        assert_eq!(params.page(), 1);
    }
}
