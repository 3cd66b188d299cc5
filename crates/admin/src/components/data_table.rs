//! Data table component types.
//!
//! A [`DataTableConfig`] describes a resource table once; [`TableView`] is
//! what a list page renders: the config, one page of rows, the active
//! search and filter, and pagination links that keep them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::form_urlencoded;

use dashdesk_core::Choice;

use crate::marketplace::Page;

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align numeric columns.
    pub numeric: bool,
}

impl TableColumn {
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a right-aligned column for amounts and counts.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Whether this option is the active one.
    pub selected: bool,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: false,
        }
    }

    /// One option per variant of a status enum.
    #[must_use]
    pub fn all<T: Choice>() -> Vec<Self> {
        T::CHOICES
            .iter()
            .map(|c| Self::new(c.value(), c.text()))
            .collect()
    }

    /// Mark the option whose value equals `current` as selected.
    #[must_use]
    pub fn select(mut options: Vec<Self>, current: &str) -> Vec<Self> {
        for option in &mut options {
            option.selected = option.value == current;
        }
        options
    }
}

/// Select filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Filter parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Available options.
    pub options: Vec<FilterOption>,
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Status filter, if the resource has one.
    pub status_filter: Option<TableFilter>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            status_filter: None,
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Filter rows by a status enum.
    #[must_use]
    pub fn status_filter<T: Choice>(mut self, label: &str) -> Self {
        self.status_filter = Some(TableFilter::select("status", label, FilterOption::all::<T>()));
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    /// Status key rendered as a coloured badge.
    pub badge: Option<&'static str>,
}

impl Cell {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            badge: None,
        }
    }

    /// Text for an optional value, with a dash when absent.
    #[must_use]
    pub fn optional(text: Option<impl Into<String>>) -> Self {
        text.map_or_else(|| Self::text("—"), Self::text)
    }

    /// A timestamp such as `12 Oct 2026 18:30` (UTC).
    #[must_use]
    pub fn date(at: &DateTime<Utc>) -> Self {
        Self::text(at.format("%d %b %Y %H:%M").to_string())
    }

    /// A status badge.
    #[must_use]
    pub fn status<T: Choice>(status: T) -> Self {
        Self {
            text: status.text().to_string(),
            badge: Some(status.value()),
        }
    }
}

/// One table row linking to its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub href: String,
    pub cells: Vec<Cell>,
}

/// Pagination state and links.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    /// 1-based index of the first row shown, 0 when empty.
    pub from: u64,
    /// 1-based index of the last row shown.
    pub to: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PaginationView {
    /// Build pagination for `page`, keeping the active search and status in
    /// every link.
    #[must_use]
    pub fn new<T>(base_path: &str, page: &Page<T>, search: &str, status: &str) -> Self {
        let shown = page.items.len() as u64;
        let from = if shown == 0 {
            0
        } else {
            u64::from(page.page.saturating_sub(1)) * u64::from(page.per_page) + 1
        };
        let link = |target: u32| page_href(base_path, target, search, status);

        Self {
            page: page.page,
            total_pages: page.total_pages(),
            total: page.total,
            from,
            to: if shown == 0 { 0 } else { from + shown - 1 },
            prev_href: page.has_prev().then(|| link(page.page - 1)),
            next_href: page.has_next().then(|| link(page.page + 1)),
        }
    }
}

/// URL of `page` with the list filters attached.
#[must_use]
pub fn page_href(base_path: &str, page: u32, search: &str, status: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &page.to_string());
    if !search.is_empty() {
        query.append_pair("search", search);
    }
    if !status.is_empty() {
        query.append_pair("status", status);
    }
    format!("{base_path}?{}", query.finish())
}

/// Everything a list page renders.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub config: DataTableConfig,
    pub rows: Vec<TableRow>,
    pub pagination: PaginationView,
    /// Active search text.
    pub search: String,
    /// Active status filter value, empty for all.
    pub status: String,
}

impl TableView {
    #[must_use]
    pub fn new(
        mut config: DataTableConfig,
        rows: Vec<TableRow>,
        pagination: PaginationView,
        search: &str,
        status: &str,
    ) -> Self {
        if let Some(filter) = config.status_filter.as_mut() {
            filter.options = FilterOption::select(std::mem::take(&mut filter.options), status);
        }
        Self {
            config,
            rows,
            pagination,
            search: search.to_string(),
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use dashdesk_core::OrderStatus;

    use super::*;

    fn page(total: u64, page: u32, shown: usize) -> Page<u8> {
        Page {
            items: vec![0; shown],
            total,
            page,
            per_page: 20,
        }
    }

    #[test]
    fn test_pagination_links_keep_filters() {
        let view = PaginationView::new("/orders", &page(45, 2, 20), "jollof rice", "pending");
        assert_eq!(view.from, 21);
        assert_eq!(view.to, 40);
        assert_eq!(view.total_pages, 3);
        assert_eq!(
            view.prev_href.as_deref(),
            Some("/orders?page=1&search=jollof+rice&status=pending")
        );
        assert_eq!(
            view.next_href.as_deref(),
            Some("/orders?page=3&search=jollof+rice&status=pending")
        );
    }

    #[test]
    fn test_pagination_empty_page() {
        let view = PaginationView::new("/orders", &page(0, 1, 0), "", "");
        assert_eq!((view.from, view.to), (0, 0));
        assert!(view.prev_href.is_none());
        assert!(view.next_href.is_none());
    }

    #[test]
    fn test_status_filter_marks_selection() {
        let config = DataTableConfig::new("orders").status_filter::<OrderStatus>("Status");
        let pagination = PaginationView::new("/orders", &page(0, 1, 0), "", "");
        let view = TableView::new(config, vec![], pagination, "", "delivered");
        let filter = view.config.status_filter.as_ref().map(|f| &f.options);
        let selected: Vec<&str> = filter
            .into_iter()
            .flatten()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["delivered"]);
    }

    #[test]
    fn test_status_cell() {
        let cell = Cell::status(OrderStatus::ReadyForPickup);
        assert_eq!(cell.text, "Ready for pickup");
        assert_eq!(cell.badge, Some("ready_for_pickup"));
        assert_eq!(Cell::optional(None::<String>).text, "—");
    }
}
