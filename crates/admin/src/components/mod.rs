//! Reusable view components shared by the resource pages.

pub mod data_table;
pub mod form;

pub use data_table::{
    Cell, DataTableConfig, FilterOption, PaginationView, TableColumn, TableRow, TableView,
};
pub use form::{FieldKind, FormField, FormParser, FormValues};
