pub mod error;
pub mod fields;
pub mod filter;
pub mod listing;
pub mod pagination;

pub use error::QueryError;
pub use filter::{col, Column, ColumnKind};
pub use listing::{list, ListResponse, ListSpec, Relation};
pub use pagination::{PageParams, PageRef, Pagination};
