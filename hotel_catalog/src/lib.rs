// hotel_catalog/src/lib.rs

mod categories;
mod error;
mod loader;

pub use crate::categories::CategoryLookup;
pub use crate::error::{CatalogError, CategoryError};
pub use crate::loader::{
    load_catalog, parse_csv, parse_json_str, resolve_catalog_file, IDENTIFIER_COLUMN,
};
