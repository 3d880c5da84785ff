// src/catalog/mod.rs

//! Catalog ingestion: delimited records, typed books, and the store.

mod book;
mod record;
mod source;
mod store;

pub use book::{Book, parse_date, parse_flag};
pub use record::{Record, parse_records, to_delimited};
pub use source::{CatalogLoader, CatalogSource, EMBEDDED_CATALOG};
pub use store::{Catalog, GenreSummary};
