// src/search.rs

//! Search-as-you-type filtering over the catalog.

use crate::catalog::{Book, Catalog};

/// What a search term asks the page to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Blank term: put the unfiltered sections back.
    Restore,
    /// Books matching the term, in catalog order.
    Matches(Vec<&'a Book>),
}

/// Resolve a search term against the catalog.
pub fn search<'a>(catalog: &'a Catalog, term: &str) -> SearchOutcome<'a> {
    if term.trim().is_empty() {
        SearchOutcome::Restore
    } else {
        SearchOutcome::Matches(filter(catalog, term))
    }
}

/// Books whose title, author, genre or tags contain `term`, ignoring case.
pub fn filter<'a>(catalog: &'a Catalog, term: &str) -> Vec<&'a Book> {
    let needle = term.to_lowercase();
    catalog
        .books()
        .iter()
        .filter(|book| book.matches(&needle))
        .collect()
}
