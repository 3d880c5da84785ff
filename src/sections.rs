// src/sections.rs

//! Section controllers.
//!
//! Each controller picks a subset of the catalog for one region and writes
//! the rendered fragment into the page. A controller whose region is not
//! mounted does nothing.

use std::cmp::Reverse;

use serde::Serialize;

use crate::catalog::{Book, Catalog};
use crate::config::LayoutConfig;
use crate::page::{Page, Region};
use crate::render;
use crate::search::{SearchOutcome, search};

/// Featured books first, then the rest, both in catalog order.
pub fn carousel_books(catalog: &Catalog, max: usize) -> Vec<&Book> {
    catalog
        .featured()
        .chain(catalog.books().iter().filter(|book| !book.featured))
        .take(max)
        .collect()
}

/// Newest books first; equal or missing dates keep catalog order.
pub fn recent_books(catalog: &Catalog, max: usize) -> Vec<&Book> {
    let mut books: Vec<&Book> = catalog.books().iter().collect();
    // sort_by_key is stable; None sorts after every date under Reverse
    books.sort_by_key(|book| Reverse(book.release_date));
    books.truncate(max);
    books
}

/// URL slug for a genre: lowercase, spaces become hyphens.
pub fn category_slug(genre: &str) -> String {
    genre.to_lowercase().replace(' ', "-")
}

/// One entry of the category browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub count: usize,
    pub slug: String,
}

impl CategoryEntry {
    pub fn href(&self) -> String {
        format!("categories/{}.html", self.slug)
    }
}

pub fn category_entries(catalog: &Catalog) -> Vec<CategoryEntry> {
    catalog
        .genres()
        .map(|genre| CategoryEntry {
            name: genre.name.to_string(),
            count: genre.count,
            slug: category_slug(genre.name),
        })
        .collect()
}

/// Fill the carousel region.
pub fn populate_carousel(catalog: &Catalog, layout: &LayoutConfig, page: &mut Page) -> bool {
    if !page.is_mounted(Region::Carousel) {
        return false;
    }
    let books = carousel_books(catalog, layout.carousel_max);
    page.carousel_mut().set_item_count(books.len());
    page.replace(Region::Carousel, render::render_list(&books))
}

/// Fill the recent additions grid.
pub fn populate_recent(catalog: &Catalog, layout: &LayoutConfig, page: &mut Page) -> bool {
    if !page.is_mounted(Region::RecentGrid) {
        return false;
    }
    let books = recent_books(catalog, layout.recent_max);
    page.replace(Region::RecentGrid, render::render_list(&books))
}

/// Fill the category browser.
pub fn populate_categories(catalog: &Catalog, page: &mut Page) -> bool {
    if !page.is_mounted(Region::CategoryList) {
        return false;
    }
    let html: String = catalog
        .genres()
        .map(|genre| render::render_category_item(&genre, &category_slug(genre.name)))
        .collect();
    page.replace(Region::CategoryList, html)
}

/// Fill every catalog-driven region.
pub fn populate_all(catalog: &Catalog, layout: &LayoutConfig, page: &mut Page) {
    populate_carousel(catalog, layout, page);
    populate_recent(catalog, layout, page);
    populate_categories(catalog, page);
}

/// Apply a search term to the carousel and recent regions.
///
/// A blank term restores both sections. Otherwise the carousel lists every
/// match and the recent grid the first `recent_max`; each shows its own
/// placeholder when nothing matches.
pub fn apply_search(catalog: &Catalog, layout: &LayoutConfig, page: &mut Page, term: &str) {
    match search(catalog, term) {
        SearchOutcome::Restore => {
            populate_carousel(catalog, layout, page);
            populate_recent(catalog, layout, page);
        }
        SearchOutcome::Matches(matches) => {
            log::debug!("Search {:?} matched {} books", term, matches.len());

            if page.is_mounted(Region::Carousel) {
                page.carousel_mut().set_item_count(matches.len());
                page.replace(
                    Region::Carousel,
                    render::render_results(&matches, "books", term),
                );
            }

            let recent = &matches[..matches.len().min(layout.recent_max)];
            page.replace(
                Region::RecentGrid,
                render::render_results(recent, "recent books", term),
            );
        }
    }
}

/// Put the loading indicator into every major region.
pub fn show_loading(page: &mut Page) {
    for region in Region::MAJOR {
        page.replace(region, render::render_loading());
    }
}

/// Replace every major region with one error message.
pub fn show_error(page: &mut Page, message: &str) {
    for region in Region::MAJOR {
        page.replace(region, render::render_error(message));
    }
}
