// src/catalog/store.rs

//! In-memory catalog with its featured and per-genre views.

use std::collections::HashMap;

use serde::Serialize;

use crate::affiliate::AffiliateNormalizer;
use crate::config::StoreConfig;

use super::book::Book;
use super::record::Record;

/// Books grouped by genre, genres kept in first-appearance order.
#[derive(Debug, Clone, Default)]
struct GenreIndex {
    positions: HashMap<String, usize>,
    groups: Vec<(String, Vec<usize>)>,
}

impl GenreIndex {
    fn insert(&mut self, genre: &str, book_index: usize) {
        match self.positions.get(genre) {
            Some(&slot) => self.groups[slot].1.push(book_index),
            None => {
                self.positions.insert(genre.to_string(), self.groups.len());
                self.groups.push((genre.to_string(), vec![book_index]));
            }
        }
    }

    fn get(&self, genre: &str) -> Option<&[usize]> {
        self.positions
            .get(genre)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Summary of one genre for the category browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreSummary<'a> {
    pub name: &'a str,
    pub count: usize,
}

/// The loaded catalog.
///
/// All views are derived from `books` and rebuilt together by `load`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
    featured: Vec<usize>,
    genres: GenreIndex,
}

impl Catalog {
    /// Build a catalog from parsed records.
    ///
    /// Affiliate links are normalized and blank images replaced with the
    /// placeholder; rows without a title or author are skipped.
    pub fn load(records: &[Record], config: &StoreConfig) -> Self {
        let normalizer = AffiliateNormalizer::from_config(config);
        let mut books = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            match Book::from_record(record) {
                Some(book) => books.push(book),
                // Header is line 1, so data row `row` sits on line row + 2
                None => log::warn!("Skipping catalog row {}: missing title or author", row + 2),
            }
        }

        Self::from_books(books, &normalizer, &config.placeholder_image)
    }

    /// Build a catalog from already-typed books.
    pub fn from_books(
        mut books: Vec<Book>,
        normalizer: &AffiliateNormalizer,
        placeholder_image: &str,
    ) -> Self {
        for book in &mut books {
            book.affiliate_link = normalizer.normalize(&book.affiliate_link);
            if book.image_url.trim().is_empty() {
                book.image_url = placeholder_image.to_string();
            }
        }

        let featured = books
            .iter()
            .enumerate()
            .filter(|(_, book)| book.featured)
            .map(|(i, _)| i)
            .collect();

        let mut genres = GenreIndex::default();
        for (i, book) in books.iter().enumerate() {
            genres.insert(&book.genre, i);
        }

        log::debug!(
            "Catalog loaded: {} books, {} genres",
            books.len(),
            genres.len()
        );

        Self {
            books,
            featured,
            genres,
        }
    }

    /// Every book in catalog order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Featured books in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Book> {
        self.featured.iter().map(|&i| &self.books[i])
    }

    pub fn featured_count(&self) -> usize {
        self.featured.len()
    }

    /// Books of one genre in catalog order.
    pub fn genre(&self, name: &str) -> Vec<&Book> {
        self.genres
            .get(name)
            .map(|indices| indices.iter().map(|&i| &self.books[i]).collect())
            .unwrap_or_default()
    }

    /// Genre names and counts in first-appearance order.
    pub fn genres(&self) -> impl Iterator<Item = GenreSummary<'_>> {
        self.genres.groups.iter().map(|(name, indices)| GenreSummary {
            name,
            count: indices.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::parse_records;

    const CSV: &str = "title,author,genre,price,featured,affiliate_link,image_url\n\
        Dune,Frank Herbert,SciFi,$10,true,https://amazon.com/dp/1,\n\
        Emma,Jane Austen,Classic,$8,false,https://amazon.com/dp/2?tag=old-20,/img/emma.jpg\n\
        Hyperion,Dan Simmons,SciFi,$9,true,https://bookshop.org/h,\n\
        ,Nobody,SciFi,$1,false,,\n";

    fn config() -> StoreConfig {
        StoreConfig {
            tracking_id: "abc-20".into(),
            ..StoreConfig::default()
        }
    }

    fn catalog() -> Catalog {
        Catalog::load(&parse_records(CSV, ',').unwrap(), &config())
    }

    #[test]
    fn test_load_skips_untitled() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.books()[2].title, "Hyperion");
    }

    #[test]
    fn test_links_normalized_on_load() {
        let catalog = catalog();
        assert_eq!(
            catalog.books()[0].affiliate_link,
            "https://amazon.com/dp/1?tag=abc-20"
        );
        assert_eq!(
            catalog.books()[1].affiliate_link,
            "https://amazon.com/dp/2?tag=abc-20"
        );
        assert_eq!(catalog.books()[2].affiliate_link, "https://bookshop.org/h");
    }

    #[test]
    fn test_placeholder_image() {
        let catalog = catalog();
        assert_eq!(catalog.books()[0].image_url, "/api/placeholder/150/220");
        assert_eq!(catalog.books()[1].image_url, "/img/emma.jpg");
    }

    #[test]
    fn test_featured_view_keeps_order() {
        let catalog = catalog();
        let titles: Vec<_> = catalog.featured().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Hyperion"]);
    }

    #[test]
    fn test_genre_grouping() {
        let catalog = catalog();
        let genres: Vec<_> = catalog.genres().collect();
        assert_eq!(
            genres,
            vec![
                GenreSummary { name: "SciFi", count: 2 },
                GenreSummary { name: "Classic", count: 1 },
            ]
        );
        let scifi: Vec<_> = catalog.genre("SciFi").iter().map(|b| b.title.clone()).collect();
        assert_eq!(scifi, vec!["Dune", "Hyperion"]);
        assert!(catalog.genre("Poetry").is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::load(&[], &config());
        assert!(catalog.is_empty());
        assert_eq!(catalog.featured_count(), 0);
        assert_eq!(catalog.genres().count(), 0);
    }
}
