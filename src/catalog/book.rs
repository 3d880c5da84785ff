// src/catalog/book.rs

//! Typed book model.
//!
//! Records are string maps. A `Book` resolves the boolean and date fields
//! once at ingestion so later comparisons never re-parse strings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::Record;

/// Field names with a dedicated slot on `Book`.
const KNOWN_FIELDS: &[&str] = &[
    "title",
    "author",
    "price",
    "original_price",
    "genre",
    "category",
    "image_url",
    "image",
    "affiliate_link",
    "tags",
    "description",
    "release_date",
    "featured",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,

    /// Display price, e.g. "€40.00"
    pub price: String,

    /// Pre-discount display price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,

    pub genre: String,
    pub image_url: String,
    pub affiliate_link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,

    #[serde(default)]
    pub featured: bool,

    /// Remaining fields from the source row, by header name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Book {
    /// Build a book from a parsed record.
    ///
    /// Returns `None` when the record has no title or no author; such rows
    /// cannot be displayed. `genre` falls back to a `category` column and
    /// `image_url` to an `image` column.
    pub fn from_record(record: &Record) -> Option<Self> {
        let title = record.non_blank("title")?.trim().to_string();
        let author = record.non_blank("author")?.trim().to_string();

        let text = |name: &str| record.get(name).unwrap_or("").trim().to_string();
        let optional = |name: &str| record.non_blank(name).map(|v| v.trim().to_string());

        let genre = optional("genre")
            .or_else(|| optional("category"))
            .unwrap_or_default();
        let image_url = optional("image_url")
            .or_else(|| optional("image"))
            .unwrap_or_default();

        let extra = record
            .fields()
            .filter(|(name, _)| !KNOWN_FIELDS.contains(name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Some(Self {
            title,
            author,
            price: text("price"),
            original_price: optional("original_price"),
            genre,
            image_url,
            affiliate_link: text("affiliate_link"),
            tags: optional("tags"),
            description: optional("description"),
            release_date: record.get("release_date").and_then(parse_date),
            featured: record.get("featured").map(parse_flag).unwrap_or(false),
            extra,
        })
    }

    /// Whether any searchable field contains the lowercased needle.
    pub fn matches(&self, needle_lower: &str) -> bool {
        [
            Some(self.title.as_str()),
            Some(self.author.as_str()),
            Some(self.genre.as_str()),
            self.tags.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Catalog flags are literal strings; only "true" counts.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}

/// Parse a release date, accepting a date prefix of longer timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            value
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_from_record_full() {
        let book = Book::from_record(&record(&[
            ("book_id", "42"),
            ("title", " Dune "),
            ("author", "Frank Herbert"),
            ("genre", "SciFi"),
            ("price", "$10"),
            ("featured", "true"),
            ("release_date", "1965-08-01"),
            ("tags", "desert, spice"),
        ]))
        .unwrap();

        assert_eq!(book.title, "Dune");
        assert!(book.featured);
        assert_eq!(book.release_date, NaiveDate::from_ymd_opt(1965, 8, 1));
        assert_eq!(book.tags.as_deref(), Some("desert, spice"));
        assert_eq!(book.extra.get("book_id").map(String::as_str), Some("42"));
        assert!(!book.extra.contains_key("title"));
    }

    #[test]
    fn test_missing_author_rejected() {
        assert!(Book::from_record(&record(&[("title", "Dune"), ("author", " ")])).is_none());
        assert!(Book::from_record(&record(&[("author", "Frank Herbert")])).is_none());
    }

    #[test]
    fn test_featured_is_literal_true() {
        for (raw, expected) in [("true", true), ("True", false), ("1", false), ("", false)] {
            assert_eq!(parse_flag(raw), expected, "flag {raw:?}");
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 5);
        assert_eq!(parse_date("2023-04-05"), expected);
        assert_eq!(parse_date("2023/04/05"), expected);
        assert_eq!(parse_date("04/05/2023"), expected);
        assert_eq!(parse_date("2023-04-05T10:00:00Z"), expected);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_category_and_image_fallbacks() {
        let book = Book::from_record(&record(&[
            ("title", "NANI"),
            ("author", "G. Blakemore Evans"),
            ("category", "Fashion"),
            ("image", "/api/placeholder/180/270"),
        ]))
        .unwrap();
        assert_eq!(book.genre, "Fashion");
        assert_eq!(book.image_url, "/api/placeholder/180/270");
    }

    #[test]
    fn test_matches_fields() {
        let book = Book::from_record(&record(&[
            ("title", "Emma"),
            ("author", "Jane Austen"),
            ("genre", "Classic"),
            ("tags", "regency"),
        ]))
        .unwrap();
        assert!(book.matches("jane"));
        assert!(book.matches("class"));
        assert!(book.matches("regen"));
        assert!(!book.matches("dune"));
    }
}
