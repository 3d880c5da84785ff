// src/inventory.rs

//! Offline catalog maintenance.
//!
//! `update_inventory` brings a master inventory export into the catalog
//! format; `category_pages` renders one static page per genre.

use std::path::Path;

use crate::affiliate::AffiliateNormalizer;
use crate::catalog::{Catalog, Record, parse_records, to_delimited};
use crate::error::Result;
use crate::render::{self, html_escape};
use crate::sections::category_slug;

/// Columns every catalog row carries after an update.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "book_id",
    "title",
    "author",
    "publisher",
    "genre",
    "price",
    "image_url",
    "description",
    "affiliate_link",
    "featured",
    "tags",
    "release_date",
    "rating",
];

/// Raw marketplace product link in master inventory exports.
pub const MARKETPLACE_URL_COLUMN: &str = "amazon_url";

/// Derive tracked links and fill in missing columns, in place.
///
/// Rows with a `amazon_url` column get `affiliate_link` rebuilt from it.
/// Returns how many links were derived.
pub fn update_inventory(records: &mut [Record], normalizer: &AffiliateNormalizer) -> usize {
    let mut derived = 0;

    for record in records.iter_mut() {
        if let Some(url) = record.get(MARKETPLACE_URL_COLUMN).map(str::to_string) {
            record.set("affiliate_link", normalizer.normalize(&url));
            derived += 1;
        }

        for column in REQUIRED_COLUMNS {
            if !record.contains(column) {
                record.set(column, "");
            }
        }
    }

    derived
}

/// Read `input`, update it and write the result to `output`.
pub async fn update_file(
    input: &Path,
    output: &Path,
    delimiter: char,
    normalizer: &AffiliateNormalizer,
) -> Result<usize> {
    let text = tokio::fs::read_to_string(input).await?;
    let mut records = parse_records(&text, delimiter)?;
    let derived = update_inventory(&mut records, normalizer);

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, to_delimited(&records, delimiter)).await?;

    log::info!(
        "Updated {} with {} books ({} links derived)",
        output.display(),
        records.len(),
        derived
    );
    Ok(records.len())
}

/// A rendered static page for one genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub genre: String,
    pub file_name: String,
    pub count: usize,
    pub html: String,
}

/// One page per named genre, in genre first-appearance order.
pub fn category_pages(catalog: &Catalog) -> Vec<CategoryPage> {
    catalog
        .genres()
        .filter(|genre| !genre.name.is_empty())
        .map(|genre| {
            let books = catalog.genre(genre.name);
            CategoryPage {
                genre: genre.name.to_string(),
                file_name: format!("{}.html", category_slug(genre.name)),
                count: books.len(),
                html: category_document(genre.name, &render::render_list(&books), books.len()),
            }
        })
        .collect()
}

/// Write every category page into `dir`. Returns the number written.
pub async fn write_category_pages(catalog: &Catalog, dir: &Path) -> Result<usize> {
    tokio::fs::create_dir_all(dir).await?;

    let pages = category_pages(catalog);
    for page in &pages {
        tokio::fs::write(dir.join(&page.file_name), &page.html).await?;
        log::info!(
            "Generated category page for {} with {} books",
            page.genre,
            page.count
        );
    }
    Ok(pages.len())
}

fn category_document(genre: &str, grid: &str, count: usize) -> String {
    let genre = html_escape(genre);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{genre} Books - BookShelf</title>
    <meta name="description" content="Browse our collection of {genre} books at BookShelf. Find bestsellers and hidden gems.">
    <link rel="stylesheet" href="../style.css">
</head>
<body>
    <div class="app-container">
        <main class="main-content">
            <header class="category-header">
                <h1>{genre} Books</h1>
                <p>Discover our collection of {count} {genre} books</p>
            </header>
            <div class="book-grid">
{grid}            </div>
        </main>
    </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use scraper::{Html, Selector};
    use tempfile::TempDir;

    fn normalizer() -> AffiliateNormalizer {
        AffiliateNormalizer::from_config(&StoreConfig::default())
    }

    #[test]
    fn test_derives_links_and_fills_columns() {
        let mut records = parse_records(
            "title,author,amazon_url\n\
             Dune,Frank Herbert,https://www.amazon.com/dp/1?tag=old-20&ref=x\n\
             Emma,Jane Austen,\n",
            ',',
        )
        .unwrap();

        assert_eq!(update_inventory(&mut records, &normalizer()), 2);
        assert_eq!(
            records[0].get("affiliate_link"),
            Some("https://www.amazon.com/dp/1?tag=youraffiliateID-20&ref=x")
        );
        assert_eq!(records[1].get("affiliate_link"), Some(""));
        for column in REQUIRED_COLUMNS {
            assert!(records[1].contains(column), "missing {column}");
        }
        assert_eq!(records[0].get("title"), Some("Dune"));
    }

    #[test]
    fn test_existing_links_kept_without_source_column() {
        let mut records =
            parse_records("title,author,affiliate_link\nDune,Frank,https://x.org/d\n", ',')
                .unwrap();
        assert_eq!(update_inventory(&mut records, &normalizer()), 0);
        assert_eq!(records[0].get("affiliate_link"), Some("https://x.org/d"));
    }

    #[test]
    fn test_category_pages() {
        let records = parse_records(
            "title,author,genre\n\
             Dune,Frank Herbert,Science Fiction\n\
             Emma,Jane Austen,Classic\n\
             Hyperion,Dan Simmons,Science Fiction\n",
            ',',
        )
        .unwrap();
        let catalog = Catalog::load(&records, &StoreConfig::default());
        let pages = category_pages(&catalog);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].file_name, "science-fiction.html");
        assert_eq!(pages[0].count, 2);

        let doc = Html::parse_document(&pages[0].html);
        let title = Selector::parse("title").unwrap();
        assert_eq!(
            doc.select(&title).next().unwrap().inner_html(),
            "Science Fiction Books - BookShelf"
        );
        let items = Selector::parse(".book-grid .book-item h3").unwrap();
        let titles: Vec<String> = doc.select(&items).map(|e| e.inner_html()).collect();
        assert_eq!(titles, vec!["Dune", "Hyperion"]);
        assert!(pages[0].html.contains("Discover our collection of 2 Science Fiction books"));
    }

    #[tokio::test]
    async fn test_update_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("master.csv");
        let output = tmp.path().join("out/books.csv");
        std::fs::write(
            &input,
            "title,author,amazon_url\nDune,Frank Herbert,https://amazon.com/dp/1\n",
        )
        .unwrap();

        assert_eq!(update_file(&input, &output, ',', &normalizer()).await.unwrap(), 1);

        let written = std::fs::read_to_string(&output).unwrap();
        let records = parse_records(&written, ',').unwrap();
        assert_eq!(
            records[0].get("affiliate_link"),
            Some("https://amazon.com/dp/1?tag=youraffiliateID-20")
        );
        assert_eq!(records[0].get("rating"), Some(""));
    }

    #[tokio::test]
    async fn test_write_category_pages() {
        let tmp = TempDir::new().unwrap();
        let records = parse_records("title,author,genre\nDune,Frank,SciFi\n", ',').unwrap();
        let catalog = Catalog::load(&records, &StoreConfig::default());

        let dir = tmp.path().join("categories");
        assert_eq!(write_category_pages(&catalog, &dir).await.unwrap(), 1);
        assert!(dir.join("scifi.html").exists());
    }
}
