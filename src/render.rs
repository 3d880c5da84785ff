// src/render.rs

//! HTML fragments for books and page furniture.
//!
//! Every function is pure: output depends only on its arguments, and every
//! interpolated value is escaped.

use crate::catalog::{Book, GenreSummary};

const MAX_STARS: usize = 5;

/// Card used in the carousel, grids and search results.
pub fn render_book(book: &Book) -> String {
    let class = if book.featured {
        "book-item featured"
    } else {
        "book-item"
    };

    format!(
        r#"<div class="{class}">
    <a href="{link}" class="book-link" target="_blank" rel="nofollow noopener">
        <div class="book-cover">
            <img src="{image}" alt="{title}" loading="lazy" />
            <div class="book-overlay"><span class="buy-now">Buy Now</span></div>
        </div>
        <h3>{title}</h3>
        <p class="publisher">{author}</p>
        <span class="price">{price}</span>
    </a>
</div>
"#,
        link = html_escape(&book.affiliate_link),
        image = html_escape(&book.image_url),
        title = html_escape(&book.title),
        author = html_escape(&book.author),
        price = html_escape(&book.price),
    )
}

/// Cards for each book, in order.
pub fn render_list(books: &[&Book]) -> String {
    books.iter().map(|book| render_book(book)).collect()
}

/// Cards for search matches, or a placeholder naming the term.
///
/// `subject` completes the sentence "No {subject} found matching ...".
pub fn render_results(books: &[&Book], subject: &str, term: &str) -> String {
    if books.is_empty() {
        render_no_results(subject, term)
    } else {
        render_list(books)
    }
}

pub fn render_no_results(subject: &str, term: &str) -> String {
    format!(
        "<p class=\"no-results\">No {} found matching \"{}\"</p>\n",
        html_escape(subject),
        html_escape(term)
    )
}

/// Large card with rating, description, and the cosmetic cart button.
pub fn render_featured_book(book: &Book) -> String {
    let stars = book
        .extra
        .get("rating")
        .and_then(|r| r.trim().parse::<f32>().ok())
        .map_or(MAX_STARS, |r| r.round().clamp(0.0, MAX_STARS as f32) as usize);
    let star_icons = "<i class=\"fas fa-star\"></i>".repeat(stars);

    let description = book
        .description
        .as_deref()
        .map(|d| format!("\n    <p class=\"description\">{}</p>", html_escape(d)))
        .unwrap_or_default();

    let original_price = book
        .original_price
        .as_deref()
        .map(|p| format!("<span class=\"original-price\">{}</span>", html_escape(p)))
        .unwrap_or_default();

    format!(
        r#"<div class="featured-book">
    <img src="{image}" alt="{title}" />
    <h3>{title}</h3>
    <p class="author">by: {author}</p>
    <div class="rating">{star_icons}</div>{description}
    <div class="price"><span class="current-price">{price}</span>{original_price}</div>
    <button class="add-to-cart" data-title="{title}">Add to Cart</button>
</div>
"#,
        image = html_escape(&book.image_url),
        title = html_escape(&book.title),
        author = html_escape(&book.author),
        price = html_escape(&book.price),
    )
}

/// One entry of the category browser.
pub fn render_category_item(genre: &GenreSummary<'_>, slug: &str) -> String {
    format!(
        r#"<a href="categories/{slug}.html" class="category-item">
    <span class="category-name">{name}</span>
    <span class="category-count">{count}</span>
</a>
"#,
        slug = html_escape(slug),
        name = html_escape(genre.name),
        count = genre.count,
    )
}

pub fn render_loading() -> String {
    "<div class=\"loading-indicator\">Loading...</div>\n".to_string()
}

pub fn render_error(message: &str) -> String {
    format!("<div class=\"error-message\">{}</div>\n", html_escape(message))
}

pub fn render_notice_banner(message: &str) -> String {
    format!(
        r#"<div class="affiliate-notification">
    <p>{}</p>
    <button class="close-notification">✕</button>
</div>
"#,
        html_escape(message)
    )
}

pub fn render_toast(message: &str) -> String {
    format!("<div class=\"notification\">{}</div>\n", html_escape(message))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
