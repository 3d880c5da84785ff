// src/page.rs

//! In-memory page model.
//!
//! A page is a set of mounted regions, each holding an HTML fragment, plus
//! the small amount of UI state the handlers flip. Regions that are not
//! mounted are never written to, which lets partial pages (a category page
//! without a carousel) share the same controllers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::LayoutConfig;
use crate::error::AppError;

/// Named insertion points on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Carousel,
    RecentGrid,
    CategoryList,
    SearchInput,
    NavTabs,
    MenuToggle,
    SidePanel,
    NewsletterForm,
    NoticeMount,
    ToastMount,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Carousel,
        Region::RecentGrid,
        Region::CategoryList,
        Region::SearchInput,
        Region::NavTabs,
        Region::MenuToggle,
        Region::SidePanel,
        Region::NewsletterForm,
        Region::NoticeMount,
        Region::ToastMount,
    ];

    /// Regions that show the load error when initialization fails.
    pub const MAJOR: [Region; 3] = [Region::Carousel, Region::RecentGrid, Region::CategoryList];

    /// Selector of the matching element in the page markup.
    pub fn selector(self) -> &'static str {
        match self {
            Region::Carousel => ".book-carousel",
            Region::RecentGrid => "#recent .book-grid",
            Region::CategoryList => ".category-list",
            Region::SearchInput => ".search-bar input",
            Region::NavTabs => ".nav-items",
            Region::MenuToggle => ".menu-toggle",
            Region::SidePanel => ".sidebar",
            Region::NewsletterForm => ".newsletter-form",
            Region::NoticeMount => "#affiliate-notice",
            Region::ToastMount => "#notification",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Carousel => "carousel",
            Region::RecentGrid => "recent",
            Region::CategoryList => "categories",
            Region::SearchInput => "search",
            Region::NavTabs => "nav",
            Region::MenuToggle => "menu-toggle",
            Region::SidePanel => "sidebar",
            Region::NewsletterForm => "newsletter",
            Region::NoticeMount => "notice",
            Region::ToastMount => "toast",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.name() == s)
            .ok_or_else(|| AppError::config(format!("unknown region '{s}'")))
    }
}

/// One navigation tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTab {
    pub label: String,
    pub href: String,
}

impl NavTab {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }

    /// Whether the tab targets a region of the current page.
    pub fn is_anchor(&self) -> bool {
        self.href.starts_with('#')
    }
}

/// Carousel scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Horizontal scroll state of the carousel container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselViewport {
    item_width: u32,
    gutter: u32,
    scroll_items: u32,
    viewport_width: u32,
    item_count: usize,
    offset: u32,
}

impl CarouselViewport {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            item_width: layout.item_width,
            gutter: layout.gutter,
            scroll_items: layout.scroll_items,
            viewport_width: layout.viewport_width,
            item_count: 0,
            offset: 0,
        }
    }

    /// Reset for new content; the container scrolls back to the start.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.offset = 0;
    }

    /// Distance moved by one prev/next click.
    pub fn step(&self) -> u32 {
        self.scroll_items * (self.item_width + self.gutter)
    }

    pub fn content_width(&self) -> u32 {
        let count = u32::try_from(self.item_count).unwrap_or(u32::MAX);
        count.saturating_mul(self.item_width + self.gutter)
    }

    pub fn max_offset(&self) -> u32 {
        self.content_width().saturating_sub(self.viewport_width)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Scroll one step, clamped to the container bounds. Returns the new offset.
    pub fn scroll(&mut self, direction: Direction) -> u32 {
        self.offset = match direction {
            Direction::Prev => self.offset.saturating_sub(self.step()),
            Direction::Next => self.offset.saturating_add(self.step()).min(self.max_offset()),
        };
        self.offset
    }
}

/// A transient notification and the generation that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub generation: u64,
}

/// The page and its UI state.
#[derive(Debug, Clone)]
pub struct Page {
    regions: BTreeMap<Region, String>,
    nav_tabs: Vec<NavTab>,
    active_tab: Option<usize>,
    menu_expanded: bool,
    search_value: String,
    newsletter_value: String,
    carousel: CarouselViewport,
    notice_visible: bool,
    toast: Option<Toast>,
    toast_generation: u64,
}

impl Page {
    /// A page with the given regions mounted and empty.
    pub fn new(layout: &LayoutConfig, regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions.into_iter().map(|r| (r, String::new())).collect(),
            nav_tabs: Vec::new(),
            active_tab: None,
            menu_expanded: false,
            search_value: String::new(),
            newsletter_value: String::new(),
            carousel: CarouselViewport::from_layout(layout),
            notice_visible: false,
            toast: None,
            toast_generation: 0,
        }
    }

    /// The storefront home page with every region and the default tabs.
    pub fn storefront(layout: &LayoutConfig) -> Self {
        Self::new(layout, Region::ALL).with_nav_tabs(default_tabs())
    }

    /// A category page: no carousel, recent grid or newsletter form.
    pub fn category(layout: &LayoutConfig) -> Self {
        Self::new(
            layout,
            [
                Region::CategoryList,
                Region::SearchInput,
                Region::NavTabs,
                Region::MenuToggle,
                Region::SidePanel,
                Region::NoticeMount,
                Region::ToastMount,
            ],
        )
        .with_nav_tabs(default_tabs())
    }

    pub fn with_nav_tabs(mut self, tabs: Vec<NavTab>) -> Self {
        self.active_tab = if tabs.is_empty() { None } else { Some(0) };
        self.nav_tabs = tabs;
        self
    }

    pub fn is_mounted(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    pub fn content(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// Replace a region's content. No-op (returns false) when not mounted.
    pub fn replace(&mut self, region: Region, html: String) -> bool {
        match self.regions.get_mut(&region) {
            Some(slot) => {
                *slot = html;
                true
            }
            None => false,
        }
    }

    /// Mounted regions with their content, in a stable order.
    pub fn regions(&self) -> impl Iterator<Item = (Region, &str)> {
        self.regions.iter().map(|(r, html)| (*r, html.as_str()))
    }

    pub fn nav_tabs(&self) -> &[NavTab] {
        &self.nav_tabs
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.active_tab
    }

    /// Mark a tab active, clearing every other tab.
    pub fn activate_tab(&mut self, index: usize) -> Option<&NavTab> {
        if !self.is_mounted(Region::NavTabs) {
            return None;
        }
        let tab = self.nav_tabs.get(index)?;
        self.active_tab = Some(index);
        Some(tab)
    }

    pub fn menu_expanded(&self) -> bool {
        self.menu_expanded
    }

    /// Flip the side panel. Needs both the toggle and the panel mounted.
    pub fn toggle_menu(&mut self) -> Option<bool> {
        if !self.is_mounted(Region::MenuToggle) || !self.is_mounted(Region::SidePanel) {
            return None;
        }
        self.menu_expanded = !self.menu_expanded;
        Some(self.menu_expanded)
    }

    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    pub fn set_search_value(&mut self, value: &str) {
        self.search_value = value.to_string();
    }

    pub fn newsletter_value(&self) -> &str {
        &self.newsletter_value
    }

    pub fn set_newsletter_value(&mut self, value: &str) {
        self.newsletter_value = value.to_string();
    }

    pub fn carousel(&self) -> &CarouselViewport {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut CarouselViewport {
        &mut self.carousel
    }

    pub fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    /// Insert the notice banner. Returns false when there is no mount point.
    pub fn show_notice(&mut self, html: String) -> bool {
        self.notice_visible = self.replace(Region::NoticeMount, html);
        self.notice_visible
    }

    /// Remove the notice banner. Returns false if it was not showing.
    pub fn hide_notice(&mut self) -> bool {
        if !self.notice_visible {
            return false;
        }
        self.notice_visible = false;
        self.replace(Region::NoticeMount, String::new());
        true
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Show a toast, replacing any current one. Returns its generation.
    pub fn show_toast(&mut self, message: &str, html: String) -> Option<u64> {
        if !self.replace(Region::ToastMount, html) {
            return None;
        }
        self.toast_generation += 1;
        self.toast = Some(Toast {
            message: message.to_string(),
            generation: self.toast_generation,
        });
        Some(self.toast_generation)
    }

    /// Clear the toast if it is still the one from `generation`.
    pub fn clear_toast(&mut self, generation: u64) -> bool {
        match &self.toast {
            Some(toast) if toast.generation == generation => {
                self.toast = None;
                self.replace(Region::ToastMount, String::new());
                true
            }
            _ => false,
        }
    }
}

fn default_tabs() -> Vec<NavTab> {
    vec![
        NavTab::new("Discover", "#discover"),
        NavTab::new("Recent", "#recent"),
        NavTab::new("Categories", "#categories"),
        NavTab::new("Blog", "blog.html"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn test_unmounted_region_is_noop() {
        let mut page = Page::category(&layout());
        assert!(!page.replace(Region::Carousel, "x".into()));
        assert_eq!(page.content(Region::Carousel), None);
        assert!(page.replace(Region::CategoryList, "y".into()));
        assert_eq!(page.content(Region::CategoryList), Some("y"));
    }

    #[test]
    fn test_single_active_tab() {
        let mut page = Page::storefront(&layout());
        assert_eq!(page.active_tab(), Some(0));
        assert_eq!(page.activate_tab(2).map(|t| t.href.clone()), Some("#categories".into()));
        assert_eq!(page.active_tab(), Some(2));
        assert!(page.activate_tab(9).is_none());
        assert_eq!(page.active_tab(), Some(2));
    }

    #[test]
    fn test_menu_toggle() {
        let mut page = Page::storefront(&layout());
        assert_eq!(page.toggle_menu(), Some(true));
        assert_eq!(page.toggle_menu(), Some(false));

        let mut bare = Page::new(&layout(), [Region::MenuToggle]);
        assert_eq!(bare.toggle_menu(), None);
        assert!(!bare.menu_expanded());
    }

    #[test]
    fn test_carousel_scroll_clamped() {
        let mut viewport = CarouselViewport::from_layout(&layout());
        viewport.set_item_count(12);
        // 12 * 160 = 1920 wide, 960 visible
        assert_eq!(viewport.step(), 480);
        assert_eq!(viewport.max_offset(), 960);
        assert_eq!(viewport.scroll(Direction::Prev), 0);
        assert_eq!(viewport.scroll(Direction::Next), 480);
        assert_eq!(viewport.scroll(Direction::Next), 960);
        assert_eq!(viewport.scroll(Direction::Next), 960);
        assert_eq!(viewport.scroll(Direction::Prev), 480);
    }

    #[test]
    fn test_carousel_narrower_than_viewport() {
        let mut viewport = CarouselViewport::from_layout(&layout());
        viewport.set_item_count(3);
        assert_eq!(viewport.scroll(Direction::Next), 0);
    }

    #[test]
    fn test_notice_hide_once() {
        let mut page = Page::storefront(&layout());
        assert!(page.show_notice("<div>n</div>".into()));
        assert!(page.hide_notice());
        assert!(!page.hide_notice());
        assert_eq!(page.content(Region::NoticeMount), Some(""));
    }

    #[test]
    fn test_stale_toast_clear_ignored() {
        let mut page = Page::storefront(&layout());
        let first = page.show_toast("a", "<div>a</div>".into()).unwrap();
        let second = page.show_toast("b", "<div>b</div>".into()).unwrap();
        assert!(!page.clear_toast(first));
        assert_eq!(page.toast().map(|t| t.message.as_str()), Some("b"));
        assert!(page.clear_toast(second));
        assert!(page.toast().is_none());
    }

    #[test]
    fn test_region_names_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.name().parse::<Region>().unwrap(), region);
        }
        assert!("nowhere".parse::<Region>().is_err());
    }
}
