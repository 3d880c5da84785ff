// src/interaction.rs

//! Command dispatch for user gestures.
//!
//! Each gesture arrives as a `Command`. The app updates the page and hands
//! back `Effect`s for the host to perform: scrolling, navigation, alerts,
//! and deferred commands.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogLoader, CatalogSource};
use crate::config::Config;
use crate::error::Result;
use crate::page::{Direction, Page, Region};
use crate::render;
use crate::sections;
use crate::storage::{FLAG_TRUE, FlagStore, NEWSLETTER_SUBSCRIBED, NOTICE_DISMISSED};

/// Shown in every major region when the catalog cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load books. Please try again later.";

/// Why the notice banner went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Timeout,
    Closed,
}

/// A discrete user gesture or deferred action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    NavClick(usize),
    ToggleMenu,
    ScrollCarousel(Direction),
    SubmitNewsletter(String),
    DismissNotice(DismissReason),
    AddToCart(String),
    ClickBook(String),
    ClearToast(u64),
}

/// Work the host performs after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Scroll an in-page target into view
    ScrollTo { target: String, smooth: bool },
    /// Leave the page
    Navigate(String),
    /// Move the carousel container to a horizontal offset
    ScrollCarouselTo { offset: u32, smooth: bool },
    /// Blocking confirmation message
    Alert(String),
    /// Send `command` back after `after` has elapsed
    Schedule { after: Duration, command: Command },
}

/// Application context: configuration, catalog, page and flag storage.
pub struct App {
    config: Arc<Config>,
    catalog: Catalog,
    page: Page,
    flags: Arc<dyn FlagStore>,
}

impl App {
    pub fn new(config: Arc<Config>, page: Page, flags: Arc<dyn FlagStore>) -> Self {
        Self {
            config,
            catalog: Catalog::default(),
            page,
            flags,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Load the catalog, render every section, then show the notice.
    ///
    /// On failure every major region shows the load error and the error is
    /// returned. No region is left in the loading state.
    pub async fn initialize(
        &mut self,
        loader: &CatalogLoader,
        source: &CatalogSource,
    ) -> Result<Vec<Effect>> {
        sections::show_loading(&mut self.page);

        match loader.load(source, &self.config.store).await {
            Ok(catalog) => Ok(self.install(catalog).await),
            Err(e) => {
                log::error!("Error initializing app: {e}");
                sections::show_error(&mut self.page, LOAD_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    /// Render an already-loaded catalog and show the notice.
    pub async fn install(&mut self, catalog: Catalog) -> Vec<Effect> {
        self.catalog = catalog;
        sections::populate_all(&self.catalog, &self.config.layout, &mut self.page);
        self.show_notice().await.into_iter().collect()
    }

    /// Handle one command.
    pub async fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        log::debug!("Dispatching {command:?}");

        match command {
            Command::Search(term) => {
                if self.page.is_mounted(Region::SearchInput) {
                    self.page.set_search_value(&term);
                    sections::apply_search(
                        &self.catalog,
                        &self.config.layout,
                        &mut self.page,
                        &term,
                    );
                }
                Vec::new()
            }
            Command::NavClick(index) => {
                if !self.page.is_mounted(Region::NavTabs) {
                    return Vec::new();
                }
                let Some(tab) = self.page.nav_tabs().get(index).cloned() else {
                    return Vec::new();
                };
                // Only in-page tabs become active; other links leave the page
                if tab.is_anchor() {
                    self.page.activate_tab(index);
                    vec![Effect::ScrollTo {
                        target: tab.href,
                        smooth: true,
                    }]
                } else {
                    vec![Effect::Navigate(tab.href)]
                }
            }
            Command::ToggleMenu => {
                self.page.toggle_menu();
                Vec::new()
            }
            Command::ScrollCarousel(direction) => {
                if !self.page.is_mounted(Region::Carousel) {
                    return Vec::new();
                }
                let offset = self.page.carousel_mut().scroll(direction);
                vec![Effect::ScrollCarouselTo {
                    offset,
                    smooth: true,
                }]
            }
            Command::SubmitNewsletter(email) => self.submit_newsletter(&email).await,
            Command::DismissNotice(reason) => {
                self.dismiss_notice(reason).await;
                Vec::new()
            }
            Command::AddToCart(title) => self.toast(format!("\"{title}\" added to cart!")),
            Command::ClickBook(title) => self.toast(format!("You clicked on \"{title}\"")),
            Command::ClearToast(generation) => {
                self.page.clear_toast(generation);
                Vec::new()
            }
        }
    }

    /// Insert the notice banner unless it was dismissed in an earlier session.
    async fn show_notice(&mut self) -> Option<Effect> {
        if !self.page.is_mounted(Region::NoticeMount) {
            return None;
        }

        let dismissed = self
            .flags
            .is_true(NOTICE_DISMISSED)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Could not read {NOTICE_DISMISSED}: {e}");
                false
            });
        if dismissed {
            return None;
        }

        let banner = render::render_notice_banner(&self.config.notice.message);
        self.page.show_notice(banner);
        Some(Effect::Schedule {
            after: self.config.notice.delay(),
            command: Command::DismissNotice(DismissReason::Timeout),
        })
    }

    /// Remove the banner and remember it. A second dismissal is a no-op.
    async fn dismiss_notice(&mut self, reason: DismissReason) {
        if !self.page.hide_notice() {
            return;
        }
        log::debug!("Notice dismissed ({reason:?})");
        self.set_flag(NOTICE_DISMISSED).await;
    }

    async fn submit_newsletter(&mut self, email: &str) -> Vec<Effect> {
        if !self.page.is_mounted(Region::NewsletterForm) {
            return Vec::new();
        }
        self.page.set_newsletter_value(email);
        let email = email.trim();
        if email.is_empty() {
            return Vec::new();
        }

        let message = format!(
            "Thank you for subscribing with {email}! You'll receive our book recommendations soon."
        );
        self.page.set_newsletter_value("");
        self.set_flag(NEWSLETTER_SUBSCRIBED).await;
        vec![Effect::Alert(message)]
    }

    fn toast(&mut self, message: String) -> Vec<Effect> {
        let html = render::render_toast(&message);
        match self.page.show_toast(&message, html) {
            Some(generation) => vec![Effect::Schedule {
                after: self.config.notice.toast_delay(),
                command: Command::ClearToast(generation),
            }],
            None => Vec::new(),
        }
    }

    /// Best-effort flag write; failures are logged, never surfaced.
    async fn set_flag(&self, key: &str) {
        if let Err(e) = self.flags.set(key, FLAG_TRUE).await {
            log::warn!("Could not persist {key}: {e}");
        }
    }
}
