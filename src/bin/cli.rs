//! BookShelf CLI
//!
//! Local entry point: render the storefront, search the catalog, drive the
//! interaction layer from stdin, and maintain the inventory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bookshelf::{
    affiliate::AffiliateNormalizer,
    catalog::{Catalog, CatalogLoader, CatalogSource},
    config::Config,
    error::{AppError, Result},
    interaction::{App, Command as Gesture, DismissReason, Effect},
    inventory,
    page::{Direction, Page},
    render,
    search::{SearchOutcome, search},
    session::Session,
    storage::LocalFlagStore,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

/// BookShelf - affiliate bookshop storefront
#[derive(Parser, Debug)]
#[command(name = "bookshelf", version, about = "Affiliate bookshop storefront")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "bookshelf.toml")]
    config: PathBuf,

    /// Catalog location: a path, an http(s) URL, or `embedded`
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and print (or write) every page region
    Render {
        /// Write one file per region into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print books matching a search term
    Search {
        term: String,

        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read gestures from stdin and print the resulting effects
    Interact,

    /// Rebuild a catalog file from a master inventory export
    Inventory {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate one static page per genre
    Categories {
        #[arg(short, long, default_value = "categories")]
        output: PathBuf,
    },

    /// Validate the configuration and the catalog
    Validate,
}

/// Initialize logging; `--verbose` wins over the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(cli.verbose, &config.logging.level);

    if cli.config.exists() {
        log::info!("Loaded configuration from {}", cli.config.display());
    } else {
        log::debug!("No config at {}, using defaults", cli.config.display());
    }

    let config = Arc::new(config);
    let location = cli.source.as_deref().unwrap_or(&config.catalog.path);
    let source = CatalogSource::from_location(location)?;
    let loader = CatalogLoader::new(&config.catalog)?;

    match cli.command {
        Command::Render { output } => {
            let (session, _deferred) = new_session(&config);
            render_storefront(session, &loader, &source, output.as_deref()).await?;
        }

        Command::Search { term, json } => {
            let catalog = loader.load(&source, &config.store).await?;
            let books = match search(&catalog, &term) {
                SearchOutcome::Restore => catalog.books().iter().collect(),
                SearchOutcome::Matches(books) => books,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&books)?);
            } else if books.is_empty() {
                println!("No books found matching \"{term}\"");
            } else {
                for book in books {
                    println!("{} - {} ({})", book.title, book.author, book.price);
                }
            }
        }

        Command::Interact => {
            let (mut session, deferred) = new_session(&config);
            match session.initialize(&loader, &source).await {
                Ok(effects) => print_effects(&effects),
                Err(e) if e.is_load_error() => log::error!("Continuing without a catalog: {e}"),
                Err(e) => return Err(e),
            }
            interact(session, deferred).await?;
        }

        Command::Inventory { input, output } => {
            let normalizer = AffiliateNormalizer::from_config(&config.store);
            let count =
                inventory::update_file(&input, &output, config.catalog.delimiter, &normalizer)
                    .await?;
            log::info!("Wrote {} books to {}", count, output.display());
        }

        Command::Categories { output } => {
            let catalog = loader.load(&source, &config.store).await?;
            let count = inventory::write_category_pages(&catalog, &output).await?;
            log::info!("Generated {} category pages in {}", count, output.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let catalog = loader.load(&source, &config.store).await?;
            if catalog.is_empty() {
                return Err(AppError::validation(format!("{source} contains no books")));
            }
            log::info!(
                "✓ Catalog OK: {} books, {} featured, {} genres",
                catalog.len(),
                catalog.featured_count(),
                catalog.genres().count()
            );
        }
    }

    Ok(())
}

fn new_session(config: &Arc<Config>) -> (Session, UnboundedReceiver<Gesture>) {
    let flags = Arc::new(LocalFlagStore::new(&config.storage.flags_path));
    let page = Page::storefront(&config.layout);
    Session::new(App::new(Arc::clone(config), page, flags))
}

/// Initialize and emit every region. Regions are emitted even when the
/// load fails, so the error message reaches the output before the error.
async fn render_storefront(
    mut session: Session,
    loader: &CatalogLoader,
    source: &CatalogSource,
    output: Option<&Path>,
) -> Result<()> {
    let loaded = session.initialize(loader, source).await;
    emit_regions(session.app(), output).await?;
    loaded.map(|_| ())
}

/// Print every region, or write each to `<dir>/<region>.html`.
async fn emit_regions(app: &App, output: Option<&Path>) -> Result<()> {
    let featured = featured_fragment(app.catalog());
    let regions = app
        .page()
        .regions()
        .map(|(region, html)| (region.name(), html))
        .chain(std::iter::once(("featured", featured.as_str())));

    match output {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            for (name, html) in regions {
                tokio::fs::write(dir.join(format!("{name}.html")), html).await?;
            }
            log::info!("Regions written to {}", dir.display());
        }
        None => {
            for (name, html) in regions {
                println!("<!-- {name} -->\n{html}");
            }
        }
    }
    Ok(())
}

fn featured_fragment(catalog: &Catalog) -> String {
    catalog.featured().map(render::render_featured_book).collect()
}

/// Run gestures from stdin and fired timers through the session.
async fn interact(mut session: Session, mut deferred: UnboundedReceiver<Gesture>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let gesture = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_gesture(line) {
                    Ok(Some(gesture)) => gesture,
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("{e}");
                        continue;
                    }
                }
            }
            Some(gesture) = deferred.recv() => gesture,
        };

        let before = session.app().page().clone();
        let effects = session.dispatch(gesture).await;
        print_effects(&effects);

        for (region, html) in session.app().page().regions() {
            if before.content(region) != Some(html) {
                println!("<!-- {region} -->\n{html}");
            }
        }
    }

    Ok(())
}

/// Parse one input line. `Ok(None)` means quit.
fn parse_gesture(line: &str) -> Result<Option<Gesture>> {
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let gesture = match word {
        "quit" | "exit" => return Ok(None),
        "search" => Gesture::Search(rest.to_string()),
        "nav" => Gesture::NavClick(
            rest.parse()
                .map_err(|_| AppError::validation(format!("nav expects a tab index, got '{rest}'")))?,
        ),
        "menu" => Gesture::ToggleMenu,
        "next" => Gesture::ScrollCarousel(Direction::Next),
        "prev" => Gesture::ScrollCarousel(Direction::Prev),
        "subscribe" => Gesture::SubmitNewsletter(rest.to_string()),
        "close" => Gesture::DismissNotice(DismissReason::Closed),
        "cart" => Gesture::AddToCart(rest.to_string()),
        "click" => Gesture::ClickBook(rest.to_string()),
        other => return Err(AppError::validation(format!("unknown gesture '{other}'"))),
    };
    Ok(Some(gesture))
}

fn print_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::ScrollTo { target, .. } => println!("scroll to {target}"),
            Effect::Navigate(href) => println!("navigate to {href}"),
            Effect::ScrollCarouselTo { offset, .. } => println!("carousel offset {offset}"),
            Effect::Alert(message) => println!("alert: {message}"),
            Effect::Schedule { after, command } => {
                log::debug!("{command:?} scheduled after {after:?}")
            }
        }
    }
}
