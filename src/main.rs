mod cli;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, HistoryAction, MessageAction, SearchArgs};
use rental_scout::account::{
    FavoriteSort, Favorites, Inbox, ReviewBook, SearchHistory, SearchRecord, UserSettings,
};
use rental_scout::catalog::{load_with_retry, Catalog, POPULAR_LIMIT, SIMILAR_LIMIT};
use rental_scout::config::AppConfig;
use rental_scout::models::format_price;
use rental_scout::query::{Batch, ResultCount};
use rental_scout::session::{RenderSink, SearchEvent, SearchSession};
use rental_scout::store::{JsonFileStore, KeyValueStore};
use rental_scout::{Listing, QueryEngine, ViewMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏠 Rental Scout");

    let mut store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))?;

    match cli.command {
        Command::Search(args) => {
            let catalog = load_catalog(&config).await;
            run_search(&config, catalog, &mut store, args).await?
        }
        Command::Show { id } => {
            let catalog = load_catalog(&config).await;
            show_listing(&config, &catalog, &store, id)?
        }
        Command::Popular => {
            let catalog = load_catalog(&config).await;
            for (i, listing) in catalog.popular(POPULAR_LIMIT).iter().enumerate() {
                print_listing(i + 1, listing, ViewMode::Grid);
            }
        }
        Command::Favorite { id } => {
            let user = require_user(&config)?;
            let catalog = load_catalog(&config).await;
            if catalog.get(id).is_none() {
                warn!("Listing {} is not in the catalog", id);
            }
            let now_favorite = Favorites::for_user(user).toggle(&mut store, id)?;
            if now_favorite {
                println!("❤️  Added listing {id} to favorites");
            } else {
                println!("Removed listing {id} from favorites");
            }
        }
        Command::Favorites { sort } => {
            let catalog = load_catalog(&config).await;
            list_favorites(&config, &catalog, &store, sort)?
        }
        Command::History { action } => {
            let user = require_user(&config)?;
            let history = SearchHistory::for_user(user);
            match action.unwrap_or(HistoryAction::List) {
                HistoryAction::List => {
                    for record in history.list(&store) {
                        println!(
                            "{}  {} ({} results)  {}",
                            record.timestamp,
                            record.label(),
                            record.results_count,
                            record.to_query_string()
                        );
                    }
                }
                HistoryAction::Clear => {
                    let removed = history.clear(&mut store)?;
                    println!("Cleared {removed} saved searches");
                }
                HistoryAction::Delete { timestamp } => {
                    if !history.delete(&mut store, timestamp)? {
                        bail!("No saved search with timestamp {timestamp}");
                    }
                }
                HistoryAction::Repeat { timestamp } => {
                    let Some(query) = history.repeat(&store, timestamp) else {
                        bail!("No saved search with timestamp {timestamp}");
                    };
                    let args = SearchArgs {
                        query: Some(query),
                        filters: Default::default(),
                        sort: None,
                        view: ViewMode::Grid,
                        more: 0,
                    };
                    let catalog = load_catalog(&config).await;
                    run_search(&config, catalog, &mut store, args).await?;
                }
            }
        }
        Command::Messages { action } => {
            let user = require_user(&config)?;
            let inbox = Inbox::for_user(user);
            match action.unwrap_or(MessageAction::List) {
                MessageAction::List => {
                    for message in inbox.list(&store) {
                        let marker = if message.read { " " } else { "•" };
                        println!(
                            "{marker} [{}] {} — {}: {}",
                            message.id,
                            message.date.format("%Y-%m-%d"),
                            message.from,
                            message.subject
                        );
                        println!("    {}", message.preview(100));
                    }
                }
                MessageAction::Read { id } => {
                    if !inbox.mark_read(&mut store, id)? {
                        bail!("No message with id {id}");
                    }
                }
                MessageAction::ReadAll => {
                    let changed = inbox.mark_all_read(&mut store)?;
                    println!("{changed} messages marked as read");
                }
                MessageAction::Delete { id } => {
                    if !inbox.delete(&mut store, id)? {
                        bail!("No message with id {id}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load the catalog, degrading to an empty one when it stays unavailable
async fn load_catalog(config: &AppConfig) -> Catalog {
    let result = match config.catalog_source() {
        Ok(source) => load_with_retry(source.as_ref(), &config.retry).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Could not load listings from {}: {}", config.catalog, e);
            eprintln!("😕 Could not load listings ({e}). Run the command again to retry.");
            Catalog::default()
        }
    }
}

fn require_user(config: &AppConfig) -> anyhow::Result<&str> {
    config
        .user_id
        .as_deref()
        .context("No user selected; pass --user or set user_id in the config")
}

async fn run_search(
    config: &AppConfig,
    catalog: Catalog,
    store: &mut JsonFileStore,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let mut engine = QueryEngine::with_page_size(catalog, config.page_size);
    if let Some(query) = &args.query {
        engine.apply_url(query);
    }
    let criteria = args.filters.merge_into(engine.criteria().clone());
    engine.set_criteria(criteria);
    if let Some(sort) = args.sort {
        engine.set_sort(sort);
    }
    // nothing is displayed yet, so this only picks the view for the first page
    engine.set_view(args.view);

    let mut session = SearchSession::new(engine, ConsoleSink::default(), config.latency());
    session.search().await;

    let (events, rx) = mpsc::unbounded_channel();
    let pages = args.more.min(session.engine().filtered().len());
    for _ in 0..pages {
        events.send(SearchEvent::LoadMore)?;
    }
    drop(events);
    let session = session.run_debounced(rx, config.debounce()).await;

    let engine = session.engine();
    if let Some(user) = &config.user_id {
        if UserSettings::load(&*store, user).save_searches {
            let record = SearchRecord::new(
                Utc::now(),
                engine.criteria().clone(),
                engine.sort(),
                engine.filtered().len(),
            );
            SearchHistory::for_user(user).record(store, record)?;
        }
    }
    Ok(())
}

fn show_listing(
    config: &AppConfig,
    catalog: &Catalog,
    store: &JsonFileStore,
    id: u64,
) -> anyhow::Result<()> {
    let Some(listing) = catalog.get(id) else {
        bail!("Listing {id} not found");
    };

    println!("{} — {}", listing.title, listing.location);
    println!(
        "   {} FCFA/{} · {} · {}",
        format_price(listing.price),
        listing.period,
        listing.property_type,
        listing.status
    );
    println!(
        "   {} bd · {} ba · {} m² · ⭐ {}/5",
        listing.bedrooms, listing.bathrooms, listing.area, listing.rating
    );
    println!("   {}", listing.description);
    println!(
        "   Contact: {} ({}, {})",
        listing.contact.owner, listing.contact.phone, listing.contact.email
    );
    if let Some(user) = &config.user_id {
        if Favorites::for_user(user).is_favorite(store, id) {
            println!("   ❤️  In your favorites");
        }
    }

    let reviews = ReviewBook::merged(store, listing);
    println!("\nReviews ({})", reviews.len());
    for review in &reviews {
        println!("   [{}] {} {}/5: {}", review.date, review.user, review.rating, review.comment);
    }

    let similar = catalog.similar(id, SIMILAR_LIMIT);
    if !similar.is_empty() {
        println!("\nSimilar listings");
        for (i, other) in similar.iter().enumerate() {
            print_listing(i + 1, other, ViewMode::Grid);
        }
    }

    if let Some((prev, next)) = catalog.neighbors(id) {
        println!("← {} ({})   → {} ({})", prev.title, prev.id, next.title, next.id);
    }
    Ok(())
}

fn list_favorites<S: KeyValueStore>(
    config: &AppConfig,
    catalog: &Catalog,
    store: &S,
    sort: FavoriteSort,
) -> anyhow::Result<()> {
    let user = require_user(config)?;
    let favorites = Favorites::for_user(user).resolve(store, catalog, sort);
    if favorites.is_empty() {
        println!("No favorites yet");
    }
    for (i, listing) in favorites.iter().enumerate() {
        print_listing(i + 1, listing, ViewMode::Grid);
    }
    Ok(())
}

fn print_listing(position: usize, listing: &Listing, view: ViewMode) {
    println!(
        "{}. {} ({} FCFA/{})",
        position,
        listing.title,
        format_price(listing.price),
        listing.period
    );
    println!("   📍 {}", listing.location);
    println!(
        "   {} bd · {} ba · {} m² · ⭐ {}/5 ({} reviews)",
        listing.bedrooms,
        listing.bathrooms,
        listing.area,
        listing.rating,
        listing.reviews.len()
    );
    if view == ViewMode::List {
        let summary: String = listing.description.chars().take(120).collect();
        println!("   {summary}...");
    }
    println!("   ID: {}", listing.id);
    println!();
}

/// Prints result batches to stdout
#[derive(Default)]
struct ConsoleSink {
    shown: usize,
}

impl RenderSink for ConsoleSink {
    fn loading(&mut self) {
        info!("🔍 Searching...");
    }

    fn render(&mut self, batch: &Batch<'_>) {
        if batch.replace {
            self.shown = 0;
        }
        for listing in batch.listings {
            self.shown += 1;
            print_listing(self.shown, listing, batch.view);
        }
    }

    fn result_count(&mut self, count: ResultCount) {
        println!("{count}");
    }

    fn load_more_visible(&mut self, visible: bool) {
        if visible {
            println!("(more results available: use --more)");
        }
    }

    fn query_changed(&mut self, query: &str) {
        if !query.is_empty() {
            info!("Shareable query: ?{}", query);
        }
    }
}
