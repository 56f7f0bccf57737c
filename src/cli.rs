use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rental_scout::account::FavoriteSort;
use rental_scout::config::AppConfig;
use rental_scout::query::{FilterCriteria, FilterInput};
use rental_scout::{SortKey, ViewMode};

/// Browse, filter and bookmark rental listings from a JSON catalog
#[derive(Debug, Parser)]
#[command(name = "rental-scout", version)]
pub struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog path or http(s) URL
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Key-value store file
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Acting user id for favorites, history and messages
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Simulated result latency in milliseconds
    #[arg(long, global = true)]
    pub latency_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flags win over the config file
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(user) = &self.user {
            config.user_id = Some(user.clone());
        }
        if let Some(latency) = self.latency_ms {
            config.latency_ms = latency;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter, sort and page through listings
    Search(SearchArgs),
    /// Show one listing with its reviews and suggestions
    Show { id: u64 },
    /// Best rated listings
    Popular,
    /// Add or remove a listing from favorites
    Favorite { id: u64 },
    /// List favorite listings
    Favorites {
        #[arg(long, default_value = "recent")]
        sort: FavoriteSort,
    },
    /// Saved searches
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Received messages
    Messages {
        #[command(subcommand)]
        action: Option<MessageAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    Clear,
    /// Run a saved search again
    Repeat { timestamp: i64 },
    Delete { timestamp: i64 },
}

#[derive(Debug, Subcommand)]
pub enum MessageAction {
    List,
    Read { id: i64 },
    ReadAll,
    Delete { id: i64 },
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// URL query string, e.g. "location=cocody&priceRange=100000-300000"
    #[arg(long)]
    pub query: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long)]
    pub sort: Option<SortKey>,

    #[arg(long, default_value = "grid")]
    pub view: ViewMode,

    /// Extra "load more" requests after the first page
    #[arg(long, default_value_t = 0)]
    pub more: usize,
}

/// Individual filter fields, as typed into the search form
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long = "type")]
    pub property_type: Option<String>,
    /// Exact count or "N+"
    #[arg(long)]
    pub bedrooms: Option<String>,
    #[arg(long)]
    pub min_price: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    #[arg(long)]
    pub min_area: Option<String>,
    /// Exact count or "N+"
    #[arg(long)]
    pub bathrooms: Option<String>,
}

impl FilterArgs {
    /// Override fields of `base` with the flags that were given
    pub fn merge_into(&self, base: FilterCriteria) -> FilterCriteria {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let parsed = FilterCriteria::from_input(&FilterInput {
            location: text(&self.location),
            property_type: text(&self.property_type),
            bedrooms: text(&self.bedrooms),
            min_price: text(&self.min_price),
            max_price: text(&self.max_price),
            min_area: text(&self.min_area),
            bathrooms: text(&self.bathrooms),
        });

        FilterCriteria {
            location: pick(&self.location, parsed.location, base.location),
            property_type: pick(&self.property_type, parsed.property_type, base.property_type),
            bedrooms: pick(&self.bedrooms, parsed.bedrooms, base.bedrooms),
            min_price: pick(&self.min_price, parsed.min_price, base.min_price),
            max_price: pick(&self.max_price, parsed.max_price, base.max_price),
            min_area: pick(&self.min_area, parsed.min_area, base.min_area),
            bathrooms: pick(&self.bathrooms, parsed.bathrooms, base.bathrooms),
        }
    }
}

fn pick<T>(flag: &Option<String>, parsed: T, base: T) -> T {
    if flag.is_some() {
        parsed
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_scout::query::CountFilter;

    #[test]
    fn flags_override_url_fields() {
        let cli = Cli::parse_from([
            "rental-scout",
            "search",
            "--query",
            "location=plateau&bedrooms=2",
            "--bedrooms",
            "4+",
            "--max-price",
            "oops",
            "--sort",
            "rating-desc",
            "--view",
            "list",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.sort, Some(SortKey::RatingDesc));
        assert_eq!(args.view, ViewMode::List);

        let base = rental_scout::query::url_state::parse(args.query.as_deref().unwrap()).criteria;
        let merged = args.filters.merge_into(base);
        assert_eq!(merged.location, "plateau");
        assert_eq!(merged.bedrooms, CountFilter::AtLeast(4));
        assert_eq!(merged.max_price, None);
    }

    #[test]
    fn global_flags_override_config() {
        let cli = Cli::parse_from(["rental-scout", "--user", "u9", "--latency-ms", "0", "popular"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.user_id.as_deref(), Some("u9"));
        assert_eq!(config.latency_ms, 0);
    }
}
