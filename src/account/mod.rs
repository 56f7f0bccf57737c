//! Per-user data layered on the key-value store: favorites, search history,
//! messages, settings, reviews, profile and owner listings.

pub mod favorites;
pub mod history;
pub mod listings;
pub mod messages;
pub mod profile;
pub mod reviews;
pub mod settings;

pub use favorites::{FavoriteSort, Favorites};
pub use history::{SearchHistory, SearchRecord};
pub use listings::{NewListing, OwnerListings};
pub use messages::{Inbox, Message};
pub use profile::UserProfile;
pub use reviews::ReviewBook;
pub use settings::{Setting, UserSettings};

use chrono::{DateTime, Utc};

use crate::store::KeyValueStore;

/// Counters on the dashboard overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub favorites: usize,
    pub searches: usize,
    pub messages: usize,
    pub unread: usize,
    pub days_active: i64,
}

impl DashboardStats {
    pub fn collect<S: KeyValueStore + ?Sized>(
        store: &S,
        user: &UserProfile,
        now: DateTime<Utc>,
    ) -> Self {
        let inbox = Inbox::for_user(&user.id);
        let messages = inbox.list(store);
        Self {
            favorites: Favorites::for_user(&user.id).list(store).len(),
            searches: SearchHistory::for_user(&user.id).list(store).len(),
            unread: messages.iter().filter(|m| !m.read).count(),
            messages: messages.len(),
            days_active: user.days_active(now),
        }
    }
}
