//! Well-known store keys.
//!
//! Every piece of persisted app state lives under one of these names, so
//! the full storage layout is visible in one place.

/// Recently shown movie IDs, oldest first
pub const SHOWN_MOVIES: &str = "shown_movies";
/// Movie IDs the user dismissed as already watched
pub const SEEN_MOVIES: &str = "seen_movies";
/// Committed shortlist entries, newest first
pub const SHORTLIST: &str = "shortlist";
/// Picks waiting for a disposition after a finished session
pub const PENDING_PICKS: &str = "pending_picks";
/// Saved favorites, newest first
pub const FAVORITES: &str = "favorites";
/// Swipe journal used for the stats summary
pub const SWIPE_STATS: &str = "swipe_stats";

/// Movie pool for one vote session
pub fn vote_pool(session_id: &str) -> String {
    format!("vote_pool:{session_id}")
}

/// Cast votes for one vote session
pub fn vote_records(session_id: &str) -> String {
    format!("vote_records:{session_id}")
}

/// This device's voter token for one vote session
pub fn vote_token(session_id: &str) -> String {
    format!("vote_token:{session_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_keys_embed_session_id() {
        assert_eq!(vote_pool("abc1234"), "vote_pool:abc1234");
        assert_eq!(vote_records("abc1234"), "vote_records:abc1234");
        assert_eq!(vote_token("abc1234"), "vote_token:abc1234");
    }
}
