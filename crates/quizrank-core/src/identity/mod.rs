//! Identity resolution.
//!
//! Leaderboard entries are keyed by a human-meaningful display key (the user's
//! email) while callers only know the opaque user id issued by the auth
//! service. The resolver bridges the two.

use async_trait::async_trait;

/// Maps an opaque user id to the display key used inside the leaderboard.
///
/// Implementations must not fail loudly: a non-success response, a transport
/// error or a timeout all collapse to `None`, which callers treat as the
/// normal "unknown user" outcome.
///
/// No caching is implied. Every leaderboard operation calls `resolve` again,
/// so a cached or batched resolver can be swapped in behind this trait
/// without touching the ranking code.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the display key for `user_id`, or `None` if it cannot be resolved.
    async fn resolve(&self, user_id: &str) -> Option<String>;
}
