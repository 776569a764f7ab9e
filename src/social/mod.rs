//! Follow graph between users.
//!
//! Edges are directed and timestamped, keyed by (follower, followed). Every
//! user carries a reflexive self-edge from creation onward; the timeline
//! join depends on it, so the guarded [`unfollow_user`] entry point refuses
//! to remove it.

mod follows;
mod types;

pub use follows::{
    ensure_self_follows, follow, followers, following, is_followed_by, is_following, unfollow,
    unfollow_user,
};
pub use types::{Follow, SocialError};
