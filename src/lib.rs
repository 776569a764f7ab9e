//! Cadenza Server
//!
//! Backend core for a music-publishing community: users with role-based
//! permissions, a follow graph with a mandatory self-edge, stateless email
//! confirmation tokens, and slug-addressed compositions with a personalized
//! timeline. The HTTP layer, templates, and mail transport live elsewhere and
//! call into this crate.

pub mod auth;
pub mod compositions;
pub mod config;
pub mod db;
pub mod permissions;
pub mod social;
pub mod users;
