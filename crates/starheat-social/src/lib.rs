//! Identity resolution for roster entities.
//!
//! Given an entity name, discovers a canonical reference page, harvests
//! social-profile links from it (with a structured-claims fallback for the
//! gaps), and resolves per-platform follower counts. Every step degrades to
//! a partial record on failure; nothing here aborts a batch.

pub mod count;
pub mod followers;
pub mod links;
pub mod resolver;
pub mod types;

mod wiki;

pub use count::parse_abbreviated_count;
pub use links::{extract_handle, extract_social_links};
pub use resolver::{ResolverEndpoints, SocialResolver};
pub use types::{FollowerCount, Platform, SocialProfile};
