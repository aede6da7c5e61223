use std::collections::BTreeMap;

/// The social platforms the resolver knows how to discover and measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Instagram,
    Twitter,
    Tiktok,
    Youtube,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Facebook,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved profile URL per platform from one source.
pub type LinkMap = BTreeMap<Platform, String>;

/// Fill gaps in `primary` from `fallback` without overwriting anything the
/// primary source already resolved. This is the fallback-chain merge: sources
/// are consulted in priority order and earlier results always win.
pub fn fill_missing(primary: &mut LinkMap, fallback: LinkMap) {
    for (platform, url) in fallback {
        primary.entry(platform).or_insert(url);
    }
}

/// A follower/subscriber count, or an explicit marker that the lookup failed.
///
/// `Unknown` is not zero: an account with no followers measures as
/// `Known(0)`, while a failed or impossible measurement stays `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerCount {
    Known(u64),
    Unknown,
}

impl FollowerCount {
    /// Convert a parsed count, treating negative or absent values as unknown.
    #[must_use]
    pub fn from_parsed(count: Option<i64>) -> Self {
        match count.and_then(|c| u64::try_from(c).ok()) {
            Some(c) => FollowerCount::Known(c),
            None => FollowerCount::Unknown,
        }
    }
}

impl std::fmt::Display for FollowerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowerCount::Known(count) => write!(f, "{count}"),
            FollowerCount::Unknown => write!(f, "unknown"),
        }
    }
}

/// Everything the resolver learned about one entity. Produced once, never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct SocialProfile {
    pub entity: String,
    /// Title of the canonical reference page, when discovery succeeded.
    pub page_title: Option<String>,
    pub instagram_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    /// Youtube and facebook keep the full resolved URL rather than a handle.
    pub youtube_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_followers: FollowerCount,
    pub twitter_followers: FollowerCount,
    pub tiktok_followers: FollowerCount,
    pub youtube_subscribers: FollowerCount,
}

impl SocialProfile {
    /// The degraded record for an entity whose reference page was never
    /// found: just the name, everything else unresolved.
    #[must_use]
    pub fn name_only(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            page_title: None,
            instagram_handle: None,
            twitter_handle: None,
            tiktok_handle: None,
            youtube_url: None,
            facebook_url: None,
            instagram_followers: FollowerCount::Unknown,
            twitter_followers: FollowerCount::Unknown,
            tiktok_followers: FollowerCount::Unknown,
            youtube_subscribers: FollowerCount::Unknown,
        }
    }
}
