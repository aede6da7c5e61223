//! Outbound-link scanning and handle extraction.

use regex::Regex;
use reqwest::Url;

use crate::types::{LinkMap, Platform};

/// Host aliases per platform. Subdomains (including `www.`) match via the
/// dotted-suffix rule; twitter.com and x.com are the same platform, as are
/// youtube.com and youtu.be.
const PLATFORM_DOMAINS: [(Platform, &[&str]); 5] = [
    (Platform::Instagram, &["instagram.com"]),
    (Platform::Twitter, &["twitter.com", "x.com"]),
    (Platform::Tiktok, &["tiktok.com"]),
    (Platform::Youtube, &["youtube.com", "youtu.be"]),
    (Platform::Facebook, &["facebook.com"]),
];

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Classify an absolute URL by the platform its host belongs to.
#[must_use]
pub fn platform_of(url: &str) -> Option<Platform> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    PLATFORM_DOMAINS
        .iter()
        .find(|(_, domains)| domains.iter().any(|d| host_matches(&host, d)))
        .map(|(platform, _)| *platform)
}

/// Scan rendered page content for outbound links to known social platforms.
///
/// The first matching link per platform wins; later occurrences are ignored.
/// Relative links never match (they have no host to classify).
#[must_use]
pub fn extract_social_links(html: &str) -> LinkMap {
    let href = Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("valid href regex");

    let mut links = LinkMap::new();
    for captures in href.captures_iter(html) {
        let url = &captures[1];
        if let Some(platform) = platform_of(url) {
            links.entry(platform).or_insert_with(|| url.to_string());
            if links.len() == PLATFORM_DOMAINS.len() {
                break;
            }
        }
    }
    links
}

/// Extract the platform username from a profile URL: the first path segment,
/// with a leading `@` stripped.
#[must_use]
pub fn extract_handle(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path()
        .trim_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    let handle = segment.trim_start_matches('@');
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}
