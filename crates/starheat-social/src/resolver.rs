//! Per-entity identity resolution.

use std::time::Duration;

use starheat_fetch::FetchClient;

use crate::links::{extract_handle, extract_social_links};
use crate::types::{fill_missing, FollowerCount, LinkMap, Platform, SocialProfile};
use crate::{followers, wiki};

/// Service endpoints consulted during resolution. Overridable so tests can
/// point every lookup at a local mock server.
#[derive(Debug, Clone)]
pub struct ResolverEndpoints {
    pub wiki_api_base: String,
    pub wikidata_entity_base: String,
    pub instagram_base: String,
    pub twitter_syndication_base: String,
    pub tiktok_base: String,
}

impl Default for ResolverEndpoints {
    fn default() -> Self {
        Self {
            wiki_api_base: "https://en.wikipedia.org/w/api.php".to_string(),
            wikidata_entity_base: "https://www.wikidata.org/wiki/Special:EntityData".to_string(),
            instagram_base: "https://www.instagram.com".to_string(),
            twitter_syndication_base: "https://cdn.syndication.twimg.com".to_string(),
            tiktok_base: "https://www.tiktok.com".to_string(),
        }
    }
}

/// Resolves an entity name into a [`SocialProfile`] through an ordered chain
/// of sources: reference-page links first, structured claims for whatever is
/// still missing, then per-platform follower lookups.
pub struct SocialResolver {
    fetch: FetchClient,
    endpoints: ResolverEndpoints,
}

impl SocialResolver {
    #[must_use]
    pub fn new(fetch: FetchClient) -> Self {
        Self::with_endpoints(fetch, ResolverEndpoints::default())
    }

    #[must_use]
    pub fn with_endpoints(fetch: FetchClient, endpoints: ResolverEndpoints) -> Self {
        Self { fetch, endpoints }
    }

    /// Resolve one entity. Never fails: each unresolved step degrades the
    /// record and the remaining steps still run where they can.
    pub async fn resolve_profile(&self, entity: &str) -> SocialProfile {
        let Some(title) =
            wiki::search_title(&self.fetch, &self.endpoints.wiki_api_base, entity).await
        else {
            tracing::info!(entity, "no reference page found — recording name-only profile");
            return SocialProfile::name_only(entity);
        };

        // Primary source: outbound links on the rendered reference page.
        let mut links = match wiki::page_html(&self.fetch, &self.endpoints.wiki_api_base, &title)
            .await
        {
            Some(html) => extract_social_links(&html),
            None => LinkMap::new(),
        };

        // Secondary source: structured claims, filling only the gaps the
        // primary source left. Skipped entirely when nothing is missing.
        if links.len() < Platform::ALL.len() {
            if let Some(id) =
                wiki::wikidata_id(&self.fetch, &self.endpoints.wiki_api_base, &title).await
            {
                let claims =
                    wiki::entity_claims(&self.fetch, &self.endpoints.wikidata_entity_base, &id)
                        .await;
                fill_missing(&mut links, claims);
            }
        }

        let instagram_handle = links
            .get(&Platform::Instagram)
            .and_then(|url| extract_handle(url));
        let twitter_handle = links
            .get(&Platform::Twitter)
            .and_then(|url| extract_handle(url));
        let tiktok_handle = links
            .get(&Platform::Tiktok)
            .and_then(|url| extract_handle(url));
        let youtube_url = links.get(&Platform::Youtube).cloned();
        let facebook_url = links.get(&Platform::Facebook).cloned();

        let instagram_followers = match instagram_handle.as_deref() {
            Some(handle) => {
                followers::instagram(&self.fetch, &self.endpoints.instagram_base, handle).await
            }
            None => FollowerCount::Unknown,
        };
        let twitter_followers = match twitter_handle.as_deref() {
            Some(handle) => {
                followers::twitter(
                    &self.fetch,
                    &self.endpoints.twitter_syndication_base,
                    handle,
                )
                .await
            }
            None => FollowerCount::Unknown,
        };
        let tiktok_followers = match tiktok_handle.as_deref() {
            Some(handle) => {
                followers::tiktok(&self.fetch, &self.endpoints.tiktok_base, handle).await
            }
            None => FollowerCount::Unknown,
        };
        let youtube_subscribers = match youtube_url.as_deref() {
            Some(url) => followers::youtube(&self.fetch, url).await,
            None => FollowerCount::Unknown,
        };

        SocialProfile {
            entity: entity.to_string(),
            page_title: Some(title),
            instagram_handle,
            twitter_handle,
            tiktok_handle,
            youtube_url,
            facebook_url,
            instagram_followers,
            twitter_followers,
            tiktok_followers,
            youtube_subscribers,
        }
    }

    /// Resolve every roster entity sequentially with a randomized delay
    /// between entities. One entity's degraded resolution never stops the
    /// rest of the roster.
    pub async fn resolve_roster(
        &self,
        names: &[String],
        delay_secs: (f64, f64),
    ) -> Vec<SocialProfile> {
        let mut profiles = Vec::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            tracing::info!(entity = %name, "resolving social profile");
            profiles.push(self.resolve_profile(name).await);
            if index + 1 < names.len() {
                sleep_random(delay_secs).await;
            }
        }
        profiles
    }
}

async fn sleep_random((min, max): (f64, f64)) {
    if max <= 0.0 {
        return;
    }
    let secs = min + rand::random::<f64>() * (max - min);
    tokio::time::sleep(Duration::from_secs_f64(secs.max(0.0))).await;
}
