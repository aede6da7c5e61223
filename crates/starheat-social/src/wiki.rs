//! Reference-page and structured-claims lookups.
//!
//! The envelope shapes here are irregular (string-keyed page maps, a literal
//! `*` key for rendered text), so responses are navigated as
//! `serde_json::Value` pointers rather than deserialized into structs. Every
//! failure degrades to `None`/empty — a missing page is data, not an error.

use serde_json::Value;
use starheat_fetch::FetchClient;

use crate::types::{LinkMap, Platform};

/// Search the reference wiki for an entity name and return the top hit title.
pub(crate) async fn search_title(
    fetch: &FetchClient,
    api_base: &str,
    name: &str,
) -> Option<String> {
    let body = fetch
        .get_json(
            api_base,
            &[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", name),
                ("format", "json"),
            ],
        )
        .await?;

    let title = body.pointer("/query/search/0/title")?.as_str()?;
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Fetch the rendered content of a page by title.
pub(crate) async fn page_html(
    fetch: &FetchClient,
    api_base: &str,
    title: &str,
) -> Option<String> {
    let body = fetch
        .get_json(
            api_base,
            &[
                ("action", "parse"),
                ("page", title),
                ("prop", "text"),
                ("format", "json"),
            ],
        )
        .await?;

    // The parse API nests the markup under a literal "*" key.
    body.pointer("/parse/text/*")
        .and_then(Value::as_str)
        .map(String::from)
}

/// Resolve the structured-data identifier for a page title.
pub(crate) async fn wikidata_id(
    fetch: &FetchClient,
    api_base: &str,
    title: &str,
) -> Option<String> {
    let body = fetch
        .get_json(
            api_base,
            &[
                ("action", "query"),
                ("prop", "pageprops"),
                ("titles", title),
                ("format", "json"),
            ],
        )
        .await?;

    // Pages come back keyed by page id; take the first entry's wikibase item.
    let pages = body.pointer("/query/pages")?.as_object()?;
    let id = pages
        .values()
        .next()?
        .pointer("/pageprops/wikibase_item")?
        .as_str()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Fetch typed social-account claims for a structured-data entity and map
/// them to canonical profile URLs.
///
/// Claim types: P2003 instagram username, P2002 twitter username, P7085
/// tiktok username, P2397 youtube channel id, P2013 facebook id.
pub(crate) async fn entity_claims(
    fetch: &FetchClient,
    entity_data_base: &str,
    entity_id: &str,
) -> LinkMap {
    let url = format!("{entity_data_base}/{entity_id}.json");
    let Some(body) = fetch.get_json(&url, &[]).await else {
        return LinkMap::new();
    };

    let claim = |pid: &str| -> Option<String> {
        let value = body
            .pointer(&format!(
                "/entities/{entity_id}/claims/{pid}/0/mainsnak/datavalue/value"
            ))?
            .as_str()?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    let mut links = LinkMap::new();
    if let Some(handle) = claim("P2003") {
        links.insert(
            Platform::Instagram,
            format!("https://www.instagram.com/{handle}/"),
        );
    }
    if let Some(handle) = claim("P2002") {
        links.insert(Platform::Twitter, format!("https://twitter.com/{handle}"));
    }
    if let Some(handle) = claim("P7085") {
        links.insert(
            Platform::Tiktok,
            format!("https://www.tiktok.com/@{handle}"),
        );
    }
    if let Some(channel) = claim("P2397") {
        links.insert(
            Platform::Youtube,
            format!("https://www.youtube.com/channel/{channel}"),
        );
    }
    if let Some(id) = claim("P2013") {
        links.insert(Platform::Facebook, format!("https://www.facebook.com/{id}"));
    }
    links
}
