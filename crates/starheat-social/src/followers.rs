//! Per-platform follower-count extraction.
//!
//! Every path here returns [`FollowerCount::Unknown`] — never zero — on a
//! parse failure, timeout, or missing field. "No followers" and "could not
//! measure" are different facts and downstream tables must keep them apart.

use regex::Regex;
use serde_json::Value;
use starheat_fetch::FetchClient;

use crate::count::parse_abbreviated_count;
use crate::types::FollowerCount;

/// Coerce a JSON count field that may be a number or an abbreviated string
/// (the aggregate-info endpoint returns `"12.4K"` style values).
fn count_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => parse_abbreviated_count(s),
        _ => None,
    }
}

/// Instagram: structured per-profile endpoint first, public page fallback.
///
/// The structured endpoint (`?__a=1&__d=dis`) frequently rate-limits or
/// changes shape; on any failure to obtain its JSON the public profile page
/// is fetched and scanned for the embedded count instead.
pub async fn instagram(fetch: &FetchClient, base: &str, handle: &str) -> FollowerCount {
    let url = format!("{base}/{handle}/");
    match fetch.get_json(&url, &[("__a", "1"), ("__d", "dis")]).await {
        Some(body) => FollowerCount::from_parsed(
            body.pointer("/graphql/user/edge_followed_by/count")
                .and_then(count_from_value),
        ),
        None => instagram_page_fallback(fetch, base, handle).await,
    }
}

async fn instagram_page_fallback(
    fetch: &FetchClient,
    base: &str,
    handle: &str,
) -> FollowerCount {
    let url = format!("{base}/{handle}/");
    let Some(page) = fetch.get_text(&url, &[]).await else {
        return FollowerCount::Unknown;
    };
    let pattern =
        Regex::new(r#""edge_followed_by":\{"count":(\d+)\}"#).expect("valid follower regex");
    let count = pattern
        .captures(&page)
        .and_then(|c| parse_abbreviated_count(&c[1]));
    FollowerCount::from_parsed(count)
}

/// Twitter/X: public aggregate-info endpoint keyed by screen name.
pub async fn twitter(fetch: &FetchClient, syndication_base: &str, handle: &str) -> FollowerCount {
    let url = format!("{syndication_base}/widgets/followbutton/info.json");
    let Some(body) = fetch.get_json(&url, &[("screen_names", handle)]).await else {
        return FollowerCount::Unknown;
    };
    let count = body
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("followers_count"))
        .and_then(count_from_value);
    FollowerCount::from_parsed(count)
}

/// TikTok: public profile page with an embedded count field.
pub async fn tiktok(fetch: &FetchClient, base: &str, handle: &str) -> FollowerCount {
    let url = format!("{base}/@{handle}");
    let Some(page) = fetch.get_text(&url, &[]).await else {
        return FollowerCount::Unknown;
    };
    let pattern = Regex::new(r#""followerCount":(\d+)"#).expect("valid follower regex");
    let count = pattern
        .captures(&page)
        .and_then(|c| parse_abbreviated_count(&c[1]));
    FollowerCount::from_parsed(count)
}

/// YouTube: channel page with an embedded subscriber-count text, e.g.
/// `"subscriberCountText":{"simpleText":"1.2M subscribers"}`. Only the first
/// whitespace-separated token carries the number.
pub async fn youtube(fetch: &FetchClient, channel_url: &str) -> FollowerCount {
    let Some(page) = fetch.get_text(channel_url, &[]).await else {
        return FollowerCount::Unknown;
    };
    let pattern = Regex::new(r#""subscriberCountText":\{"simpleText":"([^"]+)""#)
        .expect("valid subscriber regex");
    let count = pattern
        .captures(&page)
        .and_then(|c| c[1].split_whitespace().next().map(String::from))
        .and_then(|token| parse_abbreviated_count(&token));
    FollowerCount::from_parsed(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_from_value_accepts_numbers_and_strings() {
        assert_eq!(count_from_value(&json!(1200)), Some(1200));
        assert_eq!(count_from_value(&json!("12.4K")), Some(12_400));
        assert_eq!(count_from_value(&json!(null)), None);
        assert_eq!(count_from_value(&json!(["nope"])), None);
    }
}
