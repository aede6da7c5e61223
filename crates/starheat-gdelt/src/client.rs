//! GDELT document API client.

use chrono::NaiveDateTime;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::Value;
use starheat_core::PeriodKey;
use starheat_fetch::FetchClient;
use starheat_heat::RatioSource;

const DEFAULT_BASE_URL: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

/// Maximum articles requested per lookup, newest first.
const MAX_RECORDS: u32 = 250;

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    articles: Vec<DocArticle>,
}

#[derive(Debug, Deserialize)]
struct DocArticle {
    #[serde(default)]
    tone: Option<Value>,
}

/// Client for the GDELT Doc 2.1 article-search API.
pub struct GdeltClient {
    fetch: FetchClient,
    base_url: String,
}

impl GdeltClient {
    #[must_use]
    pub fn new(fetch: FetchClient) -> Self {
        Self::with_base_url(fetch, DEFAULT_BASE_URL)
    }

    /// Point the client at a custom endpoint (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(fetch: FetchClient, base_url: &str) -> Self {
        Self {
            fetch,
            base_url: base_url.to_string(),
        }
    }

    /// Share of negative-tone articles mentioning `phrase` within the window.
    ///
    /// Queries the exact phrase (quoted, percent-encoded), takes up to
    /// [`MAX_RECORDS`] articles sorted newest-first, classifies each article
    /// with a numeric tone as negative when `tone < 0`, and returns
    /// negative / classifiable. Returns exactly 0.0 when the request fails,
    /// no articles come back, or none carries a usable tone — zero is the
    /// defined default, not an error.
    pub async fn negative_tone_ratio(
        &self,
        phrase: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> f64 {
        // The exact-phrase query is encoded into the URL directly; the API is
        // picky about how its operators are escaped.
        let query = format!("\"{phrase}\"");
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();
        let url = format!("{base}?query={encoded}", base = self.base_url);
        let max_records = MAX_RECORDS.to_string();
        let start_s = start.format("%Y%m%d%H%M%S").to_string();
        let end_s = end.format("%Y%m%d%H%M%S").to_string();
        let params: [(&str, &str); 6] = [
            ("mode", "ArtList"),
            ("maxrecords", max_records.as_str()),
            ("sort", "DateDesc"),
            ("format", "json"),
            ("startdatetime", start_s.as_str()),
            ("enddatetime", end_s.as_str()),
        ];

        let Some(body) = self.fetch.get_json(&url, &params).await else {
            tracing::warn!(phrase, "news search yielded no usable response — ratio defaults to 0.0");
            return 0.0;
        };
        let Ok(response) = serde_json::from_value::<DocResponse>(body) else {
            tracing::warn!(phrase, "news search response had an unexpected shape — ratio defaults to 0.0");
            return 0.0;
        };

        let mut negative = 0usize;
        let mut total = 0usize;
        for article in &response.articles {
            let Some(tone) = article.tone.as_ref().and_then(tone_as_f64) else {
                continue;
            };
            total += 1;
            if tone < 0.0 {
                negative += 1;
            }
        }

        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = negative as f64 / total as f64;
        ratio
    }
}

/// The feed serves tone as a number or a numeric string, inconsistently.
fn tone_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl RatioSource for GdeltClient {
    async fn negative_ratio(&self, entity: &str, period: &PeriodKey) -> f64 {
        self.negative_tone_ratio(entity, period.start(), period.end())
            .await
    }
}
