//! The keyword-batched interest provider contract and its HTTP
//! implementation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use starheat_fetch::FetchClient;

use crate::error::TrendsError;

/// One provider call's result: a wide date × term table.
#[derive(Debug, Clone, PartialEq)]
pub struct WideSeries {
    pub dates: Vec<NaiveDate>,
    /// Per query term, one value per date.
    pub values: BTreeMap<String, Vec<f64>>,
}

/// A time-series provider that enforces a maximum keyword count per call.
#[allow(async_fn_in_trait)]
pub trait SignalSource {
    /// The provider's per-call keyword limit.
    fn keyword_cap(&self) -> usize;

    /// Fetch one batch of query terms as a wide table.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError`] on transport, status, or shape failures; the
    /// collector treats any error as a discarded batch.
    async fn fetch_batch(&self, terms: &[String]) -> Result<WideSeries, TrendsError>;
}

#[derive(Debug, Deserialize)]
struct InterestResponse {
    dates: Vec<NaiveDate>,
    #[serde(default)]
    values: BTreeMap<String, Vec<f64>>,
}

/// Client for an interest-over-time HTTP service (e.g. a self-hosted trends
/// proxy) exposing `GET /interest_over_time?keywords=a,b&geo=US&timeframe=all`
/// returning `{ "dates": [...], "values": { term: [...] } }`.
pub struct TrendsHttpSource {
    fetch: FetchClient,
    base_url: String,
    geo: String,
    timeframe: String,
}

/// The service accepts at most five keywords per call.
const KEYWORD_CAP: usize = 5;

impl TrendsHttpSource {
    #[must_use]
    pub fn new(fetch: FetchClient, base_url: &str, geo: &str, timeframe: &str) -> Self {
        Self {
            fetch,
            base_url: base_url.trim_end_matches('/').to_string(),
            geo: geo.to_string(),
            timeframe: timeframe.to_string(),
        }
    }
}

impl SignalSource for TrendsHttpSource {
    fn keyword_cap(&self) -> usize {
        KEYWORD_CAP
    }

    async fn fetch_batch(&self, terms: &[String]) -> Result<WideSeries, TrendsError> {
        let url = format!("{}/interest_over_time", self.base_url);
        let keywords = terms.join(",");

        let response = self
            .fetch
            .get(
                &url,
                &[
                    ("keywords", keywords.as_str()),
                    ("geo", self.geo.as_str()),
                    ("timeframe", self.timeframe.as_str()),
                ],
            )
            .await
            .ok_or_else(|| TrendsError::NoResponse { url: url.clone() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrendsError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed: InterestResponse =
            serde_json::from_str(&body).map_err(|e| TrendsError::Deserialize {
                context: format!("interest batch [{keywords}]"),
                source: e,
            })?;

        for (term, values) in &parsed.values {
            if values.len() != parsed.dates.len() {
                return Err(TrendsError::ShapeMismatch {
                    term: term.clone(),
                    dates: parsed.dates.len(),
                    values: values.len(),
                });
            }
        }

        Ok(WideSeries {
            dates: parsed.dates,
            values: parsed.values,
        })
    }
}
