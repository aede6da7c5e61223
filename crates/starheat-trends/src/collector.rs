//! Roster-wide collection loop over a [`SignalSource`].

use std::time::Duration;

use starheat_core::{EntityConfig, SeriesRow};

use crate::source::{SignalSource, WideSeries};

/// Pacing and disambiguation knobs for one collection run.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Randomized delay between successful batches, seconds.
    pub delay_secs: (f64, f64),
    /// Fixed cooldown after a failed batch, seconds.
    pub cooldown_secs: u64,
    /// Appended to the query term of roster entries flagged `ambiguous`.
    pub disambiguation_suffix: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            delay_secs: (10.0, 20.0),
            cooldown_secs: 60,
            disambiguation_suffix: "celebrity".to_string(),
        }
    }
}

/// Collect the interest time series for the whole roster.
///
/// The roster is partitioned into `keyword_cap`-sized batches, one provider
/// call each. A failing batch is logged, discarded, and followed by the long
/// cooldown; remaining batches still run. Successful batches are reshaped to
/// long rows keyed by the original entity name (the disambiguation rewrite
/// affects the query term only) and separated by a randomized delay.
pub async fn collect_interest_series<S: SignalSource>(
    source: &S,
    roster: &[EntityConfig],
    config: &CollectorConfig,
) -> Vec<SeriesRow> {
    let cap = source.keyword_cap().max(1);
    let total_batches = roster.len().div_ceil(cap);
    let mut rows = Vec::new();

    for (batch_index, batch) in roster.chunks(cap).enumerate() {
        let terms: Vec<String> = batch
            .iter()
            .map(|entity| query_term(entity, &config.disambiguation_suffix))
            .collect();
        tracing::info!(
            batch = batch_index + 1,
            total = total_batches,
            terms = ?terms,
            "collecting interest batch"
        );

        match source.fetch_batch(&terms).await {
            Ok(wide) => {
                rows.extend(reshape(&wide, batch, &terms));
                if batch_index + 1 < total_batches {
                    sleep_random(config.delay_secs).await;
                }
            }
            Err(e) => {
                tracing::warn!(
                    batch = batch_index + 1,
                    error = %e,
                    "interest batch failed — discarding and cooling down"
                );
                if config.cooldown_secs > 0 {
                    tokio::time::sleep(Duration::from_secs(config.cooldown_secs)).await;
                }
            }
        }
    }

    rows
}

fn query_term(entity: &EntityConfig, suffix: &str) -> String {
    if entity.ambiguous && !suffix.is_empty() {
        format!("{} {suffix}", entity.name)
    } else {
        entity.name.clone()
    }
}

/// Wide date × term table → long rows, keyed by the original entity names.
/// Terms the provider dropped from its response are skipped with a warning.
fn reshape(wide: &WideSeries, batch: &[EntityConfig], terms: &[String]) -> Vec<SeriesRow> {
    let mut rows = Vec::new();
    for (entity, term) in batch.iter().zip(terms) {
        let Some(values) = wide.values.get(term) else {
            tracing::warn!(
                entity = %entity.name,
                term,
                "term missing from interest response — skipping"
            );
            continue;
        };
        for (date, value) in wide.dates.iter().zip(values) {
            rows.push(SeriesRow {
                entity: entity.name.clone(),
                date: *date,
                signal: *value,
            });
        }
    }
    rows
}

async fn sleep_random((min, max): (f64, f64)) {
    if max <= 0.0 {
        return;
    }
    let secs = min + rand::random::<f64>() * (max - min);
    tokio::time::sleep(Duration::from_secs_f64(secs.max(0.0))).await;
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::TrendsError;

    /// Source that records every batch it receives and fails on request.
    struct ScriptedSource {
        cap: usize,
        fail_batches: Vec<usize>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedSource {
        fn new(cap: usize, fail_batches: Vec<usize>) -> Self {
            Self {
                cap,
                fail_batches,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SignalSource for ScriptedSource {
        fn keyword_cap(&self) -> usize {
            self.cap
        }

        async fn fetch_batch(&self, terms: &[String]) -> Result<WideSeries, TrendsError> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(terms.to_vec());
                calls.len() - 1
            };
            if self.fail_batches.contains(&index) {
                return Err(TrendsError::NoResponse {
                    url: "scripted".to_string(),
                });
            }
            let dates = vec![NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()];
            let values: BTreeMap<String, Vec<f64>> = terms
                .iter()
                .map(|term| (term.clone(), vec![f64::from(u32::try_from(index).unwrap())]))
                .collect();
            Ok(WideSeries { dates, values })
        }
    }

    fn entity(name: &str) -> EntityConfig {
        EntityConfig {
            name: name.to_string(),
            ambiguous: false,
        }
    }

    fn quiet_config() -> CollectorConfig {
        CollectorConfig {
            delay_secs: (0.0, 0.0),
            cooldown_secs: 0,
            disambiguation_suffix: "celebrity".to_string(),
        }
    }

    #[tokio::test]
    async fn roster_is_partitioned_into_cap_sized_batches() {
        let source = ScriptedSource::new(2, vec![]);
        let roster = vec![
            entity("A"),
            entity("B"),
            entity("C"),
            entity("D"),
            entity("E"),
        ];

        let rows = collect_interest_series(&source, &roster, &quiet_config()).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], vec!["A", "B"]);
        assert_eq!(calls[1], vec!["C", "D"]);
        assert_eq!(calls[2], vec!["E"]);
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn ambiguous_rewrite_is_cosmetic_to_the_query_only() {
        let source = ScriptedSource::new(5, vec![]);
        let roster = vec![
            EntityConfig {
                name: "Mario".to_string(),
                ambiguous: true,
            },
            entity("Zendaya"),
        ];

        let rows = collect_interest_series(&source, &roster, &quiet_config()).await;

        // The provider saw the suffixed term…
        assert_eq!(source.calls()[0], vec!["Mario celebrity", "Zendaya"]);
        // …but the output stays keyed by the roster name.
        let entities: Vec<&str> = rows.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, vec!["Mario", "Zendaya"]);
    }

    #[tokio::test]
    async fn failing_batch_is_discarded_without_aborting_the_run() {
        let source = ScriptedSource::new(2, vec![1]);
        let roster = vec![
            entity("A"),
            entity("B"),
            entity("C"),
            entity("D"),
            entity("E"),
        ];

        let rows = collect_interest_series(&source, &roster, &quiet_config()).await;

        // All three batches were attempted; only the middle one lost its rows.
        assert_eq!(source.calls().len(), 3);
        let entities: Vec<&str> = rows.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, vec!["A", "B", "E"]);
    }

    #[tokio::test]
    async fn terms_missing_from_the_response_are_skipped() {
        struct PartialSource;

        impl SignalSource for PartialSource {
            fn keyword_cap(&self) -> usize {
                5
            }

            async fn fetch_batch(&self, terms: &[String]) -> Result<WideSeries, TrendsError> {
                let dates = vec![NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()];
                // Only answer for the first term.
                let values: BTreeMap<String, Vec<f64>> =
                    [(terms[0].clone(), vec![42.0])].into_iter().collect();
                Ok(WideSeries { dates, values })
            }
        }

        let roster = vec![entity("Kept"), entity("Dropped")];
        let rows = collect_interest_series(&PartialSource, &roster, &quiet_config()).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, "Kept");
        assert!((rows[0].signal - 42.0).abs() < f64::EPSILON);
    }
}
