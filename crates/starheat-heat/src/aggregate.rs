//! The resumable aggregation loop and the heat decomposition.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use starheat_core::{Granularity, PeriodKey, RawSeriesRow};

use crate::cache::RatioCache;
use crate::error::HeatError;

/// A provider of the negative-news ratio for one (entity, period) pair.
///
/// Implementations return a value in [0, 1] and express every failure as
/// 0.0 — the aggregator treats the result as data either way.
#[allow(async_fn_in_trait)]
pub trait RatioSource {
    async fn negative_ratio(&self, entity: &str, period: &PeriodKey) -> f64;
}

/// Cooperative interruption handle for the resolution loop.
///
/// Triggering it stops further ratio lookups at the next loop iteration; the
/// cache is flushed and a partial output is still emitted. This is a defined
/// termination path, not an error.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub granularity: Granularity,
    /// Randomized delay between ratio lookups, seconds.
    pub delay_secs: (f64, f64),
    /// Optional cap on pairs resolved in this run; cached pairs and already
    /// validated rows are still written out once the cap is hit.
    pub max_new_pairs: Option<usize>,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Month,
            delay_secs: (1.0, 2.0),
            max_new_pairs: None,
        }
    }
}

/// One decomposed output observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedRow {
    pub entity: String,
    pub date: NaiveDate,
    pub signal: f64,
    pub ratio: f64,
    pub performance_heat: f64,
    pub black_red_heat: f64,
}

/// What one aggregation run did, partial or complete.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub rows: Vec<DecomposedRow>,
    /// Distinct (entity, period) pairs present in the validated input.
    pub total_pairs: usize,
    /// Pairs newly resolved during this run.
    pub resolved_pairs: usize,
    /// Input rows dropped by validation.
    pub dropped_rows: usize,
    pub interrupted: bool,
}

/// Join the raw time series with per-period sentiment ratios, resumably.
///
/// Unparsable rows are dropped with a warning. Distinct (entity, period)
/// pairs are visited in first-occurrence order; pairs already in the cache
/// are skipped without any lookup, which is what makes re-runs idempotent.
/// Each new resolution is persisted write-through before the randomized
/// delay, so an abrupt termination loses at most the lookup in flight.
/// Ratios absent from the cache — never resolved, capped out, or legitimately
/// measured as zero — default to 0.0 in the final computation.
///
/// # Errors
///
/// Returns [`HeatError`] only if cache persistence fails.
pub async fn decompose_heat<S: RatioSource>(
    raw: &[RawSeriesRow],
    cache: &mut RatioCache,
    source: &S,
    config: &AggregateConfig,
    stop: &StopSignal,
) -> Result<AggregateOutcome, HeatError> {
    // Validate and coerce the input table.
    let mut valid: Vec<(String, NaiveDate, f64, PeriodKey)> = Vec::new();
    let mut dropped = 0usize;
    for row in raw {
        match (parse_date(&row.date), parse_signal(&row.signal)) {
            (Some(date), Some(signal)) => {
                let period = PeriodKey::of(date, config.granularity);
                valid.push((row.entity.clone(), date, signal, period));
            }
            _ => {
                dropped += 1;
                tracing::warn!(
                    entity = %row.entity,
                    date = %row.date,
                    signal = %row.signal,
                    "dropping unparsable time-series row"
                );
            }
        }
    }

    // Distinct pairs in first-occurrence order.
    let mut pairs: Vec<(String, PeriodKey)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (entity, _, _, period) in &valid {
        if seen.insert(RatioCache::key(entity, period)) {
            pairs.push((entity.clone(), period.clone()));
        }
    }
    let total_pairs = pairs.len();

    // Resolve whatever is not cached yet, write-through, paced, capped,
    // interruptible.
    let mut resolved = 0usize;
    let mut interrupted = false;
    for (entity, period) in &pairs {
        if stop.is_triggered() {
            tracing::info!("interrupt received — stopping ratio resolution");
            interrupted = true;
            break;
        }
        let key = RatioCache::key(entity, period);
        if cache.contains(&key) {
            continue;
        }
        if let Some(cap) = config.max_new_pairs {
            if resolved >= cap {
                tracing::info!(cap, "new-pair cap reached — stopping ratio resolution");
                break;
            }
        }

        let ratio = source.negative_ratio(entity, period).await;
        tracing::info!(entity = %entity, period = %period, ratio, "resolved sentiment ratio");
        cache.insert_and_persist(key, ratio)?;
        resolved += 1;
        sleep_random(config.delay_secs).await;
    }

    // Final flush; also covers runs that resolved nothing against a cache
    // file that does not exist yet.
    cache.persist()?;

    let rows = valid
        .into_iter()
        .map(|(entity, date, signal, period)| {
            let ratio = cache
                .get(&RatioCache::key(&entity, &period))
                .unwrap_or(0.0);
            DecomposedRow {
                performance_heat: signal * (1.0 - ratio),
                black_red_heat: signal * ratio,
                entity,
                date,
                signal,
                ratio,
            }
        })
        .collect();

    Ok(AggregateOutcome {
        rows,
        total_pairs,
        resolved_pairs: resolved,
        dropped_rows: dropped,
        interrupted,
    })
}

/// Accept a bare date or a date-time; anything else is a validation failure.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_signal(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

async fn sleep_random((min, max): (f64, f64)) {
    if max <= 0.0 {
        return;
    }
    let secs = min + rand::random::<f64>() * (max - min);
    tokio::time::sleep(Duration::from_secs_f64(secs.max(0.0))).await;
}
