//! Run-mode handlers, called from `main` once config and logging are up.
//!
//! Per-entity and per-batch failures are handled inside the components;
//! these handlers only fail on configuration, I/O, or cache-durability
//! errors.

use std::path::Path;

use starheat_core::{load_roster, table, AppConfig};
use starheat_fetch::FetchClient;
use starheat_gdelt::GdeltClient;
use starheat_heat::{decompose_heat, AggregateConfig, RatioCache, StopSignal};
use starheat_social::SocialResolver;
use starheat_trends::{collect_interest_series, CollectorConfig, TrendsHttpSource};

use crate::output;

fn build_fetch(config: &AppConfig) -> anyhow::Result<FetchClient> {
    FetchClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.http_max_attempts,
        config.http_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

pub(crate) async fn run_trends(config: &AppConfig, output_path: &Path) -> anyhow::Result<()> {
    let roster = load_roster(&config.roster_path)?;
    tracing::info!(entities = roster.len(), "collecting interest series");

    let fetch = build_fetch(config)?;
    let source = TrendsHttpSource::new(
        fetch,
        &config.trends_base_url,
        &config.trends_geo,
        &config.trends_timeframe,
    );
    let collector_config = CollectorConfig {
        delay_secs: config.trends_delay_secs,
        cooldown_secs: config.trends_cooldown_secs,
        disambiguation_suffix: config.disambiguation_suffix.clone(),
    };

    let rows = collect_interest_series(&source, &roster, &collector_config).await;
    table::write_series_table(output_path, &rows)?;
    tracing::info!(
        rows = rows.len(),
        output = %output_path.display(),
        "interest series written"
    );
    Ok(())
}

pub(crate) async fn run_social(config: &AppConfig, output_path: &Path) -> anyhow::Result<()> {
    let roster = load_roster(&config.roster_path)?;
    let names: Vec<String> = roster.into_iter().map(|entity| entity.name).collect();
    tracing::info!(entities = names.len(), "resolving social profiles");

    let fetch = build_fetch(config)?;
    let resolver = SocialResolver::new(fetch);
    let profiles = resolver.resolve_roster(&names, config.social_delay_secs).await;

    output::write_social_table(output_path, &profiles)?;
    tracing::info!(
        profiles = profiles.len(),
        output = %output_path.display(),
        "social profiles written"
    );
    Ok(())
}

pub(crate) async fn run_heat(
    config: &AppConfig,
    input_path: &Path,
    output_path: &Path,
    cache_override: Option<&Path>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let raw = table::read_series_table(input_path)?;
    let cache_path = cache_override.unwrap_or(&config.heat_cache_path);
    let mut cache = RatioCache::load(cache_path);
    tracing::info!(
        rows = raw.len(),
        cached_pairs = cache.len(),
        cache = %cache_path.display(),
        "starting heat decomposition"
    );

    let fetch = build_fetch(config)?;
    let source = GdeltClient::new(fetch);
    let aggregate_config = AggregateConfig {
        granularity: config.heat_granularity,
        delay_secs: config.heat_delay_secs,
        max_new_pairs: limit.or(config.heat_max_new_pairs),
    };

    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received — flushing cache and writing partial output");
                stop.trigger();
            }
        });
    }

    let outcome = decompose_heat(&raw, &mut cache, &source, &aggregate_config, &stop).await?;
    output::write_heat_table(output_path, &outcome.rows)?;

    if outcome.interrupted {
        tracing::warn!(
            resolved = outcome.resolved_pairs,
            total_pairs = outcome.total_pairs,
            output = %output_path.display(),
            "run interrupted — partial output written; re-run to resume"
        );
    } else {
        tracing::info!(
            rows = outcome.rows.len(),
            resolved = outcome.resolved_pairs,
            total_pairs = outcome.total_pairs,
            dropped_rows = outcome.dropped_rows,
            output = %output_path.display(),
            "heat decomposition written"
        );
    }
    Ok(())
}
