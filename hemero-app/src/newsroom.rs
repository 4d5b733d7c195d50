//! Turns a loaded configuration into running collaborators, drains the
//! session pool, and reports what every session brought home.
//!
//! The process exits non-zero only when startup itself fails (bad
//! credentials shape, unusable endpoints, no targets). Once the pool is
//! running, per-session failures are part of the report, not a process
//! error.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use hemero_browser::{GridCredentials, WebDriverGrid};
use hemero_config::HarvestConfig;
use hemero_harvest::{Orchestrator, RunnerSettings, SessionOutcome, SessionRunner};
use hemero_http::HttpClient;
use hemero_translate::RapidTranslateClient;
use tracing::{error, info};

pub async fn run(config: HarvestConfig) -> Result<()> {
    if config.targets.is_empty() {
        bail!("no browser targets configured");
    }

    let credentials = grid_credentials(&config)?;
    let local_grid = credentials.is_none();
    let grid = WebDriverGrid::new(&config.grid.hub_url, credentials);
    let translator =
        RapidTranslateClient::new(&config.translator.api_key, &config.translator.api_host)
            .context("building translation client")?;
    let http =
        HttpClient::new(hemero_harvest::discover::ROOT_URL).context("building http client")?;

    let runner = SessionRunner::new(
        Arc::new(grid),
        Arc::new(translator),
        http,
        RunnerSettings {
            image_dir: config.harvest.image_dir.clone(),
            source_lang: config.translator.source_lang.clone(),
            target_lang: config.translator.target_lang.clone(),
        },
    );
    let orchestrator = Orchestrator::new(runner, config.harvest.max_parallel_sessions);

    info!(
        target: "hemeroteca",
        targets = config.targets.len(),
        max_parallel = config.harvest.max_parallel_sessions,
        local_grid,
        image_dir = %config.harvest.image_dir.display(),
        "harvest.start"
    );

    let outcomes = orchestrator.run_all(&config.targets).await;
    report(&outcomes);

    Ok(())
}

/// Both halves of the grid credential pair, or neither (local endpoint).
fn grid_credentials(config: &HarvestConfig) -> Result<Option<GridCredentials>> {
    match (&config.grid.username, &config.grid.access_key) {
        (Some(username), Some(access_key)) => Ok(Some(GridCredentials {
            username: username.clone(),
            access_key: access_key.clone(),
        })),
        (None, None) => Ok(None),
        _ => bail!("grid credentials need both username and access_key, or neither"),
    }
}

fn report(outcomes: &[SessionOutcome]) {
    for outcome in outcomes {
        if outcome.is_success() {
            info!(
                target: "hemeroteca",
                config_id = outcome.config_id,
                target_label = %outcome.target_label,
                articles = outcome.articles.len(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "session.report"
            );
            for (article, translated) in outcome.articles.iter().zip(&outcome.translated_titles) {
                info!(
                    target: "hemeroteca",
                    config_id = outcome.config_id,
                    original = %article.title,
                    translated = %translated,
                    "title.translated"
                );
            }
            if outcome.repeated_words.is_empty() {
                info!(
                    target: "hemeroteca",
                    config_id = outcome.config_id,
                    "repeated_words.none"
                );
            }
            for (word, count) in &outcome.repeated_words {
                info!(
                    target: "hemeroteca",
                    config_id = outcome.config_id,
                    word = %word,
                    count = *count,
                    "repeated_words.entry"
                );
            }
        } else {
            error!(
                target: "hemeroteca",
                config_id = outcome.config_id,
                target_label = %outcome.target_label,
                error = %outcome.error.as_deref().unwrap_or("unknown"),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "session.report_failure"
            );
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        target: "hemeroteca",
        sessions = outcomes.len(),
        succeeded,
        failed = outcomes.len() - succeeded,
        "harvest.finished"
    );
}
