//! One end-to-end session: acquire, discover, extract, translate, analyze,
//! report — with the remote session released on every path out.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use hemero_browser::{SessionHandle, SessionProvider};
use hemero_common::BrowserTarget;
use hemero_http::HttpClient;
use hemero_translate::Translator;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::discover::discover;
use crate::extract::extract;
use crate::frequency::repeated_words;
use crate::outcome::{ArticleRecord, SessionOutcome};

/// Discovery cap per session.
pub const MAX_ARTICLES_PER_SESSION: usize = 5;

/// Per-session knobs the runner needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Shared directory lead images are written into.
    pub image_dir: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
}

/// Drives the full pipeline for one browser target at a time.
///
/// The runner is cheap to share: collaborators sit behind `Arc`s and every
/// [`run`](SessionRunner::run) call owns its session exclusively.
pub struct SessionRunner {
    provider: Arc<dyn SessionProvider>,
    translator: Arc<dyn Translator>,
    http: HttpClient,
    settings: RunnerSettings,
}

impl SessionRunner {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        translator: Arc<dyn Translator>,
        http: HttpClient,
        settings: RunnerSettings,
    ) -> Self {
        Self {
            provider,
            translator,
            http,
            settings,
        }
    }

    /// Run one session against `target` and report what happened.
    ///
    /// Never returns an error: any unrecoverable fault inside the pipeline
    /// becomes a failure outcome carrying the stage diagnostic. The session
    /// handle, once acquired, is released exactly once no matter where the
    /// pipeline stopped.
    pub async fn run(&self, config_id: usize, target: &BrowserTarget) -> SessionOutcome {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        let label = target.label();
        info!(
            target: "harvest.session",
            config_id,
            %run_id,
            target_label = %label,
            "session.start"
        );

        let session = match self.provider.acquire(target).await {
            Ok(session) => session,
            Err(acquire_error) => {
                error!(
                    target: "harvest.session",
                    config_id,
                    %run_id,
                    error = %acquire_error,
                    "session.acquire_failed"
                );
                return SessionOutcome::failure(
                    config_id,
                    label,
                    format!("acquiring session: {acquire_error}"),
                    started.elapsed(),
                );
            }
        };

        let piped = self.pipeline(session.as_ref(), config_id).await;

        // Unconditional release; a failed quit is logged, not fatal.
        match session.quit().await {
            Ok(()) => info!(target: "harvest.session", config_id, %run_id, "session.released"),
            Err(quit_error) => warn!(
                target: "harvest.session",
                config_id,
                %run_id,
                error = %quit_error,
                "session.release_failed"
            ),
        }

        match piped {
            Ok((articles, translated_titles, words)) => {
                info!(
                    target: "harvest.session",
                    config_id,
                    %run_id,
                    articles = articles.len(),
                    repeated_words = words.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "session.succeeded"
                );
                SessionOutcome::success(
                    config_id,
                    label,
                    articles,
                    translated_titles,
                    words,
                    started.elapsed(),
                )
            }
            Err(fault) => {
                error!(
                    target: "harvest.session",
                    config_id,
                    %run_id,
                    error = %format!("{fault:#}"),
                    "session.failed"
                );
                SessionOutcome::failure(config_id, label, format!("{fault:#}"), started.elapsed())
            }
        }
    }

    /// The four stages between acquire and release. Discovery is infallible
    /// (empty means zero articles, not failure); extraction faults carry
    /// enough context to name the article that broke; translation and
    /// analysis cannot fault.
    async fn pipeline(
        &self,
        session: &dyn SessionHandle,
        config_id: usize,
    ) -> anyhow::Result<(Vec<ArticleRecord>, Vec<String>, HashMap<String, usize>)> {
        let links = discover(session, MAX_ARTICLES_PER_SESSION).await;
        if links.is_empty() {
            info!(target: "harvest.session", config_id, "session.no_articles");
        }

        // Sequential on purpose: one remote session takes one command at a time.
        let mut articles = Vec::with_capacity(links.len());
        for (index, url) in links.iter().enumerate() {
            let article = extract(session, &self.http, url, &self.settings.image_dir)
                .await
                .with_context(|| {
                    format!("extracting article {} of {} ({url})", index + 1, links.len())
                })?;
            info!(
                target: "harvest.session",
                config_id,
                article = index + 1,
                title = %article.title,
                "article.extracted"
            );
            articles.push(article);
        }

        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let translated = self
            .translator
            .translate_batch(&titles, &self.settings.source_lang, &self.settings.target_lang)
            .await;
        let words = repeated_words(&translated);

        Ok((articles, translated, words))
    }
}
