//! Per-session report types.
//!
//! A [`SessionOutcome`] is built exactly once per session run and never
//! mutated afterwards; the orchestrator only collects and reports them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Structured content harvested from one article page.
///
/// Missing pieces degrade to defaults rather than failing the record: an
/// unlocatable heading becomes the [`NO_TITLE`](crate::NO_TITLE) sentinel,
/// a failed image save leaves `image_path` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub content: String,
    pub image_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Success,
    Failure,
}

/// Everything one session run produced, success or failure.
///
/// `translated_titles` always has one entry per article and `repeated_words`
/// is computed over the translations only. A failed run carries empty
/// collections plus the diagnostic; partial data is dropped with it.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// 1-based position of the target in the configured list.
    pub config_id: usize,
    pub target_label: String,
    pub status: SessionStatus,
    pub articles: Vec<ArticleRecord>,
    pub translated_titles: Vec<String>,
    pub repeated_words: HashMap<String, usize>,
    pub error: Option<String>,
    /// Wall-clock time from acquisition attempt to release.
    pub elapsed: Duration,
}

impl SessionOutcome {
    pub fn success(
        config_id: usize,
        target_label: String,
        articles: Vec<ArticleRecord>,
        translated_titles: Vec<String>,
        repeated_words: HashMap<String, usize>,
        elapsed: Duration,
    ) -> Self {
        Self {
            config_id,
            target_label,
            status: SessionStatus::Success,
            articles,
            translated_titles,
            repeated_words,
            error: None,
            elapsed,
        }
    }

    pub fn failure(
        config_id: usize,
        target_label: String,
        diagnostic: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            config_id,
            target_label,
            status: SessionStatus::Failure,
            articles: Vec::new(),
            translated_titles: Vec::new(),
            repeated_words: HashMap::new(),
            error: Some(diagnostic),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SessionStatus::Success)
    }
}
