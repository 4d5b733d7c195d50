//! The concurrent harvesting-and-analysis pipeline.
//!
//! One session per configured browser target, each running the same four
//! stages against the news site: discover article links, extract each
//! article, translate the titles, count repeated words in the translations.
//! Sessions run in parallel under a bounded pool; a failure inside one
//! session is recorded in its own outcome and never disturbs its siblings.
//!
//! # Module map
//!
//! - [`discover`]: find up to [`MAX_ARTICLES_PER_SESSION`] article URLs on
//!   the opinion section, collapsing every fault to an empty list
//! - [`extract`]: pull title/body/lead-image out of one article page
//! - [`frequency`]: the pure word-count step over translated titles
//! - [`runner`]: drive one session end to end, releasing it on every path
//! - [`orchestrator`]: fan sessions out, join them all, aggregate outcomes
//! - [`outcome`]: the per-session report types

pub mod discover;
pub mod extract;
pub mod frequency;
pub mod orchestrator;
pub mod outcome;
pub mod runner;

pub use discover::discover;
pub use extract::{extract, NO_TITLE};
pub use frequency::{repeated_words, REPEAT_THRESHOLD};
pub use orchestrator::Orchestrator;
pub use outcome::{ArticleRecord, SessionOutcome, SessionStatus};
pub use runner::{RunnerSettings, SessionRunner, MAX_ARTICLES_PER_SESSION};
