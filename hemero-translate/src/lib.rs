//! Title translation via an external HTTP service.
//!
//! [`Translator`] is the seam the harvest pipeline drives; [`RapidTranslateClient`]
//! implements it against a RapidAPI-hosted translation endpoint. Batch
//! translation is strictly per item: one request per title, one sentinel per
//! failed title, order preserved.

mod rapid;
mod traits;

pub use rapid::{RapidTranslateClient, RAPID_TRANSLATE_URL};
pub use traits::{TranslateError, Translator};

/// Substituted for any title whose translation failed. Downstream word
/// counting sees it as ordinary text, so a partially failed batch still
/// produces a full result set.
pub const TRANSLATION_FAILED: &str = "[Translation Failed]";
