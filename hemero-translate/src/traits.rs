use async_trait::async_trait;
use thiserror::Error;

use crate::TRANSLATION_FAILED;

/// Faults a single translation attempt can surface.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Http(#[from] hemero_http::HttpError),

    /// The service answered 200 with an empty candidate list.
    #[error("translation service returned no candidates")]
    EmptyResponse,
}

/// A service that translates short strings between two languages.
///
/// `translate` is one bounded network attempt for one string. The provided
/// [`translate_batch`](Translator::translate_batch) builds on it and folds
/// per-item failures into the [`TRANSLATION_FAILED`] sentinel, so a batch
/// result is always the same length as its input.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, from: &str, to: &str)
        -> Result<String, TranslateError>;

    /// Translate every title independently, preserving input order.
    ///
    /// Position `i` of the result is the translation of `titles[i]`, or the
    /// sentinel if that item failed. One item failing never aborts the rest.
    async fn translate_batch(&self, titles: &[String], from: &str, to: &str) -> Vec<String> {
        let mut translated = Vec::with_capacity(titles.len());
        for (index, title) in titles.iter().enumerate() {
            match self.translate(title, from, to).await {
                Ok(text) => translated.push(text),
                Err(error) => {
                    tracing::warn!(
                        target: "translate.rapid",
                        index,
                        title = %title,
                        error = %error,
                        "translate.item_failed"
                    );
                    translated.push(TRANSLATION_FAILED.to_string());
                }
            }
        }
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uppercases everything except inputs containing "boom", which fail.
    struct ScriptedTranslator;

    #[async_trait]
    impl Translator for ScriptedTranslator {
        async fn translate(
            &self,
            text: &str,
            _from: &str,
            _to: &str,
        ) -> Result<String, TranslateError> {
            if text.contains("boom") {
                return Err(TranslateError::EmptyResponse);
            }
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn batch_output_always_matches_input_length() {
        let titles = vec!["uno".to_string(), "boom".to_string(), "tres".to_string()];
        let translated = ScriptedTranslator.translate_batch(&titles, "es", "en").await;
        assert_eq!(translated.len(), titles.len());
    }

    #[tokio::test]
    async fn failed_items_become_the_sentinel_in_place() {
        let titles = vec![
            "primera".to_string(),
            "boom dos".to_string(),
            "tercera".to_string(),
        ];
        let translated = ScriptedTranslator.translate_batch(&titles, "es", "en").await;

        assert_eq!(translated[0], "PRIMERA");
        assert_eq!(translated[1], TRANSLATION_FAILED);
        assert_eq!(translated[2], "TERCERA");
    }

    #[tokio::test]
    async fn failures_at_the_edges_do_not_shift_positions() {
        let titles = vec![
            "boom a".to_string(),
            "media".to_string(),
            "boom b".to_string(),
        ];
        let translated = ScriptedTranslator.translate_batch(&titles, "es", "en").await;

        assert_eq!(
            translated,
            vec![
                TRANSLATION_FAILED.to_string(),
                "MEDIA".to_string(),
                TRANSLATION_FAILED.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let translated = ScriptedTranslator.translate_batch(&[], "es", "en").await;
        assert!(translated.is_empty());
    }
}
