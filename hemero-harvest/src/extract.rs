//! Single-article extraction: title, body text, lead image.
//!
//! The session only navigates and hands back rendered HTML; all content
//! parsing happens here on the captured source, so the parse step is pure
//! and testable without a browser. Missing content never fails an
//! extraction — absent pieces degrade to defaults. Transport faults on the
//! session itself (navigation, source capture) do propagate; the runner
//! classifies those.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hemero_browser::{BrowserError, By, SessionHandle};
use hemero_http::{HttpClient, RequestOpts};
use scraper::{Html, Selector};
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

use crate::outcome::ArticleRecord;

/// Substituted when the page's primary heading cannot be located.
pub const NO_TITLE: &str = "No Title";

/// Primary heading element of an article page.
const HEADING: &str = "h1";

/// Bound on waiting for the heading after navigation. Exceeding it is
/// tolerated; extraction proceeds against whatever rendered.
const HEADING_WAIT: Duration = Duration::from_secs(20);

/// Bound on one lead-image download.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Character cap on the body-text snippet logged per article.
const PREVIEW_CHARS: usize = 200;

/// Harvest one article page into an [`ArticleRecord`].
///
/// Always yields a record when the session transport holds up: the title
/// falls back to [`NO_TITLE`], the body may be empty, and any failure while
/// fetching or writing the lead image leaves `image_path` unset.
pub async fn extract(
    session: &dyn SessionHandle,
    http: &HttpClient,
    url: &str,
    image_dir: &Path,
) -> Result<ArticleRecord, BrowserError> {
    session.navigate(url).await?;

    if let Err(error) = session.find(By::Css(HEADING), HEADING_WAIT).await {
        // Tolerated: parse whatever rendered.
        warn!(target: "harvest.extract", %error, url, "extract.heading_wait_failed");
    }

    let html = session.page_source().await?;
    let parsed = parse_article(&html);

    debug!(
        target: "harvest.extract",
        url,
        title = %parsed.title,
        content_preview = %preview(&parsed.content),
        "extract.parsed"
    );

    let image_path = match &parsed.image_url {
        Some(image_url) => save_image(http, image_url, image_dir).await,
        None => None,
    };

    Ok(ArticleRecord {
        title: parsed.title,
        content: parsed.content,
        image_path,
    })
}

#[derive(Debug, PartialEq, Eq)]
struct ParsedArticle {
    title: String,
    content: String,
    image_url: Option<String>,
}

/// Pure parse of a captured page. The document handle stays inside this
/// function; only owned strings come out, which keeps the calling future
/// `Send`.
fn parse_article(html: &str) -> ParsedArticle {
    let document = Html::parse_document(html);
    let heading = Selector::parse(HEADING).expect("static selector");
    let paragraph = Selector::parse("p").expect("static selector");
    let figure = Selector::parse("figure").expect("static selector");
    let image = Selector::parse("img").expect("static selector");

    let title = document
        .select(&heading)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let content = document
        .select(&paragraph)
        .map(|element| element.text().collect::<String>())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    // Strictly the first figure; a figure-less image elsewhere on the page
    // is not a lead image.
    let image_url = document
        .select(&figure)
        .next()
        .and_then(|figure| figure.select(&image).next())
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    ParsedArticle {
        title,
        content,
        image_url,
    }
}

/// Best-effort download of the lead image into `image_dir`.
///
/// Any failure — unusable URL, directory creation, the GET, the write —
/// logs and returns `None`. Sessions share the directory; identical source
/// filenames overwrite each other, last writer wins.
async fn save_image(http: &HttpClient, image_url: &str, image_dir: &Path) -> Option<PathBuf> {
    let file_name = match image_file_name(image_url) {
        Some(name) => name,
        None => {
            debug!(target: "harvest.extract", image_url, "image.unusable_url");
            return None;
        }
    };

    if let Err(error) = fs::create_dir_all(image_dir).await {
        warn!(
            target: "harvest.extract",
            %error,
            dir = %image_dir.display(),
            "image.dir_create_failed"
        );
        return None;
    }

    let opts = RequestOpts {
        timeout: Some(IMAGE_TIMEOUT),
        allow_absolute: true,
        ..Default::default()
    };
    let bytes = match http.get_bytes(image_url, opts).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(target: "harvest.extract", %error, image_url, "image.fetch_failed");
            return None;
        }
    };

    // Stage beside the final name; the rename publishes complete bytes only.
    let path = image_dir.join(&file_name);
    let staging = image_dir.join(format!("{file_name}.part"));
    if let Err(error) = fs::write(&staging, &bytes).await {
        warn!(target: "harvest.extract", %error, path = %staging.display(), "image.write_failed");
        return None;
    }
    if let Err(error) = fs::rename(&staging, &path).await {
        warn!(target: "harvest.extract", %error, path = %path.display(), "image.rename_failed");
        let _ = fs::remove_file(&staging).await;
        return None;
    }

    info!(
        target: "harvest.extract",
        path = %path.display(),
        bytes = bytes.len(),
        "image.saved"
    );
    Some(path)
}

/// Local filename for an image URL: the last path segment, query dropped.
/// Relative or otherwise unfetchable URLs yield `None`.
fn image_file_name(image_url: &str) -> Option<String> {
    let parsed = Url::parse(image_url).ok()?;
    let name = parsed.path_segments()?.next_back()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
