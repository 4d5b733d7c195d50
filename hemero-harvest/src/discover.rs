//! Article-link discovery on the source's opinion section.
//!
//! Drives the session from the site root to the section listing and collects
//! candidate article URLs. Every fault in here — navigation, the section link
//! never appearing, a dead session — collapses to an empty list; the caller
//! decides what zero links means. Only the cookie-consent step is additionally
//! best-effort on its own, since the overlay simply may not exist.

use std::time::Duration;

use hemero_browser::{BrowserError, By, SessionHandle};
use tracing::{debug, info, warn};

/// Landing page discovery starts from.
pub const ROOT_URL: &str = "https://elpais.com/";

/// Exact visible label of the section link on the landing page.
pub const SECTION_LABEL: &str = "Opinión";

/// The consent overlay's accept button, by id or visible text.
const CONSENT_BUTTON: &str =
    r#"//button[contains(@id, "didomi-notice-agree-button") or contains(., "Aceptar")]"#;

/// Heading links on the section listing page.
const ARTICLE_LINKS: &str = "article h2 a";

/// Bound on page-load and article-link presence waits. Generous because the
/// remote grid renders on real devices.
const PAGE_WAIT: Duration = Duration::from_secs(20);

/// Bound on finding the section navigation link.
const SECTION_WAIT: Duration = Duration::from_secs(10);

/// Collect up to `cap` article URLs from the opinion section, in document
/// order. Returns an empty list when discovery fails for any reason.
pub async fn discover(session: &dyn SessionHandle, cap: usize) -> Vec<String> {
    match discover_links(session, cap).await {
        Ok(links) => {
            info!(
                target: "harvest.discover",
                count = links.len(),
                cap,
                "discover.links"
            );
            debug!(target: "harvest.discover", urls = ?links, "discover.urls");
            links
        }
        Err(error) => {
            warn!(target: "harvest.discover", %error, "discover.failed");
            Vec::new()
        }
    }
}

async fn discover_links(
    session: &dyn SessionHandle,
    cap: usize,
) -> Result<Vec<String>, BrowserError> {
    session.navigate(ROOT_URL).await?;

    // Load confirmation; grids occasionally serve an interstitial here and
    // the title makes that visible in the logs.
    let page_title = session.title().await?;
    info!(target: "harvest.discover", page_title = %page_title, "discover.page_loaded");

    dismiss_consent(session).await;

    let section_link = session
        .find(By::LinkText(SECTION_LABEL), SECTION_WAIT)
        .await?;
    section_link.click().await?;
    debug!(target: "harvest.discover", section = SECTION_LABEL, "discover.section_opened");

    let elements = session.find_all(By::Css(ARTICLE_LINKS), PAGE_WAIT).await?;

    // Cap first, then drop elements without a usable target; a missing href
    // inside the first `cap` elements is not backfilled from later ones.
    let mut links = Vec::new();
    for element in elements.iter().take(cap) {
        if let Some(href) = element.attr("href").await? {
            if !href.is_empty() {
                links.push(href);
            }
        }
    }

    Ok(links)
}

/// Best-effort dismissal of the cookie overlay. The button not being there
/// is the common case on repeat visits and never an error.
async fn dismiss_consent(session: &dyn SessionHandle) {
    match session.find(By::XPath(CONSENT_BUTTON), PAGE_WAIT).await {
        Ok(button) => match button.click().await {
            Ok(()) => debug!(target: "harvest.discover", "discover.consent_dismissed"),
            Err(error) => {
                debug!(target: "harvest.discover", %error, "discover.consent_click_failed")
            }
        },
        Err(error) => {
            debug!(target: "harvest.discover", %error, "discover.consent_not_found")
        }
    }
}
