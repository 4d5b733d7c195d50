//! Shared scripted doubles for pipeline tests: an in-memory session that
//! plays back a fixed site, a provider that hands sessions out per target,
//! and a deterministic translator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use hemero_browser::{BrowserError, By, PageElement, SessionHandle, SessionProvider};
use hemero_common::observability::{LogConfig, LogFormat};
use hemero_common::BrowserTarget;
use hemero_translate::{TranslateError, Translator};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "hemero-tests",
            emit_stderr: true,
            format: if std::env::var("HEMERO_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
            ..LogConfig::default()
        };

        hemero_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// A desktop target whose label is unique per browser name.
pub fn desktop_target(browser: &str) -> BrowserTarget {
    BrowserTarget::Desktop {
        browser: browser.to_string(),
        os: "Windows".to_string(),
        os_version: "10".to_string(),
        browser_version: None,
    }
}

/// Minimal article page with one heading and two paragraphs.
pub fn article_html(title: &str) -> String {
    format!(
        "<html><body><h1>{title}</h1><p>Párrafo uno.</p><p>Párrafo dos.</p></body></html>"
    )
}

fn timeout_for(by: By<'_>) -> BrowserError {
    BrowserError::WaitTimeout {
        locator: by.to_string(),
        waited_ms: 0,
    }
}

/// Scripted remote session. Plays back a landing page with a section link,
/// a section listing advertising `links`, and one HTML document per article
/// URL. Failure points are opt-in per script.
pub struct ScriptedSession {
    links: Vec<Option<String>>,
    html_by_url: HashMap<String, String>,
    fail_section_link: bool,
    fail_navigate_to: Vec<String>,
    latency: Duration,
    current_url: Mutex<String>,
    released: Arc<AtomicBool>,
    pool_gauge: Option<Arc<PoolGauge>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            html_by_url: HashMap::new(),
            fail_section_link: false,
            fail_navigate_to: Vec::new(),
            latency: Duration::ZERO,
            current_url: Mutex::new(String::new()),
            released: Arc::new(AtomicBool::new(false)),
            pool_gauge: None,
        }
    }

    /// Advertise these hrefs on the section listing, in order.
    pub fn with_links(mut self, links: &[&str]) -> Self {
        self.links
            .extend(links.iter().map(|href| Some(href.to_string())));
        self
    }

    /// Advertise one listing element that has no `href` target.
    pub fn with_missing_href_link(mut self) -> Self {
        self.links.push(None);
        self
    }

    /// Serve `html` as the page source once `url` has been navigated to.
    pub fn with_article(mut self, url: &str, html: &str) -> Self {
        self.html_by_url.insert(url.to_string(), html.to_string());
        self
    }

    /// The section navigation link never appears within its wait.
    pub fn with_missing_section_link(mut self) -> Self {
        self.fail_section_link = true;
        self
    }

    /// Navigation to `url` faults at the transport level.
    pub fn with_navigate_fault(mut self, url: &str) -> Self {
        self.fail_navigate_to.push(url.to_string());
        self
    }

    /// Sleep this long inside every navigate, to force session overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Flips to `true` exactly when `quit` runs.
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }

    fn current_html(&self) -> String {
        let current = self.current_url.lock().unwrap().clone();
        self.html_by_url
            .get(&current)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string())
    }
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionHandle for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        if self.latency > Duration::ZERO {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_navigate_to.iter().any(|bad| bad == url) {
            return Err(BrowserError::Session(format!("lost contact loading {url}")));
        }
        *self.current_url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn title(&self) -> Result<String, BrowserError> {
        Ok("EL PAÍS: el periódico global".to_string())
    }

    async fn find(&self, by: By<'_>, _wait: Duration) -> Result<Box<dyn PageElement>, BrowserError> {
        match by {
            // No consent overlay in the scripted site.
            By::XPath(_) => Err(timeout_for(by)),
            By::LinkText(_) => {
                if self.fail_section_link {
                    Err(timeout_for(by))
                } else {
                    Ok(Box::new(ScriptedElement::Plain))
                }
            }
            By::Css(selector) => {
                if self.current_html().contains(&format!("<{selector}")) {
                    Ok(Box::new(ScriptedElement::Plain))
                } else {
                    Err(timeout_for(by))
                }
            }
        }
    }

    async fn find_all(
        &self,
        by: By<'_>,
        _wait: Duration,
    ) -> Result<Vec<Box<dyn PageElement>>, BrowserError> {
        match by {
            By::Css("article h2 a") => {
                if self.links.is_empty() {
                    return Err(timeout_for(by));
                }
                Ok(self
                    .links
                    .iter()
                    .map(|href| {
                        Box::new(ScriptedElement::Link { href: href.clone() })
                            as Box<dyn PageElement>
                    })
                    .collect())
            }
            other => Err(BrowserError::Session(format!(
                "unexpected find_all: {other}"
            ))),
        }
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.current_html())
    }

    async fn quit(self: Box<Self>) -> Result<(), BrowserError> {
        if let Some(gauge) = &self.pool_gauge {
            gauge.leave();
        }
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub enum ScriptedElement {
    Plain,
    Link { href: Option<String> },
}

#[async_trait]
impl PageElement for ScriptedElement {
    async fn click(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        match self {
            ScriptedElement::Link { href } if name == "href" => Ok(href.clone()),
            _ => Ok(None),
        }
    }

    async fn text(&self) -> Result<String, BrowserError> {
        Ok(String::new())
    }
}

/// Hands one scripted session to each target, matched by label so the
/// assignment stays deterministic under concurrent acquisition.
pub struct ScriptedProvider {
    by_label: Mutex<HashMap<String, ScriptedSession>>,
    pool_gauge: Option<Arc<PoolGauge>>,
}

impl ScriptedProvider {
    pub fn new(sessions: Vec<(BrowserTarget, ScriptedSession)>) -> Self {
        let by_label = sessions
            .into_iter()
            .map(|(target, session)| (target.label(), session))
            .collect();
        Self {
            by_label: Mutex::new(by_label),
            pool_gauge: None,
        }
    }

    pub fn with_pool_gauge(mut self, gauge: Arc<PoolGauge>) -> Self {
        self.pool_gauge = Some(gauge);
        self
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn acquire(
        &self,
        target: &BrowserTarget,
    ) -> Result<Box<dyn SessionHandle>, BrowserError> {
        let mut session = self
            .by_label
            .lock()
            .unwrap()
            .remove(&target.label())
            .ok_or_else(|| {
                BrowserError::Session(format!("no scripted session for {}", target.label()))
            })?;
        if let Some(gauge) = &self.pool_gauge {
            gauge.enter();
            session.pool_gauge = Some(Arc::clone(gauge));
        }
        Ok(Box::new(session))
    }
}

/// Tracks how many sessions are live at once and the highest that got.
#[derive(Default)]
pub struct PoolGauge {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl PoolGauge {
    pub fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Uppercases every title; any title containing "boom" fails that item.
pub struct UppercaseTranslator;

#[async_trait]
impl Translator for UppercaseTranslator {
    async fn translate(&self, text: &str, _from: &str, _to: &str) -> Result<String, TranslateError> {
        if text.contains("boom") {
            return Err(TranslateError::EmptyResponse);
        }
        Ok(text.to_uppercase())
    }
}
