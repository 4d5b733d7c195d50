//! Session-handle abstraction over remote browser automation.
//!
//! These traits are the seam between the harvest pipeline and whatever is
//! actually driving a browser: production code goes through the fantoccini
//! client in [`crate::remote`], tests substitute scripted fakes. Element
//! handles stay opaque boxes so the pipeline never touches wire types.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hemero_common::BrowserTarget;
use thiserror::Error;

/// How to locate elements within the current document.
#[derive(Debug, Clone, Copy)]
pub enum By<'a> {
    Css(&'a str),
    LinkText(&'a str),
    XPath(&'a str),
}

impl fmt::Display for By<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            By::Css(s) => write!(f, "css:{s}"),
            By::LinkText(s) => write!(f, "link:{s}"),
            By::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to reach webdriver hub at {hub}: {message}")]
    Connect { hub: String, message: String },

    #[error("no element matching {locator} within {waited_ms}ms")]
    WaitTimeout { locator: String, waited_ms: u64 },

    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// Faults raised outside the wire protocol (providers, test doubles).
    #[error("session fault: {0}")]
    Session(String),
}

impl BrowserError {
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

/// A handle to one element in the session's current document.
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn click(&self) -> Result<(), BrowserError>;
    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError>;
    async fn text(&self) -> Result<String, BrowserError>;
}

/// One exclusive remote browser session, acquire-to-quit.
///
/// `find` and `find_all` wait for presence, bounded by `wait`; `find_all`
/// resolves as soon as one match is present and then returns every element
/// matching at that moment, in document order. `Sync` is required so a
/// borrowed handle can be held across awaits inside a spawned pipeline task.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    async fn title(&self) -> Result<String, BrowserError>;

    async fn find(&self, by: By<'_>, wait: Duration)
        -> Result<Box<dyn PageElement>, BrowserError>;

    async fn find_all(
        &self,
        by: By<'_>,
        wait: Duration,
    ) -> Result<Vec<Box<dyn PageElement>>, BrowserError>;

    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Release the remote session. Consumes the handle; a session is never
    /// reusable after quit.
    async fn quit(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Vends one exclusive [`SessionHandle`] per [`BrowserTarget`].
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self, target: &BrowserTarget)
        -> Result<Box<dyn SessionHandle>, BrowserError>;
}
