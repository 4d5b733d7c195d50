//! Browser session plumbing for the harvest pipeline.
//!
//! [`session`] defines the object-safe traits the pipeline drives
//! ([`SessionHandle`], [`PageElement`], [`SessionProvider`]); [`remote`]
//! implements them over fantoccini against a cloud grid or a plain local
//! WebDriver endpoint.

pub mod remote;
pub mod session;

pub use remote::{GridCredentials, WebDriverGrid};
pub use session::{BrowserError, By, PageElement, SessionHandle, SessionProvider};
