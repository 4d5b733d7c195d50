//! Shared types and utilities for the hemeroteca workspace.
//!
//! This crate defines the browser/device target descriptions every other crate
//! consumes, plus centralised observability helpers. It is intentionally
//! lightweight so that all crates can depend on it without introducing heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`BrowserTarget`]: a desktop or device environment one session runs under
//! - [`Orientation`]: physical orientation for device-shaped targets
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use hemero_common::BrowserTarget;
//!
//! let target = BrowserTarget::Desktop {
//!     browser: "Chrome".into(),
//!     os: "Windows".into(),
//!     os_version: "10".into(),
//!     browser_version: Some("latest".into()),
//! };
//! assert_eq!(target.label(), "Chrome latest on Windows 10");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// A browser/device environment one harvesting session runs under.
///
/// Desktop targets name an operating system, device targets name physical
/// hardware. The two shapes are kept as a single tagged enum so the one site
/// that builds grid capability requests can pattern-match exhaustively rather
/// than sniff fields at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowserTarget {
    Desktop {
        browser: String,
        os: String,
        os_version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        browser_version: Option<String>,
    },
    Device {
        browser: String,
        device: String,
        os_version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        orientation: Option<Orientation>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        browser_version: Option<String>,
    },
}

impl BrowserTarget {
    /// Human-readable label used for grid session names and reports.
    pub fn label(&self) -> String {
        match self {
            Self::Desktop {
                browser,
                os,
                os_version,
                browser_version,
            } => match browser_version {
                Some(version) => format!("{browser} {version} on {os} {os_version}"),
                None => format!("{browser} on {os} {os_version}"),
            },
            Self::Device {
                browser,
                device,
                os_version,
                ..
            } => format!("{browser} on {device} ({os_version})"),
        }
    }
}

/// Physical orientation of a device-shaped target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}
