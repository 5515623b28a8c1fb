//! Fundstr Verify - Headless UI Verification Runner
//!
//! This crate drives a headless Chromium instance against a running Fundstr
//! web app and verifies eventually-consistent, client-rendered UI: navigate
//! to a view, wait on a chain of polled conditions with independent
//! timeouts, perform an interaction, and capture screenshot evidence while
//! degrading gracefully on failure.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ Verification Runner ──▶ Session (CDP)
//!              │                      │
//!              ▼                      ▼
//!        Step Sequence          Locators + Capture
//!        (navigate, wait,       (probe, click, fill,
//!         fill, click, shot)     screenshot PNGs)
//! ```
//!
//! # Resilience contract
//!
//! Steps run strictly in declaration order. The first failing
//! non-screenshot step aborts the remainder, but the runner still attempts
//! one error screenshot before closing the browser: partial evidence must
//! survive failure. The session is closed exactly once on every path.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fundstr_verify::browser::{Session, SessionConfig};
//! use fundstr_verify::runner::{RunnerOptions, VerificationRunner};
//! use fundstr_verify::scenarios;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::launch(SessionConfig::default()).await?;
//!     let options = RunnerOptions::new(Url::parse("http://localhost:9000")?);
//!
//!     let runner = VerificationRunner::new(session, options);
//!     let result = runner.run(&scenarios::find_creators_initial()).await;
//!
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod error;
pub mod runner;
pub mod scenarios;

// Re-exports for convenience
pub use browser::{Locator, Session, SessionConfig};
pub use error::{Error, Result};
pub use runner::{RunnerOptions, StepSequence, VerificationResult, VerificationRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
