//! Browser automation layer
//!
//! Session lifecycle, locator resolution, and screenshot capture over
//! ChromiumOxide (CDP). The runner treats everything here as a fixed
//! capability: launch, navigate, evaluate, capture, close.

pub mod capture;
pub mod locator;
pub mod session;

pub use capture::{screenshot_to_file, ScreenshotOptions};
pub use locator::{Locator, Probe};
pub use session::{Session, SessionConfig};
