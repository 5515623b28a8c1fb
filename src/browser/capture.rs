//! Screenshot capture
//!
//! Evidence screenshots are written straight to caller-specified PNG paths.
//! Failures here surface as [`CaptureError`] so the runner can demote them
//! to diagnostic log entries instead of aborting the run.

use crate::error::{CaptureError, Result};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use std::path::Path;
use tracing::{debug, instrument};

/// Options for a screenshot capture
#[derive(Debug, Clone)]
pub struct ScreenshotOptions {
    /// Capture the full page rather than just the viewport (default: true)
    pub full_page: bool,
    /// Clip the capture to the first element matching this CSS selector
    pub clip_selector: Option<String>,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            full_page: true,
            clip_selector: None,
        }
    }
}

impl ScreenshotOptions {
    /// Full-page capture
    pub fn full_page() -> Self {
        Self::default()
    }

    /// Capture clipped to one element
    pub fn element<S: Into<String>>(selector: S) -> Self {
        Self {
            full_page: false,
            clip_selector: Some(selector.into()),
        }
    }
}

/// Capture a PNG screenshot and write it to `path`, returning bytes written
#[instrument(skip(page, options))]
pub async fn screenshot_to_file(
    page: &Page,
    path: &Path,
    options: &ScreenshotOptions,
) -> Result<u64> {
    let data = match options.clip_selector {
        Some(ref selector) => element_png(page, selector).await?,
        None => page_png(page, options.full_page).await?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(path, e))?;
        }
    }

    tokio::fs::write(path, &data)
        .await
        .map_err(|e| write_failed(path, e))?;

    debug!(path = %path.display(), bytes = data.len(), "Screenshot written");
    Ok(data.len() as u64)
}

async fn page_png(page: &Page, full_page: bool) -> Result<Vec<u8>> {
    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .from_surface(true)
        .capture_beyond_viewport(full_page)
        .build();

    let data = page
        .screenshot(params)
        .await
        .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;
    Ok(data)
}

async fn element_png(page: &Page, selector: &str) -> Result<Vec<u8>> {
    let element = page
        .find_element(selector)
        .await
        .map_err(|e| CaptureError::ScreenshotFailed(format!("element `{selector}`: {e}")))?;

    let data = element
        .screenshot(CaptureScreenshotFormat::Png)
        .await
        .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;
    Ok(data)
}

fn write_failed(path: &Path, err: std::io::Error) -> CaptureError {
    CaptureError::WriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_options_default() {
        let opts = ScreenshotOptions::default();
        assert!(opts.full_page);
        assert!(opts.clip_selector.is_none());
    }

    #[test]
    fn test_element_options() {
        let opts = ScreenshotOptions::element(".profile-card");
        assert!(!opts.full_page);
        assert_eq!(opts.clip_selector.as_deref(), Some(".profile-card"));
    }

    #[test]
    fn test_write_failed_names_path() {
        let err = write_failed(
            Path::new("shots/01-initial.png"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("shots/01-initial.png"));
        assert!(msg.contains("denied"));
    }
}
