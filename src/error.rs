//! Error types for the verification runner
//!
//! The hierarchy mirrors the step taxonomy: navigation, awaited conditions,
//! element interaction, and artifact capture each get their own sub-enum so
//! the runner can decide which failures abort a run and which are demoted to
//! diagnostic log entries.

use thiserror::Error;

/// The main error type for verification operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser lifecycle errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Awaited UI condition errors
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// Element lookup and interaction errors
    #[error("Element error: {0}")]
    Element(#[from] ElementError),

    /// Artifact capture errors (screenshots)
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create the page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Browser already closed
    #[error("Browser already closed")]
    AlreadyClosed,
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page did not reach a loaded state in time
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Errors for awaited UI conditions
#[derive(Error, Debug)]
pub enum ConditionError {
    /// The awaited condition never became true before its deadline
    #[error("Condition not met after {timeout_ms}ms: {description}")]
    Timeout {
        /// Human-readable description of the unmet condition
        description: String,
        /// The declared timeout that elapsed
        timeout_ms: u64,
    },
}

/// Element lookup and interaction errors
#[derive(Error, Debug)]
pub enum ElementError {
    /// No unique element matched the locator
    #[error("Element not found: {0}")]
    NotFound(String),

    /// The element matched but cannot be interacted with (e.g. disabled)
    #[error("Element not interactable: {0}")]
    NotInteractable(String),
}

/// Artifact capture errors (screenshots)
///
/// These never abort a run; the runner logs them and continues.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Screenshot capture failed inside the browser
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// Writing the captured image to disk failed
    #[error("Artifact write failed for {path}: {reason}")]
    WriteFailed {
        /// Destination path of the artifact
        path: String,
        /// Underlying failure
        reason: String,
    },
}

/// Result type alias for verification operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Whether this error is an artifact-capture failure, which is
    /// diagnostic-only and must not abort a run
    pub fn is_capture(&self) -> bool {
        matches!(self, Error::Capture(_))
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Browser(BrowserError::LaunchFailed("no chrome".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chrome"));
    }

    #[test]
    fn test_condition_timeout_carries_description() {
        let err = ConditionError::Timeout {
            description: "at least 1 element matching `.creator-card` visible".to_string(),
            timeout_ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("10000ms"));
        assert!(msg.contains(".creator-card"));
    }

    #[test]
    fn test_element_errors() {
        let err = ElementError::NotFound("role=button name=Subscribe".to_string());
        assert!(err.to_string().contains("Element not found"));

        let err = ElementError::NotInteractable("button `Pay` is disabled".to_string());
        assert!(err.to_string().contains("not interactable"));
    }

    #[test]
    fn test_navigation_timeout() {
        let err = NavigationError::Timeout(30_000);
        assert_eq!(err.to_string(), "Navigation timed out after 30000ms");
    }

    #[test]
    fn test_capture_errors_are_diagnostic_only() {
        let err: Error = CaptureError::WriteFailed {
            path: "shots/01-initial.png".to_string(),
            reason: "disk full".to_string(),
        }
        .into();
        assert!(err.is_capture());

        let fatal: Error = ElementError::NotFound("x".to_string()).into();
        assert!(!fatal.is_capture());
    }

    #[test]
    fn test_generic_error() {
        let err = Error::generic("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
