//! Browser session lifecycle
//!
//! A [`Session`] owns one Chromium instance and exactly one page context for
//! the duration of a verification run. The runner acquires it before the
//! first step and is responsible for closing it on every exit path.

use crate::error::{BrowserError, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Configuration for launching a verification session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Viewport width (default: 1280)
    pub width: u32,
    /// Viewport height (default: 800)
    pub height: u32,
    /// Enable the Chromium sandbox (default: true)
    pub sandbox: bool,
    /// Path to a Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Default navigation timeout in milliseconds (default: 30000)
    pub nav_timeout_ms: u64,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1280,
            height: 800,
            sandbox: true,
            chrome_path: None,
            nav_timeout_ms: 30_000,
            extra_args: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for [`SessionConfig`]
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable the sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set the Chrome executable path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the default navigation timeout
    pub fn nav_timeout_ms(mut self, ms: u64) -> Self {
        self.config.nav_timeout_ms = ms;
        self
    }

    /// Add an extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// One browser instance plus one page context, exclusively owned by a run
pub struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    config: SessionConfig,
}

impl Session {
    /// Launch a browser and open the single page context for this session
    #[instrument(skip(config))]
    pub async fn launch(config: SessionConfig) -> Result<Self> {
        info!(headless = config.headless, "Launching browser session");

        let mut builder = CdpBrowserConfig::builder();

        builder = builder.viewport(chromiumoxide::handler::viewport::Viewport {
            width: config.width,
            height: config.height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        });

        // chromiumoxide defaults to headless; with_head opts out
        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.arg("--no-sandbox");
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| BrowserError::ConfigError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drain CDP events until the browser goes away
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        info!("Browser session ready");

        Ok(Self {
            browser,
            handler: handler_task,
            page,
            config,
        })
    }

    /// The session's single page context
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Close the browser, consuming the session
    ///
    /// Consuming `self` is what makes "closed exactly once" hold: after a
    /// close there is no handle left to close again.
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        info!("Closing browser session");

        self.browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        // Bounded wait; a stuck handler must not hang teardown
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handler).await;

        info!("Browser session closed");
        Ok(())
    }
}
