//! The verification runner
//!
//! Orchestrates one sequential session against a target page: launch →
//! navigate → wait-chain → interact → capture → teardown. Steps run
//! strictly in declaration order, each under its own timeout. On the first
//! non-screenshot failure the remaining steps are skipped, one best-effort
//! error screenshot is attempted, and the session is closed. Partial
//! evidence must survive failure.
//!
//! Sequencing is separated from per-step side effects behind [`StepDriver`]
//! so the short-circuit and teardown rules are testable without a browser;
//! the CDP-backed driver is the only production implementation.

pub mod poll;
pub mod report;
pub mod step;

pub use poll::{poll_until, DEFAULT_POLL_INTERVAL};
pub use report::{Artifact, VerificationResult};
pub use step::{
    ExpectedState, Step, StepKind, StepRef, StepSequence, WaitCondition, DEFAULT_NAV_TIMEOUT,
    DEFAULT_WAIT_TIMEOUT,
};

use crate::browser::{capture, locator, ScreenshotOptions, Session};
use crate::error::{ConditionError, Error, NavigationError, Result};
use chrono::{DateTime, Local};
use report::DiagnosticLog;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Default directory for evidence screenshots
pub const DEFAULT_SHOTS_DIR: &str = "verification-shots";

/// How a [`VerificationRunner`] resolves routes and captures evidence
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Base URL of the target application
    pub base_url: Url,
    /// Directory screenshots are written into
    pub shots_dir: PathBuf,
    /// Interval between condition probes
    pub poll_interval: Duration,
    /// Grace window after the load event before navigation is considered
    /// settled
    pub settle_grace: Duration,
}

impl RunnerOptions {
    /// Options for a target application base URL, with defaults for the rest
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            shots_dir: PathBuf::from(DEFAULT_SHOTS_DIR),
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_grace: Duration::from_millis(500),
        }
    }

    /// Set the screenshot directory
    pub fn shots_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.shots_dir = dir.into();
        self
    }

    /// Set the condition poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Executes one verification sequence against one exclusively-owned session
pub struct VerificationRunner {
    session: Session,
    options: RunnerOptions,
}

impl VerificationRunner {
    /// Wrap a launched session
    pub fn new(session: Session, options: RunnerOptions) -> Self {
        Self { session, options }
    }

    /// Run the sequence to completion or first failure.
    ///
    /// Consumes the runner; the session is closed exactly once on every
    /// path before this returns. Failures are reported in the result, not
    /// as errors.
    #[instrument(skip(self, sequence), fields(steps = sequence.len()))]
    pub async fn run(self, sequence: &StepSequence) -> VerificationResult {
        let target = self.options.base_url.to_string();
        let driver = CdpDriver {
            session: self.session,
            options: self.options,
        };
        run_with_driver(driver, &target, sequence).await
    }
}

/// Per-step side effects, decoupled from the sequencing rules
trait StepDriver {
    /// Perform one step, appending any artifact it produced
    async fn apply(&mut self, step: &Step, artifacts: &mut Vec<Artifact>) -> Result<()>;

    /// Best-effort failure evidence; must never surface an error
    async fn capture_failure_evidence(
        &mut self,
        log: &mut DiagnosticLog,
        artifacts: &mut Vec<Artifact>,
    );

    /// Release the underlying session; consuming `self` is what makes
    /// "closed exactly once" hold
    async fn shutdown(self) -> Result<()>;
}

/// Drive a full run: execute, failure evidence, mandatory teardown
async fn run_with_driver<D: StepDriver>(
    mut driver: D,
    target: &str,
    sequence: &StepSequence,
) -> VerificationResult {
    let mut log = DiagnosticLog::new();
    let mut artifacts = Vec::new();

    log.note(format!(
        "run started against {target} ({} step(s))",
        sequence.len()
    ));

    let outcome = execute(&mut driver, sequence, &mut log, &mut artifacts).await;

    let failed_step = match outcome {
        Ok(()) => {
            log.note("all steps completed");
            None
        }
        Err((step_ref, err)) => {
            log.note(format!(
                "step {} ({}) failed: {err}",
                step_ref.index, step_ref.detail
            ));
            driver
                .capture_failure_evidence(&mut log, &mut artifacts)
                .await;
            Some(step_ref)
        }
    };

    match driver.shutdown().await {
        Ok(()) => log.note("session closed"),
        Err(e) => {
            warn!("session close failed: {e}");
            log.note(format!("session close failed: {e}"));
        }
    }

    VerificationResult {
        succeeded: failed_step.is_none(),
        failed_step,
        artifacts,
        diagnostic_log: log.into_entries(),
    }
}

/// Execute steps strictly in order; screenshot failures are demoted to
/// log entries, anything else short-circuits
async fn execute<D: StepDriver>(
    driver: &mut D,
    sequence: &StepSequence,
    log: &mut DiagnosticLog,
    artifacts: &mut Vec<Artifact>,
) -> std::result::Result<(), (StepRef, Error)> {
    for (index, step) in sequence.iter().enumerate() {
        log.note(format!("step {index}: {}", step.detail()));
        match driver.apply(step, artifacts).await {
            Ok(()) => {}
            Err(err) if step.kind() == StepKind::Screenshot => {
                log.note(format!("step {index}: capture failed, continuing: {err}"));
            }
            Err(err) => return Err((StepRef::of(index, step), err)),
        }
    }
    Ok(())
}

/// The production driver: one CDP session plus runner options
struct CdpDriver {
    session: Session,
    options: RunnerOptions,
}

impl StepDriver for CdpDriver {
    async fn apply(&mut self, step: &Step, artifacts: &mut Vec<Artifact>) -> Result<()> {
        match step {
            Step::Navigate { route, timeout } => {
                self.navigate(route.as_deref(), *timeout).await
            }
            Step::Wait(cond) => {
                let page = self.session.page();
                let observed =
                    poll_until(self.options.poll_interval, cond.timeout, move || async move {
                        let probe = locator::probe(page, &cond.locator).await?;
                        Ok(cond.satisfied_by(&probe))
                    })
                    .await?;
                if observed {
                    Ok(())
                } else {
                    Err(ConditionError::Timeout {
                        description: cond.describe(),
                        timeout_ms: cond.timeout.as_millis() as u64,
                    }
                    .into())
                }
            }
            Step::FillInput { label, value } => {
                locator::fill(
                    self.session.page(),
                    &locator::Locator::label(label.as_str()),
                    value,
                )
                .await
            }
            Step::Click { target } => locator::click(self.session.page(), target).await,
            Step::Screenshot { name, clip } => {
                let path = self.options.shots_dir.join(format!("{name}.png"));
                let shot_options = match clip {
                    Some(selector) => ScreenshotOptions::element(selector.clone()),
                    None => ScreenshotOptions::full_page(),
                };
                let bytes =
                    capture::screenshot_to_file(self.session.page(), &path, &shot_options).await?;
                artifacts.push(Artifact {
                    label: name.clone(),
                    path,
                    bytes,
                });
                Ok(())
            }
        }
    }

    async fn capture_failure_evidence(
        &mut self,
        log: &mut DiagnosticLog,
        artifacts: &mut Vec<Artifact>,
    ) {
        let name = error_artifact_name(Local::now());
        let path = self.options.shots_dir.join(format!("{name}.png"));
        match capture::screenshot_to_file(
            self.session.page(),
            &path,
            &ScreenshotOptions::full_page(),
        )
        .await
        {
            Ok(bytes) => {
                log.note(format!("error screenshot written to {}", path.display()));
                artifacts.push(Artifact {
                    label: "error".to_string(),
                    path,
                    bytes,
                });
            }
            Err(e) => log.note(format!("error screenshot failed: {e}")),
        }
    }

    async fn shutdown(self) -> Result<()> {
        self.session.close().await
    }
}

impl CdpDriver {
    async fn navigate(&self, route: Option<&str>, timeout: Duration) -> Result<()> {
        let url = resolve_target(&self.options.base_url, route)?;
        let timeout_ms = timeout.as_millis() as u64;
        debug!("navigating to {url}");

        let started = tokio::time::Instant::now();
        let page = self.session.page();
        tokio::time::timeout(timeout, page.goto(url.as_str()))
            .await
            .map_err(|_| NavigationError::Timeout(timeout_ms))?
            .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

        // Quiescence: load event plus a short settle window for the SPA to
        // finish its first render. The whole step shares one deadline, so
        // the settle wait only gets whatever the load left over.
        let script = format!(
            r#"new Promise((resolve) => {{
                const settle = {settle_ms};
                if (document.readyState === 'complete') {{
                    setTimeout(() => resolve(true), settle);
                }} else {{
                    window.addEventListener('load', () =>
                        setTimeout(() => resolve(true), settle));
                }}
            }})"#,
            settle_ms = self.options.settle_grace.as_millis(),
        );

        let remaining = remaining_budget(timeout, started.elapsed());
        tokio::time::timeout(remaining, page.evaluate(script.as_str()))
            .await
            .map_err(|_| NavigationError::Timeout(timeout_ms))?
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}

/// Resolve the base URL plus optional route fragment into a navigable URL
fn resolve_target(base: &Url, route: Option<&str>) -> Result<Url> {
    let url = match route {
        Some(route) => base
            .join(route)
            .map_err(|e| NavigationError::InvalidUrl(format!("{route}: {e}")))?,
        None => base.clone(),
    };
    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => {
            Err(NavigationError::InvalidUrl(format!("unsupported scheme `{other}`: {url}")).into())
        }
    }
}

/// What is left of a step's single declared deadline after `elapsed`
fn remaining_budget(total: Duration, elapsed: Duration) -> Duration {
    total.saturating_sub(elapsed)
}

/// Timestamped name for the failure screenshot
fn error_artifact_name(now: DateTime<Local>) -> String {
    format!("error-{}", now.format("%Y%m%d-%H%M%S"))
}
