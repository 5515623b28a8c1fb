//! Verification steps and sequences
//!
//! A [`StepSequence`] is an ordered list of actions executed strictly
//! one-at-a-time: navigate, wait on a polled condition, fill a labeled
//! input, click, or capture a screenshot. Sequences are built fluently;
//! an optional prelude (e.g. onboarding-wizard traversal) runs before the
//! main steps but is kept separate from the core wait-chain.

use crate::browser::{Locator, Probe};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default timeout for awaited UI conditions
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for page navigation
pub const DEFAULT_NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Expected state of a [`WaitCondition`]'s matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedState {
    /// At least one match is visible
    Visible,
    /// No match is visible
    NotVisible,
    /// At least one match is visible and enabled
    Enabled,
    /// At least N elements match, visible or not
    CountAtLeast(usize),
}

/// A predicate over rendered UI state, evaluated by polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitCondition {
    /// What to look for
    pub locator: Locator,
    /// The state the matches must reach
    pub state: ExpectedState,
    /// How long to keep polling before giving up
    pub timeout: Duration,
}

impl WaitCondition {
    /// Create a condition with an explicit timeout
    pub fn new(locator: Locator, state: ExpectedState, timeout: Duration) -> Self {
        Self {
            locator,
            state,
            timeout,
        }
    }

    /// Visibility condition with the default timeout
    pub fn visible(locator: Locator) -> Self {
        Self::new(locator, ExpectedState::Visible, DEFAULT_WAIT_TIMEOUT)
    }

    /// Human-readable description, used in `ConditionTimeout` errors and
    /// the diagnostic log
    pub fn describe(&self) -> String {
        let target = self.locator.describe();
        match self.state {
            ExpectedState::Visible => format!("{target} visible"),
            ExpectedState::NotVisible => format!("{target} not visible"),
            ExpectedState::Enabled => format!("{target} enabled"),
            ExpectedState::CountAtLeast(n) => {
                format!("at least {n} element(s) matching {target}")
            }
        }
    }

    /// Whether a probe of the current page satisfies this condition
    pub fn satisfied_by(&self, probe: &Probe) -> bool {
        match self.state {
            ExpectedState::Visible => probe.visible >= 1,
            ExpectedState::NotVisible => probe.visible == 0,
            ExpectedState::Enabled => probe.enabled >= 1,
            ExpectedState::CountAtLeast(n) => probe.count >= n,
        }
    }
}

/// One ordered action in a verification sequence
#[derive(Debug, Clone)]
pub enum Step {
    /// Load the target URL (optionally a route fragment joined onto the
    /// runner's base URL) and wait for the DOM to settle
    Navigate {
        /// Route fragment, e.g. `#/find-creators`; `None` loads the base URL
        route: Option<String>,
        /// Navigation deadline
        timeout: Duration,
    },
    /// Poll a condition until satisfied or timed out
    Wait(WaitCondition),
    /// Set the value of an input located by its label text
    FillInput {
        /// Accessible label of the input
        label: String,
        /// Value to set
        value: String,
    },
    /// Click an interactive element
    Click {
        /// What to click
        target: Locator,
    },
    /// Capture an evidence screenshot; never fails the run
    Screenshot {
        /// Artifact name (file stem of the PNG)
        name: String,
        /// Optional CSS selector to clip the capture to
        clip: Option<String>,
    },
}

impl Step {
    /// The step's kind, for reporting
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Navigate { .. } => StepKind::Navigate,
            Step::Wait(_) => StepKind::Wait,
            Step::FillInput { .. } => StepKind::FillInput,
            Step::Click { .. } => StepKind::Click,
            Step::Screenshot { .. } => StepKind::Screenshot,
        }
    }

    /// Short human-readable summary, for the diagnostic log
    pub fn detail(&self) -> String {
        match self {
            Step::Navigate { route, .. } => match route {
                Some(r) => format!("navigate to {r}"),
                None => "navigate to base URL".to_string(),
            },
            Step::Wait(cond) => format!("wait for {}", cond.describe()),
            Step::FillInput { label, value } => {
                format!("fill \"{label}\" with \"{value}\"")
            }
            Step::Click { target } => format!("click {}", target.describe()),
            Step::Screenshot { name, .. } => format!("screenshot \"{name}\""),
        }
    }
}

/// Discriminant of a [`Step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// Page navigation
    Navigate,
    /// Polled condition wait
    Wait,
    /// Labeled input fill
    FillInput,
    /// Element click
    Click,
    /// Evidence screenshot
    Screenshot,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Navigate => "navigate",
            StepKind::Wait => "wait",
            StepKind::FillInput => "fill-input",
            StepKind::Click => "click",
            StepKind::Screenshot => "screenshot",
        };
        f.write_str(s)
    }
}

/// Reference to a step within a sequence, used to report failures
#[derive(Debug, Clone, Serialize)]
pub struct StepRef {
    /// Zero-based position in the executed sequence (prelude included)
    pub index: usize,
    /// The step's kind
    pub kind: StepKind,
    /// The step's summary at the time of failure
    pub detail: String,
}

impl StepRef {
    pub(crate) fn of(index: usize, step: &Step) -> Self {
        Self {
            index,
            kind: step.kind(),
            detail: step.detail(),
        }
    }
}

/// An ordered verification sequence with an optional prelude
#[derive(Debug, Clone, Default)]
pub struct StepSequence {
    prelude: Vec<Step>,
    steps: Vec<Step>,
}

impl StepSequence {
    /// Start an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a prelude executed before the main steps, e.g. an
    /// onboarding-wizard traversal
    pub fn with_prelude(mut self, prelude: Vec<Step>) -> Self {
        self.prelude = prelude;
        self
    }

    /// Append a navigation to the base URL
    pub fn navigate(self) -> Self {
        self.push(Step::Navigate {
            route: None,
            timeout: DEFAULT_NAV_TIMEOUT,
        })
    }

    /// Append a navigation to a route fragment
    pub fn navigate_to<S: Into<String>>(self, route: S) -> Self {
        self.push(Step::Navigate {
            route: Some(route.into()),
            timeout: DEFAULT_NAV_TIMEOUT,
        })
    }

    /// Append a wait for an arbitrary condition
    pub fn wait(self, locator: Locator, state: ExpectedState, timeout: Duration) -> Self {
        self.push(Step::Wait(WaitCondition::new(locator, state, timeout)))
    }

    /// Append a visibility wait with the default timeout
    pub fn wait_visible(self, locator: Locator) -> Self {
        self.push(Step::Wait(WaitCondition::visible(locator)))
    }

    /// Append a labeled-input fill
    pub fn fill_input<L: Into<String>, V: Into<String>>(self, label: L, value: V) -> Self {
        self.push(Step::FillInput {
            label: label.into(),
            value: value.into(),
        })
    }

    /// Append a click
    pub fn click(self, target: Locator) -> Self {
        self.push(Step::Click { target })
    }

    /// Append a full-page screenshot
    pub fn screenshot<S: Into<String>>(self, name: S) -> Self {
        self.push(Step::Screenshot {
            name: name.into(),
            clip: None,
        })
    }

    /// Append a screenshot clipped to a CSS selector
    pub fn screenshot_of<S: Into<String>, C: Into<String>>(self, name: S, clip: C) -> Self {
        self.push(Step::Screenshot {
            name: name.into(),
            clip: Some(clip.into()),
        })
    }

    /// Append an arbitrary step
    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// The prelude steps
    pub fn prelude(&self) -> &[Step] {
        &self.prelude
    }

    /// The main steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterate all steps in execution order, prelude first
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.prelude.iter().chain(self.steps.iter())
    }

    /// Total number of steps, prelude included
    pub fn len(&self) -> usize {
        self.prelude.len() + self.steps.len()
    }

    /// Whether the sequence has no steps at all
    pub fn is_empty(&self) -> bool {
        self.prelude.is_empty() && self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let seq = StepSequence::new()
            .navigate_to("#/find-creators")
            .wait_visible(Locator::css(".creator-card"))
            .fill_input("Search creators", "dergigi")
            .click(Locator::role("button", "Subscribe"))
            .screenshot("01-initial-load");

        let kinds: Vec<StepKind> = seq.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Navigate,
                StepKind::Wait,
                StepKind::FillInput,
                StepKind::Click,
                StepKind::Screenshot,
            ]
        );
        assert_eq!(seq.len(), 5);
    }

    #[test]
    fn test_prelude_runs_before_main_steps() {
        let prelude = vec![Step::Click {
            target: Locator::role("button", "Next"),
        }];
        let seq = StepSequence::new()
            .with_prelude(prelude)
            .navigate_to("#/find-creators");

        let kinds: Vec<StepKind> = seq.iter().map(Step::kind).collect();
        assert_eq!(kinds, vec![StepKind::Click, StepKind::Navigate]);
        assert_eq!(seq.prelude().len(), 1);
        assert_eq!(seq.steps().len(), 1);
    }

    #[test]
    fn test_condition_descriptions() {
        let cond = WaitCondition::new(
            Locator::css(".creator-card"),
            ExpectedState::CountAtLeast(1),
            Duration::from_secs(10),
        );
        assert_eq!(
            cond.describe(),
            "at least 1 element(s) matching `.creator-card`"
        );

        let cond = WaitCondition::visible(Locator::text("dergigi"));
        assert_eq!(cond.describe(), "text \"dergigi\" visible");
        assert_eq!(cond.timeout, DEFAULT_WAIT_TIMEOUT);
    }

    #[test]
    fn test_condition_satisfaction() {
        let probe = Probe {
            count: 2,
            visible: 1,
            enabled: 0,
        };

        let visible = WaitCondition::visible(Locator::css(".creator-card"));
        assert!(visible.satisfied_by(&probe));

        let hidden = WaitCondition::new(
            Locator::css(".creator-card"),
            ExpectedState::NotVisible,
            DEFAULT_WAIT_TIMEOUT,
        );
        assert!(!hidden.satisfied_by(&probe));

        let enabled = WaitCondition::new(
            Locator::css(".creator-card"),
            ExpectedState::Enabled,
            DEFAULT_WAIT_TIMEOUT,
        );
        assert!(!enabled.satisfied_by(&probe));

        let count = WaitCondition::new(
            Locator::css(".creator-card"),
            ExpectedState::CountAtLeast(2),
            DEFAULT_WAIT_TIMEOUT,
        );
        assert!(count.satisfied_by(&probe));

        let too_many = WaitCondition::new(
            Locator::css(".creator-card"),
            ExpectedState::CountAtLeast(3),
            DEFAULT_WAIT_TIMEOUT,
        );
        assert!(!too_many.satisfied_by(&probe));
    }

    #[test]
    fn test_not_visible_satisfied_when_nothing_rendered() {
        let cond = WaitCondition::new(
            Locator::css(".spinner"),
            ExpectedState::NotVisible,
            DEFAULT_WAIT_TIMEOUT,
        );
        assert!(cond.satisfied_by(&Probe::default()));
    }

    #[test]
    fn test_step_details() {
        let step = Step::Navigate {
            route: Some("#/find-creators".to_string()),
            timeout: DEFAULT_NAV_TIMEOUT,
        };
        assert_eq!(step.detail(), "navigate to #/find-creators");

        let step = Step::FillInput {
            label: "Search creators".to_string(),
            value: "dergigi".to_string(),
        };
        assert_eq!(step.detail(), "fill \"Search creators\" with \"dergigi\"");
        assert_eq!(step.kind().to_string(), "fill-input");
    }

    #[test]
    fn test_step_ref_captures_position_and_kind() {
        let step = Step::Wait(WaitCondition::visible(Locator::css(".creator-card")));
        let step_ref = StepRef::of(3, &step);
        assert_eq!(step_ref.index, 3);
        assert_eq!(step_ref.kind, StepKind::Wait);
        assert!(step_ref.detail.contains(".creator-card"));
    }

    #[test]
    fn test_empty_sequence() {
        let seq = StepSequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }
}
