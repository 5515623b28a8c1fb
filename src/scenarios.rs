//! Canned verification sequences for the Fundstr discovery flow
//!
//! One parameterized builder per journey, replacing the pile of
//! near-identical one-off scripts: initial load of the Find Creators page,
//! search, the creator profile modal, and subscribing from a card. The
//! onboarding wizard traversal is a prelude, not part of any core
//! wait-chain.

use crate::browser::Locator;
use crate::runner::{ExpectedState, Step, StepSequence, DEFAULT_WAIT_TIMEOUT};
use std::time::Duration;

/// Route fragment of the discovery page
pub const FIND_CREATORS_ROUTE: &str = "#/find-creators";

/// Marker class of one creator result card
pub const CREATOR_CARD: &str = ".creator-card";

/// Marker class of the creator profile modal
pub const PROFILE_MODAL: &str = ".profile-card";

/// Accessible label of the discovery search input
pub const SEARCH_LABEL: &str = "Search creators";

/// Load the Find Creators page and capture it once at least one creator
/// card has rendered
pub fn find_creators_initial() -> StepSequence {
    StepSequence::new()
        .navigate_to(FIND_CREATORS_ROUTE)
        .wait(
            Locator::css(CREATOR_CARD),
            ExpectedState::CountAtLeast(1),
            DEFAULT_WAIT_TIMEOUT,
        )
        .screenshot("01-initial-load")
}

/// Search the discovery page for `term` and capture the results once the
/// term shows up in rendered output
pub fn find_creators_search(term: &str) -> StepSequence {
    StepSequence::new()
        .navigate_to(FIND_CREATORS_ROUTE)
        .wait(
            Locator::css(CREATOR_CARD),
            ExpectedState::CountAtLeast(1),
            DEFAULT_WAIT_TIMEOUT,
        )
        .fill_input(SEARCH_LABEL, term)
        .wait(
            Locator::text(term),
            ExpectedState::Visible,
            DEFAULT_WAIT_TIMEOUT,
        )
        .screenshot(format!("02-search-{term}"))
}

/// Open the first creator card's profile modal and capture it
pub fn creator_profile_modal() -> StepSequence {
    StepSequence::new()
        .navigate_to(FIND_CREATORS_ROUTE)
        .wait(
            Locator::css(CREATOR_CARD),
            ExpectedState::CountAtLeast(1),
            DEFAULT_WAIT_TIMEOUT,
        )
        .screenshot("01-initial-load")
        .click(Locator::css(CREATOR_CARD))
        .wait_visible(Locator::css(PROFILE_MODAL))
        .screenshot("02-modal-open")
}

/// Subscribe from a creator card and capture the confirmation
pub fn subscribe_from_card() -> StepSequence {
    StepSequence::new()
        .navigate_to(FIND_CREATORS_ROUTE)
        .wait(
            Locator::css(CREATOR_CARD),
            ExpectedState::CountAtLeast(1),
            DEFAULT_WAIT_TIMEOUT,
        )
        .click(Locator::role("button", "Subscribe"))
        .wait(
            Locator::text("My Subscriptions"),
            ExpectedState::Visible,
            Duration::from_secs(15),
        )
        .screenshot("03-subscribed")
}

/// Traverse the welcome wizard a fresh profile lands in before the
/// discovery page is reachable.
///
/// Intended as a [`StepSequence::with_prelude`] argument; runs are valid
/// without it when the profile has already onboarded.
pub fn onboarding_prelude() -> Vec<Step> {
    StepSequence::new()
        .navigate()
        .wait_visible(Locator::text("Welcome"))
        .click(Locator::role("button", "Next"))
        .click(Locator::role("button", "Generate new key"))
        .wait_visible(Locator::role("dialog", "Backup your Nostr secret"))
        .click(Locator::role("button", "Got it"))
        .click(Locator::role("checkbox", ""))
        .click(Locator::role("button", "Next"))
        .click(Locator::role("button", "Finish"))
        .steps()
        .to_vec()
}
