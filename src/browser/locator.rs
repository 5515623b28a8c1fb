//! Locators over rendered UI state
//!
//! Elements are resolved inside the page by injected JavaScript evaluated
//! over CDP. A [`Locator`] compiles to a resolver expression producing the
//! matched element list; probing and interaction wrap that expression with a
//! small helper prelude and return a JSON-encoded verdict.
//!
//! String arguments are embedded as JSON literals so selector text can never
//! escape its quoting.

use crate::error::{ElementError, Error, Result};
use chromiumoxide::Page;
use serde::Deserialize;

/// How to find an element in the rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector, e.g. `.creator-card`
    Css(String),
    /// An accessible role plus accessible-name substring, e.g.
    /// role=button name="Subscribe"
    Role {
        /// ARIA role (implicit roles of native elements are honored)
        role: String,
        /// Case-insensitive substring of the accessible name
        name: String,
    },
    /// A form control located by its label text (label element,
    /// aria-label, or placeholder)
    Label(String),
    /// Visible text anywhere on the page (leaf elements only)
    Text(String),
}

impl Locator {
    /// CSS selector locator
    pub fn css<S: Into<String>>(selector: S) -> Self {
        Locator::Css(selector.into())
    }

    /// Role + accessible-name locator
    pub fn role<R: Into<String>, N: Into<String>>(role: R, name: N) -> Self {
        Locator::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Labeled form control locator
    pub fn label<S: Into<String>>(text: S) -> Self {
        Locator::Label(text.into())
    }

    /// Visible page text locator
    pub fn text<S: Into<String>>(needle: S) -> Self {
        Locator::Text(needle.into())
    }

    /// Human-readable form used in condition descriptions and errors
    pub fn describe(&self) -> String {
        match self {
            Locator::Css(sel) => format!("`{sel}`"),
            Locator::Role { role, name } => format!("role={role} name=\"{name}\""),
            Locator::Label(text) => format!("input labeled \"{text}\""),
            Locator::Text(needle) => format!("text \"{needle}\""),
        }
    }

    /// JavaScript expression evaluating to the array of matched elements
    fn resolver_js(&self) -> String {
        match self {
            Locator::Css(sel) => {
                format!("Array.from(document.querySelectorAll({}))", js_string(sel))
            }
            Locator::Role { role, name } => format!(
                "Array.from(document.querySelectorAll({candidates}))\
                 .filter((el) => __name(el).includes(__norm({name})))",
                candidates = js_string(&role_candidates(role)),
                name = js_string(name),
            ),
            Locator::Label(text) => format!(
                r#"(() => {{
                    const needle = __norm({text});
                    const controls = [];
                    for (const l of document.querySelectorAll('label')) {{
                        if (!__norm(l.textContent).includes(needle)) continue;
                        const c = l.htmlFor
                            ? document.getElementById(l.htmlFor)
                            : l.querySelector('input, textarea, select');
                        if (c) controls.push(c);
                    }}
                    for (const el of document.querySelectorAll(
                        'input[aria-label], textarea[aria-label]')) {{
                        if (__norm(el.getAttribute('aria-label')).includes(needle))
                            controls.push(el);
                    }}
                    for (const el of document.querySelectorAll('input[placeholder]')) {{
                        if (__norm(el.getAttribute('placeholder')).includes(needle))
                            controls.push(el);
                    }}
                    return Array.from(new Set(controls));
                }})()"#,
                text = js_string(text),
            ),
            Locator::Text(needle) => format!(
                "Array.from(document.querySelectorAll('body, body *'))\
                 .filter((el) => el.childElementCount === 0 \
                 && __norm(el.textContent).includes(__norm({})))",
                js_string(needle),
            ),
        }
    }

    /// Wrap a verdict body with the helper prelude and this locator's
    /// resolver bound to `__els`
    fn wrap(&self, body: &str) -> String {
        format!(
            r#"(() => {{
                const __norm = (t) => (t || '').replace(/\s+/g, ' ').trim().toLowerCase();
                const __visible = (el) => {{
                    if (!(el instanceof Element)) return false;
                    if (!el.getClientRects().length) return false;
                    const s = window.getComputedStyle(el);
                    return s.visibility !== 'hidden' && s.display !== 'none';
                }};
                const __name = (el) =>
                    __norm(el.getAttribute('aria-label') || el.textContent);
                const __els = {resolver};
                {body}
            }})()"#,
            resolver = self.resolver_js(),
        )
    }
}

/// Snapshot of what a locator currently matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Probe {
    /// Total matched elements
    pub count: usize,
    /// Matches that are currently visible
    pub visible: usize,
    /// Matches that are visible and not disabled
    pub enabled: usize,
}

/// Observe what a locator matches right now, without waiting
pub async fn probe(page: &Page, locator: &Locator) -> Result<Probe> {
    let script = locator.wrap(
        r#"return JSON.stringify({
            count: __els.length,
            visible: __els.filter(__visible).length,
            enabled: __els.filter((el) => __visible(el) && !el.disabled).length,
        });"#,
    );
    let raw: String = evaluate_string(page, &script).await?;
    let report: Probe = serde_json::from_str(&raw)?;
    Ok(report)
}

/// Verdict body for click; only a visible match may be interacted with
const CLICK_BODY: &str = r#"if (__els.length === 0) return 'notfound';
const el = __els.find(__visible);
if (!el) return 'hidden';
if (el.disabled) return 'disabled';
el.scrollIntoView({ block: 'center' });
el.click();
return 'ok';"#;

/// Click the first visible match, or fail with an element error
pub async fn click(page: &Page, locator: &Locator) -> Result<()> {
    let script = locator.wrap(CLICK_BODY);
    match evaluate_string(page, &script).await?.as_str() {
        "ok" => Ok(()),
        "hidden" => Err(ElementError::NotInteractable(format!(
            "{} matched, but no match is visible",
            locator.describe()
        ))
        .into()),
        "disabled" => Err(ElementError::NotInteractable(format!(
            "{} is disabled",
            locator.describe()
        ))
        .into()),
        _ => Err(ElementError::NotFound(locator.describe()).into()),
    }
}

/// Set the value of a uniquely-matched form control and fire input/change
pub async fn fill(page: &Page, locator: &Locator, value: &str) -> Result<()> {
    let body = format!(
        r#"if (__els.length === 0) return 'notfound';
        if (__els.length > 1) return 'ambiguous';
        const el = __els[0];
        if (el.disabled || el.readOnly) return 'disabled';
        el.focus();
        el.value = {value};
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return 'ok';"#,
        value = js_string(value),
    );
    let script = locator.wrap(&body);
    match evaluate_string(page, &script).await?.as_str() {
        "ok" => Ok(()),
        "ambiguous" => Err(ElementError::NotFound(format!(
            "{} matched more than one control",
            locator.describe()
        ))
        .into()),
        "disabled" => Err(ElementError::NotInteractable(format!(
            "{} is disabled or read-only",
            locator.describe()
        ))
        .into()),
        _ => Err(ElementError::NotFound(locator.describe()).into()),
    }
}

async fn evaluate_string(page: &Page, script: &str) -> Result<String> {
    page.evaluate(script)
        .await
        .map_err(|e| Error::cdp(e.to_string()))?
        .into_value::<String>()
        .map_err(|e| Error::cdp(e.to_string()))
}

/// CSS candidates carrying a role, explicit `[role=..]` plus the native
/// elements with that implicit role
fn role_candidates(role: &str) -> String {
    match role {
        "button" => {
            r#"[role="button"], button, input[type="button"], input[type="submit"]"#.to_string()
        }
        "link" => r#"[role="link"], a[href]"#.to_string(),
        "textbox" => {
            r#"[role="textbox"], input:not([type]), input[type="text"], input[type="search"], textarea"#
                .to_string()
        }
        "checkbox" => r#"[role="checkbox"], input[type="checkbox"]"#.to_string(),
        "dialog" => r#"[role="dialog"], dialog"#.to_string(),
        "heading" => r#"[role="heading"], h1, h2, h3, h4, h5, h6"#.to_string(),
        other => format!(r#"[role="{other}"]"#),
    }
}

/// Embed a Rust string as a JavaScript string literal
fn js_string(s: &str) -> String {
    // Serializing a &str cannot fail
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe() {
        assert_eq!(Locator::css(".creator-card").describe(), "`.creator-card`");
        assert_eq!(
            Locator::role("button", "Subscribe").describe(),
            "role=button name=\"Subscribe\""
        );
        assert_eq!(
            Locator::label("Search creators").describe(),
            "input labeled \"Search creators\""
        );
        assert_eq!(Locator::text("dergigi").describe(), "text \"dergigi\"");
    }

    #[test]
    fn test_css_resolver_embeds_selector_as_literal() {
        let js = Locator::css(".creator-card").resolver_js();
        assert!(js.contains("querySelectorAll(\".creator-card\")"));
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string(r#"a"b"#), r#""a\"b""#);
        assert_eq!(js_string("it's"), r#""it's""#);
        assert_eq!(js_string(r"back\slash"), r#""back\\slash""#);
    }

    #[test]
    fn test_role_candidates_known_roles() {
        assert!(role_candidates("button").contains("button"));
        assert!(role_candidates("button").contains(r#"input[type="submit"]"#));
        assert!(role_candidates("link").contains("a[href]"));
        assert!(role_candidates("checkbox").contains(r#"input[type="checkbox"]"#));
    }

    #[test]
    fn test_role_candidates_fallback() {
        assert_eq!(role_candidates("tabpanel"), r#"[role="tabpanel"]"#);
    }

    #[test]
    fn test_role_resolver_filters_by_name() {
        let js = Locator::role("button", "Subscribe").resolver_js();
        assert!(js.contains("__name(el).includes"));
        assert!(js.contains("\"Subscribe\""));
    }

    #[test]
    fn test_label_resolver_checks_for_attribute_and_placeholder() {
        let js = Locator::label("Search").resolver_js();
        assert!(js.contains("htmlFor"));
        assert!(js.contains("aria-label"));
        assert!(js.contains("placeholder"));
    }

    #[test]
    fn test_click_refuses_targets_with_no_visible_match() {
        // A hidden-only match must yield a verdict, never a click
        assert!(CLICK_BODY.contains("const el = __els.find(__visible);"));
        assert!(CLICK_BODY.contains("return 'hidden';"));
        assert!(!CLICK_BODY.contains("__els[0]"));
    }

    #[test]
    fn test_wrapped_script_defines_helpers() {
        let script = Locator::css("div").wrap("return 'ok';");
        assert!(script.contains("const __visible"));
        assert!(script.contains("const __els"));
        assert!(script.contains("return 'ok';"));
    }

    #[test]
    fn test_probe_report_decodes() {
        let report: Probe =
            serde_json::from_str(r#"{"count": 3, "visible": 2, "enabled": 1}"#).unwrap();
        assert_eq!(
            report,
            Probe {
                count: 3,
                visible: 2,
                enabled: 1
            }
        );
    }

    #[test]
    fn test_probe_default_is_empty() {
        let report = Probe::default();
        assert_eq!(report.count, 0);
        assert_eq!(report.visible, 0);
        assert_eq!(report.enabled, 0);
    }
}
