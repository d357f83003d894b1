//! Scenario steps.
//!
//! A [`Step`] is one declarative action or assertion. Composite steps
//! ([`Step::Toggle`], [`Step::SubmitForm`]) lower into primitive steps via
//! [`Step::expand`]; the runner never sees them nested.

use serde::{Deserialize, Serialize};

use crate::assertion::{LocationMatch, TextMatch};
use crate::form::FormSubmission;
use crate::locator::Locator;
use crate::toggle::ToggleCheck;
use crate::wait::Condition;

/// One step of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Load a URL (absolute, or a path on the current origin)
    Navigate {
        /// Target URL
        url: String,
    },
    /// Require the locator to resolve to an element
    Locate {
        /// Element locator
        locator: Locator,
    },
    /// Require the element to be visible
    AssertVisible {
        /// Element locator
        locator: Locator,
    },
    /// Require the element's text to match
    AssertText {
        /// Element locator
        locator: Locator,
        /// Text matcher
        matcher: TextMatch,
    },
    /// Require an attribute to match
    AssertAttribute {
        /// Element locator
        locator: Locator,
        /// Attribute name
        name: String,
        /// Value matcher
        matcher: TextMatch,
    },
    /// Require the element's normalized label to equal a value
    AssertLabel {
        /// Element locator
        locator: Locator,
        /// Expected label
        label: String,
    },
    /// Require an exact number of matches
    AssertCount {
        /// Element locator
        locator: Locator,
        /// Expected count
        count: usize,
    },
    /// Require the current location to match
    AssertLocation {
        /// Location matcher
        matcher: LocationMatch,
        /// Timeout override in milliseconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    /// Click the element
    Click {
        /// Element locator
        locator: Locator,
    },
    /// Click the element only if a visible match exists right now
    ClickIfVisible {
        /// Element locator
        locator: Locator,
    },
    /// Type into the element
    TypeText {
        /// Element locator
        locator: Locator,
        /// Text to type
        text: String,
    },
    /// Clear the element's value
    Clear {
        /// Element locator
        locator: Locator,
    },
    /// Check a checkbox and verify it is checked
    Check {
        /// Element locator
        locator: Locator,
    },
    /// Force the element visible with `display: block`
    Reveal {
        /// Element locator
        locator: Locator,
    },
    /// Go back one history entry
    GoBack,
    /// Sleep for a fixed time
    WaitFixed {
        /// Milliseconds to sleep
        ms: u64,
    },
    /// Poll until a condition holds
    WaitForCondition {
        /// Element locator
        locator: Locator,
        /// Condition to wait for
        condition: Condition,
    },
    /// Record the element's text as a note when visible; never fails
    LogText {
        /// Element locator
        locator: Locator,
        /// Note prefix
        label: String,
    },
    /// Record the reCAPTCHA site key when the frame is present; never fails
    DetectCaptcha {
        /// Frame locator
        locator: Locator,
    },
    /// Hide overlay widgets by element id; missing ids are skipped
    HideElements {
        /// Element ids without `#`
        ids: Vec<String>,
    },
    /// Full toggle round trip
    Toggle(ToggleCheck),
    /// Fill and submit a form
    SubmitForm(FormSubmission),
}

impl Step {
    /// Primitive steps for composite variants, `None` for primitives
    #[must_use]
    pub fn expand(&self) -> Option<Vec<Self>> {
        match self {
            Self::Toggle(check) => Some(check.to_steps()),
            Self::SubmitForm(form) => Some(form.to_steps()),
            _ => None,
        }
    }

    /// Whether this step is soft (can only add notes)
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::LogText { .. }
                | Self::DetectCaptcha { .. }
                | Self::HideElements { .. }
                | Self::ClickIfVisible { .. }
        )
    }

    /// The step's locator, if it targets an element
    #[must_use]
    pub const fn locator(&self) -> Option<&Locator> {
        match self {
            Self::Locate { locator }
            | Self::AssertVisible { locator }
            | Self::AssertText { locator, .. }
            | Self::AssertAttribute { locator, .. }
            | Self::AssertLabel { locator, .. }
            | Self::AssertCount { locator, .. }
            | Self::Click { locator }
            | Self::ClickIfVisible { locator }
            | Self::TypeText { locator, .. }
            | Self::Clear { locator }
            | Self::Check { locator }
            | Self::Reveal { locator }
            | Self::WaitForCondition { locator, .. }
            | Self::LogText { locator, .. }
            | Self::DetectCaptcha { locator } => Some(locator),
            Self::Toggle(check) => Some(&check.locator),
            Self::SubmitForm(form) => Some(&form.form),
            Self::Navigate { .. }
            | Self::AssertLocation { .. }
            | Self::GoBack
            | Self::WaitFixed { .. }
            | Self::HideElements { .. } => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Navigate { url } => write!(f, "navigate to {url}"),
            Self::Locate { locator } => write!(f, "locate {locator}"),
            Self::AssertVisible { locator } => write!(f, "expect {locator} to be visible"),
            Self::AssertText { locator, matcher } => write!(f, "expect {locator} to {matcher}"),
            Self::AssertAttribute {
                locator,
                name,
                matcher,
            } => write!(f, "expect {locator} [{name}] to {matcher}"),
            Self::AssertLabel { locator, label } => {
                write!(f, "expect {locator} to read {label:?}")
            }
            Self::AssertCount { locator, count } => {
                write!(f, "expect {count} match(es) for {locator}")
            }
            Self::AssertLocation { matcher, .. } => write!(f, "expect {matcher}"),
            Self::Click { locator } => write!(f, "click {locator}"),
            Self::ClickIfVisible { locator } => write!(f, "click {locator} if visible"),
            Self::TypeText { locator, text } => write!(f, "type {text:?} into {locator}"),
            Self::Clear { locator } => write!(f, "clear {locator}"),
            Self::Check { locator } => write!(f, "check {locator}"),
            Self::Reveal { locator } => write!(f, "reveal {locator}"),
            Self::GoBack => write!(f, "go back"),
            Self::WaitFixed { ms } => write!(f, "wait {ms}ms"),
            Self::WaitForCondition { locator, condition } => {
                write!(f, "wait for {locator} to {condition}")
            }
            Self::LogText { locator, label } => write!(f, "log {label} from {locator}"),
            Self::DetectCaptcha { locator } => write!(f, "detect captcha {locator}"),
            Self::HideElements { ids } => write!(f, "hide #{}", ids.join(", #")),
            Self::Toggle(check) => write!(
                f,
                "toggle {} between {:?} and {:?}",
                check.locator, check.collapsed_label, check.expanded_label
            ),
            Self::SubmitForm(form) => write!(f, "submit form {}", form.form),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_does_not_expand() {
        let step = Step::Click {
            locator: Locator::new("#btn-view-all-content"),
        };
        assert!(step.expand().is_none());
        assert_eq!(step.to_string(), "click #btn-view-all-content");
    }

    #[test]
    fn test_toggle_expands() {
        let step = Step::Toggle(ToggleCheck::new(
            Locator::new("#btn-view-all-content"),
            "view all",
            "hide",
        ));
        let expanded = step.expand().unwrap();
        assert_eq!(expanded.len(), 6);
        assert!(expanded.iter().all(|s| s.expand().is_none()));
    }

    #[test]
    fn test_soft_steps() {
        assert!(Step::HideElements {
            ids: vec!["titlediv".into()]
        }
        .is_soft());
        assert!(!Step::GoBack.is_soft());
    }

    #[test]
    fn test_locator_accessor() {
        let step = Step::TypeText {
            locator: Locator::new("#username"),
            text: "qa".into(),
        };
        assert_eq!(step.locator().map(ToString::to_string).as_deref(), Some("#username"));
        assert!(Step::WaitFixed { ms: 500 }.locator().is_none());
    }

    #[test]
    fn test_display_hide_elements() {
        let step = Step::HideElements {
            ids: vec!["zsiq_maintitle".into(), "titlediv".into()],
        };
        assert_eq!(step.to_string(), "hide #zsiq_maintitle, #titlediv");
    }

    #[test]
    fn test_yaml_tagged_form() {
        let yaml = r##"
- action: navigate
  url: https://encer.store/
- action: assert_text
  locator:
    selector:
      css: h2
  matcher:
    contains: Reclaim Your Energy with Encer Treatment
- action: assert_location
  matcher:
    path_matches: ^/my-account/?$
- action: go_back
- action: wait_fixed
  ms: 1000
"##;
        let steps: Vec<Step> = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(steps.len(), 5);
        assert!(matches!(
            &steps[1],
            Step::AssertText { matcher: TextMatch::Contains(t), .. } if t.starts_with("Reclaim")
        ));
        assert_eq!(steps[3], Step::GoBack);
    }
}
