//! Form-submission flow.
//!
//! A [`FormSubmission`] describes a form by locators: the form itself, its
//! fields in fill order, the submit button, and the optional response banner
//! and CAPTCHA frame. [`FormSubmission::to_steps`] lowers it into primitive
//! steps so the runner executes it like any other step sequence.
//!
//! CAPTCHA handling and the response banner are soft: they produce notes,
//! never failures.

use serde::{Deserialize, Serialize};

use crate::assertion::TextMatch;
use crate::locator::Locator;
use crate::step::Step;
use crate::wait::Condition;

/// Selector of the reCAPTCHA frame
pub const RECAPTCHA_FRAME: &str = r#"iframe[src*="recaptcha"]"#;

/// How long to look for the reCAPTCHA frame before moving on
pub const RECAPTCHA_TIMEOUT_MS: u64 = 20_000;

/// Kind of form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text input
    #[default]
    Text,
    /// Phone input (intl-tel-input widget needs a click before typing)
    Phone,
    /// Checkbox; the value is ignored
    Checkbox,
}

/// One field to fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Field locator
    pub locator: Locator,
    /// Input kind
    #[serde(default)]
    pub kind: FieldKind,
    /// Value to type
    #[serde(default)]
    pub value: String,
}

impl FormField {
    /// Text field
    #[must_use]
    pub fn text(locator: Locator, value: impl Into<String>) -> Self {
        Self {
            locator,
            kind: FieldKind::Text,
            value: value.into(),
        }
    }

    /// Phone field
    #[must_use]
    pub fn phone(locator: Locator, value: impl Into<String>) -> Self {
        Self {
            locator,
            kind: FieldKind::Phone,
            value: value.into(),
        }
    }

    /// Checkbox field
    #[must_use]
    pub const fn checkbox(locator: Locator) -> Self {
        Self {
            locator,
            kind: FieldKind::Checkbox,
            value: String::new(),
        }
    }
}

/// A form to fill and submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    /// The form element
    pub form: Locator,
    /// Force the form visible (`display: block`) before filling
    #[serde(default)]
    pub reveal: bool,
    /// Fields in fill order
    pub fields: Vec<FormField>,
    /// Submit button
    pub submit: Locator,
    /// Text the submit button must contain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    /// Response banner shown after submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Locator>,
    /// CAPTCHA frame to look for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha: Option<Locator>,
}

impl FormSubmission {
    /// Create a submission with no fields
    #[must_use]
    pub const fn new(form: Locator, submit: Locator) -> Self {
        Self {
            form,
            reveal: false,
            fields: Vec::new(),
            submit,
            submit_label: None,
            response: None,
            captcha: None,
        }
    }

    /// Force the form visible before filling
    #[must_use]
    pub const fn revealed(mut self) -> Self {
        self.reveal = true;
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Require the submit button label
    #[must_use]
    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = Some(label.into());
        self
    }

    /// Log the response banner after submitting
    #[must_use]
    pub fn response(mut self, banner: Locator) -> Self {
        self.response = Some(banner);
        self
    }

    /// Look for the reCAPTCHA frame before submitting
    #[must_use]
    pub fn detect_recaptcha(mut self) -> Self {
        self.captcha = Some(
            Locator::new(RECAPTCHA_FRAME)
                .first()
                .with_timeout(RECAPTCHA_TIMEOUT_MS),
        );
        self
    }

    /// Lower into primitive steps
    #[must_use]
    pub fn to_steps(&self) -> Vec<Step> {
        let mut steps = vec![Step::WaitForCondition {
            locator: self.form.clone(),
            condition: Condition::Exists,
        }];
        if self.reveal {
            steps.push(Step::Reveal {
                locator: self.form.clone(),
            });
        }
        steps.push(Step::AssertVisible {
            locator: self.form.clone(),
        });

        for field in &self.fields {
            let locator = field.locator.clone();
            match field.kind {
                FieldKind::Text | FieldKind::Phone => {
                    steps.push(Step::AssertVisible {
                        locator: locator.clone(),
                    });
                    if field.kind == FieldKind::Phone {
                        steps.push(Step::Click {
                            locator: locator.clone(),
                        });
                    }
                    steps.push(Step::Clear {
                        locator: locator.clone(),
                    });
                    steps.push(Step::TypeText {
                        locator,
                        text: field.value.clone(),
                    });
                }
                FieldKind::Checkbox => steps.push(Step::Check { locator }),
            }
        }

        if let Some(captcha) = &self.captcha {
            steps.push(Step::DetectCaptcha {
                locator: captcha.clone(),
            });
        }

        steps.push(Step::AssertVisible {
            locator: self.submit.clone(),
        });
        if let Some(label) = &self.submit_label {
            steps.push(Step::AssertText {
                locator: self.submit.clone(),
                matcher: TextMatch::contains(label.clone()),
            });
        }
        steps.push(Step::Click {
            locator: self.submit.clone(),
        });

        if let Some(banner) = &self.response {
            steps.push(Step::LogText {
                locator: banner.clone(),
                label: "Form response".to_string(),
            });
        }
        steps
    }
}

/// Extract the `k` query parameter (site key) from a reCAPTCHA frame URL
///
/// The value is percent-decoded; a value that does not decode to UTF-8 is
/// returned as written.
#[must_use]
pub fn extract_site_key(src: &str) -> Option<String> {
    let query = src.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("k="))
        .filter(|value| !value.is_empty())?;
    Some(urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned()))
}
