//! Scenarios and the scenario registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::assertion::{LocationMatch, TextMatch};
use crate::config::Viewport;
use crate::locator::Locator;
use crate::result::{HarnessError, HarnessResult};
use crate::step::Step;

/// A named, independent test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name
    pub name: String,
    /// Page loaded before the first step
    pub url: String,
    /// Viewport override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Free-form tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Tolerate every uncaught page error in this scenario
    #[serde(default)]
    pub ignore_page_errors: bool,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create a scenario with no steps
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            viewport: None,
            tags: Vec::new(),
            ignore_page_errors: false,
            steps: Vec::new(),
        }
    }

    /// Override the viewport
    #[must_use]
    pub const fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Add a tag
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Tolerate every page error
    #[must_use]
    pub const fn ignoring_page_errors(mut self) -> Self {
        self.ignore_page_errors = true;
        self
    }

    /// Append a step
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Append an [`Step::AssertVisible`]
    #[must_use]
    pub fn expect_visible(self, locator: impl Into<Locator>) -> Self {
        self.step(Step::AssertVisible {
            locator: locator.into(),
        })
    }

    /// Append an [`Step::AssertText`]
    #[must_use]
    pub fn expect_text(self, locator: impl Into<Locator>, matcher: TextMatch) -> Self {
        self.step(Step::AssertText {
            locator: locator.into(),
            matcher,
        })
    }

    /// Append an [`Step::AssertAttribute`]
    #[must_use]
    pub fn expect_attribute(
        self,
        locator: impl Into<Locator>,
        name: impl Into<String>,
        matcher: TextMatch,
    ) -> Self {
        self.step(Step::AssertAttribute {
            locator: locator.into(),
            name: name.into(),
            matcher,
        })
    }

    /// Append a [`Step::Click`]
    #[must_use]
    pub fn click(self, locator: impl Into<Locator>) -> Self {
        self.step(Step::Click {
            locator: locator.into(),
        })
    }

    /// Append a [`Step::AssertLocation`] with the default timeout
    #[must_use]
    pub fn expect_location(self, matcher: LocationMatch) -> Self {
        self.step(Step::AssertLocation {
            matcher,
            timeout_ms: None,
        })
    }

    /// Whether the name or a tag contains the pattern (case-insensitive)
    #[must_use]
    pub fn matches_filter(&self, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        self.name.to_lowercase().contains(&pattern)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&pattern))
    }
}

/// Result of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    /// New scenario stored
    Added,
    /// Identical scenario already present; nothing stored
    Duplicate,
}

/// On-disk scenario file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Scenarios in registration order
    pub scenarios: Vec<Scenario>,
}

/// Scenarios keyed by unique name, in registration order
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
    index: HashMap<String, usize>,
}

impl ScenarioRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scenario
    ///
    /// Re-registering an identical scenario is a no-op; a different scenario
    /// under an existing name is rejected.
    pub fn register(&mut self, scenario: Scenario) -> HarnessResult<Registered> {
        if let Some(&existing) = self.index.get(&scenario.name) {
            if self.scenarios[existing] == scenario {
                return Ok(Registered::Duplicate);
            }
            return Err(HarnessError::DuplicateScenario {
                name: scenario.name,
            });
        }
        self.index.insert(scenario.name.clone(), self.scenarios.len());
        self.scenarios.push(scenario);
        Ok(Registered::Added)
    }

    /// Register every scenario, stopping at the first conflict
    pub fn register_all(
        &mut self,
        scenarios: impl IntoIterator<Item = Scenario>,
    ) -> HarnessResult<usize> {
        let mut added = 0;
        for scenario in scenarios {
            if self.register(scenario)? == Registered::Added {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Look up a scenario by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.index.get(name).map(|&i| &self.scenarios[i])
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Scenarios whose name or tags contain the pattern
    pub fn filter<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = &'a Scenario> + 'a {
        self.scenarios
            .iter()
            .filter(move |s| s.matches_filter(pattern))
    }

    /// Parse a registry from YAML
    pub fn from_yaml_str(yaml: &str) -> HarnessResult<Self> {
        let file: ScenarioFile = serde_yaml_ng::from_str(yaml)?;
        let mut registry = Self::new();
        registry.register_all(file.scenarios)?;
        Ok(registry)
    }

    /// Load a registry from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    ///
    /// Enum values are written as single-key maps (`contains: text`) rather
    /// than YAML tags, since tags cannot be read back through the tagged
    /// step representation.
    pub fn to_yaml(&self) -> HarnessResult<String> {
        let file = ScenarioFile {
            scenarios: self.scenarios.clone(),
        };
        let mut out = Vec::new();
        let mut serializer = serde_yaml_ng::Serializer::new(&mut out);
        serde_yaml_ng::with::singleton_map_recursive::serialize(&file, &mut serializer)?;
        String::from_utf8(out).map_err(|e| HarnessError::Config {
            message: format!("scenario YAML is not UTF-8: {e}"),
        })
    }
}

impl<'a> IntoIterator for &'a ScenarioRegistry {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
