//! Selection configuration.
//!
//! [`SelectionOptions`] is plain data: it can be built in code with the
//! `with_*` methods or loaded from TOML. Before use it is resolved into
//! [`ResolvedOptions`], which holds a validated [`Zoom`] and parsed ignore
//! selectors.
//!
//! # Example
//!
//! ```
//! use rubberband::SelectionOptions;
//!
//! let options = SelectionOptions::from_toml_str(r#"
//!     confine_selection_box = true
//!     zoom = 2.0
//!     ignore_targets = ["button", ".handle"]
//! "#).unwrap();
//!
//! assert!(options.confine_selection_box);
//! assert!(!options.disabled);
//! assert_eq!(options.validate().unwrap().ignore_targets.len(), 2);
//! ```

use rubberband_core::ConfigError;
use rubberband_core::logging::targets;
use rubberband_style::{ElementId, SelectorList};
use serde::{Deserialize, Serialize};

use crate::normalize::{Offset, Zoom};

/// User-facing selection options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    /// Ignore presses entirely.
    pub disabled: bool,
    /// Keep the selection rectangle inside the container.
    pub confine_selection_box: bool,
    /// Use this container offset instead of measuring the container.
    pub offset: Option<Offset>,
    /// Divisor applied to page distances. Must be finite and positive.
    pub zoom: f32,
    /// Selector groups; a press landing on a matching element is ignored.
    pub ignore_targets: Vec<String>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            confine_selection_box: false,
            offset: None,
            zoom: 1.0,
            ignore_targets: Vec::new(),
        }
    }
}

impl SelectionOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the options as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the confinement policy.
    pub fn with_confinement(mut self, confine: bool) -> Self {
        self.confine_selection_box = confine;
        self
    }

    /// Override the container offset.
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Add an ignore selector group.
    pub fn with_ignore_target(mut self, selector: impl Into<String>) -> Self {
        self.ignore_targets.push(selector.into());
        self
    }

    /// Validate strictly, failing on the first bad value.
    pub fn validate(&self) -> Result<ResolvedOptions, ConfigError> {
        let zoom = Zoom::new(self.zoom)?;
        let mut ignore_targets = SelectorList::new();
        for group in &self.ignore_targets {
            let parsed = SelectorList::parse(group)
                .map_err(|e| ConfigError::invalid_selector(group.as_str(), e.to_string()))?;
            ignore_targets.extend(parsed);
        }
        Ok(self.resolved_with(zoom, ignore_targets))
    }

    /// Resolve leniently: invalid zoom becomes 1 and unparsable selector
    /// groups are dropped, each with a warning.
    pub fn resolve(&self) -> ResolvedOptions {
        let zoom = Zoom::clamped(self.zoom);
        let ignore_targets = SelectorList::parse_lenient(&self.ignore_targets);
        if !self.ignore_targets.is_empty() && ignore_targets.is_empty() {
            tracing::warn!(target: targets::CONFIG, "no usable ignore selectors");
        }
        self.resolved_with(zoom, ignore_targets)
    }

    fn resolved_with(&self, zoom: Zoom, ignore_targets: SelectorList) -> ResolvedOptions {
        ResolvedOptions {
            disabled: self.disabled,
            confine_selection_box: self.confine_selection_box,
            offset: self.offset,
            zoom,
            ignore_targets,
        }
    }
}

/// Options after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub disabled: bool,
    pub confine_selection_box: bool,
    pub offset: Option<Offset>,
    pub zoom: Zoom,
    pub ignore_targets: SelectorList,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        SelectionOptions::default().resolve()
    }
}

/// Everything a selection machine is configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// The container presses must land in.
    pub target: ElementId,
    /// Candidate elements, index-addressable. `None` marks a slot whose
    /// element is not currently available.
    pub elements: Vec<Option<ElementId>>,
    /// Behavior options.
    pub options: SelectionOptions,
}

impl SelectionConfig {
    /// Create a configuration with default options.
    pub fn new<I>(target: ElementId, elements: I) -> Self
    where
        I: IntoIterator<Item = ElementId>,
    {
        Self {
            target,
            elements: elements.into_iter().map(Some).collect(),
            options: SelectionOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: SelectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the candidate list, allowing empty slots.
    pub fn with_element_slots(mut self, elements: Vec<Option<ElementId>>) -> Self {
        self.elements = elements;
        self
    }
}
