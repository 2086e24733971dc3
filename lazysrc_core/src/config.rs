// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader configuration.
//!
//! Callers describe what they want with [`LoaderOptions`], where every field
//! is optional. [`LoaderConfig::from_options`] merges the supplied fields over
//! the defaults and validates the result. A valid [`LoaderConfig`] is
//! immutable for the lifetime of the loader that owns it; re-initializing a
//! loader replaces the whole config.
//!
//! | Option               | Default      |
//! |----------------------|--------------|
//! | `source_attribute`   | *(required)* |
//! | `threshold`          | `0.0`        |
//! | `is_loading_class`   | `is-loading` |
//! | `is_loaded_class`    | `is-loaded`  |
//! | `loading_class_policy` | [`LoadingClassPolicy::Keep`] |

use alloc::string::{String, ToString as _};
use core::fmt;

/// Default marker applied while a primary source is being fetched.
pub const DEFAULT_LOADING_CLASS: &str = "is-loading";

/// Default marker applied once a primary source has finished loading.
pub const DEFAULT_LOADED_CLASS: &str = "is-loaded";

/// What happens to the loading marker once the loaded marker is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingClassPolicy {
    /// Leave the loading marker in place next to the loaded marker.
    #[default]
    Keep,
    /// Remove the loading marker when the loaded marker is applied.
    RemoveOnLoaded,
}

/// Errors from configuration validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// The options value was not an object/mapping.
    NotAnObject,
    /// No source attribute name was supplied.
    MissingSourceAttribute,
    /// A source attribute was supplied but it is not a string.
    SourceAttributeNotString,
    /// The source attribute name is empty.
    EmptySourceAttribute,
    /// The threshold is NaN or outside `[0, 1]`.
    ThresholdOutOfRange(f64),
    /// A recognized option was supplied with the wrong type.
    InvalidOption(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("lazy loader options must be an object"),
            Self::MissingSourceAttribute | Self::SourceAttributeNotString => {
                f.write_str("lazy loader \"sourceAttribute\" must be a string")
            }
            Self::EmptySourceAttribute => {
                f.write_str("lazy loader \"sourceAttribute\" must not be empty")
            }
            Self::ThresholdOutOfRange(t) => {
                write!(f, "lazy loader \"threshold\" must be within [0, 1], got {t}")
            }
            Self::InvalidOption(name) => {
                write!(f, "lazy loader option \"{name}\" has the wrong type")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Partially specified loader options.
///
/// Unset fields fall back to the defaults listed in the [module
/// docs](self) when converted with [`LoaderConfig::from_options`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoaderOptions {
    /// Name of the attribute holding the deferred URL.
    pub source_attribute: Option<String>,
    /// Fraction of the wrapper that must be visible before loading.
    pub threshold: Option<f64>,
    /// Marker applied while a primary source is loading.
    pub is_loading_class: Option<String>,
    /// Marker applied once a primary source has loaded.
    pub is_loaded_class: Option<String>,
    /// Whether the loading marker survives the loaded marker.
    pub loading_class_policy: Option<LoadingClassPolicy>,
}

impl LoaderOptions {
    /// Creates options with only the source attribute set.
    #[must_use]
    pub fn new(source_attribute: impl Into<String>) -> Self {
        Self {
            source_attribute: Some(source_attribute.into()),
            ..Self::default()
        }
    }

    /// Sets the visibility threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the loading marker.
    #[must_use]
    pub fn is_loading_class(mut self, class: impl Into<String>) -> Self {
        self.is_loading_class = Some(class.into());
        self
    }

    /// Sets the loaded marker.
    #[must_use]
    pub fn is_loaded_class(mut self, class: impl Into<String>) -> Self {
        self.is_loaded_class = Some(class.into());
        self
    }

    /// Sets the loading-marker policy.
    #[must_use]
    pub fn loading_class_policy(mut self, policy: LoadingClassPolicy) -> Self {
        self.loading_class_policy = Some(policy);
        self
    }
}

/// Validated, immutable loader configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderConfig {
    source_attribute: String,
    threshold: f64,
    is_loading_class: String,
    is_loaded_class: String,
    loading_class_policy: LoadingClassPolicy,
}

impl LoaderConfig {
    /// Merges `options` over the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSourceAttribute`] or
    /// [`ConfigError::EmptySourceAttribute`] if the source attribute is absent
    /// or empty, and [`ConfigError::ThresholdOutOfRange`] if the threshold is
    /// NaN or outside `[0, 1]`.
    pub fn from_options(options: LoaderOptions) -> Result<Self, ConfigError> {
        let source_attribute = options
            .source_attribute
            .ok_or(ConfigError::MissingSourceAttribute)?;
        if source_attribute.is_empty() {
            return Err(ConfigError::EmptySourceAttribute);
        }

        let threshold = options.threshold.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }

        Ok(Self {
            source_attribute,
            threshold,
            is_loading_class: options
                .is_loading_class
                .unwrap_or_else(|| DEFAULT_LOADING_CLASS.to_string()),
            is_loaded_class: options
                .is_loaded_class
                .unwrap_or_else(|| DEFAULT_LOADED_CLASS.to_string()),
            loading_class_policy: options.loading_class_policy.unwrap_or_default(),
        })
    }

    /// Returns the placeholder attribute name.
    #[must_use]
    pub fn source_attribute(&self) -> &str {
        &self.source_attribute
    }

    /// Returns the visibility threshold in `[0, 1]`.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the loading marker.
    #[must_use]
    pub fn is_loading_class(&self) -> &str {
        &self.is_loading_class
    }

    /// Returns the loaded marker.
    #[must_use]
    pub fn is_loaded_class(&self) -> &str {
        &self.is_loaded_class
    }

    /// Returns the loading-marker policy.
    #[must_use]
    pub fn loading_class_policy(&self) -> LoadingClassPolicy {
        self.loading_class_policy
    }

    /// Returns `true` if a notification with `ratio` should trigger a load.
    ///
    /// A ratio of exactly zero never qualifies, even with a zero threshold.
    #[must_use]
    pub fn qualifies(&self, ratio: f64) -> bool {
        ratio >= self.threshold && ratio > 0.0
    }
}

impl TryFrom<LoaderOptions> for LoaderConfig {
    type Error = ConfigError;

    fn try_from(options: LoaderOptions) -> Result<Self, Self::Error> {
        Self::from_options(options)
    }
}
