// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading loader options from a JS object.
//!
//! Recognized keys:
//!
//! | Key                  | Type     |
//! |----------------------|----------|
//! | `sourceAttribute`    | string, required |
//! | `threshold`          | number   |
//! | `isLoadingClass`     | string   |
//! | `isLoadedClass`      | string   |
//! | `loadingClassPolicy` | `"keep"` or `"removeOnLoaded"` |
//!
//! Unknown keys are ignored. `undefined` counts as absent.

use alloc::string::String;

use js_sys::{Object, Reflect};
use lazysrc_core::{ConfigError, LoaderOptions, LoadingClassPolicy};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;

/// Converts a JS options object into [`LoaderOptions`].
///
/// # Errors
///
/// Returns [`ConfigError::NotAnObject`] if `value` is not an object (`null`
/// included), [`ConfigError::MissingSourceAttribute`] or
/// [`ConfigError::SourceAttributeNotString`] for a bad `sourceAttribute`, and
/// [`ConfigError::InvalidOption`] for any other recognized key of the wrong
/// type. Range checks happen later, in
/// [`LoaderConfig::from_options`](lazysrc_core::LoaderConfig::from_options).
pub fn options_from_js(value: &JsValue) -> Result<LoaderOptions, ConfigError> {
    if !value.is_object() {
        return Err(ConfigError::NotAnObject);
    }
    let object: &Object = value.unchecked_ref();

    let source_attribute = get(object, "sourceAttribute")
        .ok_or(ConfigError::MissingSourceAttribute)?
        .as_string()
        .ok_or(ConfigError::SourceAttributeNotString)?;

    let threshold = get(object, "threshold")
        .map(|v| v.as_f64().ok_or(ConfigError::InvalidOption("threshold")))
        .transpose()?;

    let loading_class_policy = get_string(object, "loadingClassPolicy")?
        .map(|name| {
            policy_from_name(&name).ok_or(ConfigError::InvalidOption("loadingClassPolicy"))
        })
        .transpose()?;

    Ok(LoaderOptions {
        source_attribute: Some(source_attribute),
        threshold,
        is_loading_class: get_string(object, "isLoadingClass")?,
        is_loaded_class: get_string(object, "isLoadedClass")?,
        loading_class_policy,
    })
}

fn get(object: &Object, key: &str) -> Option<JsValue> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined())
}

fn get_string(object: &Object, key: &'static str) -> Result<Option<String>, ConfigError> {
    get(object, key)
        .map(|v| v.as_string().ok_or(ConfigError::InvalidOption(key)))
        .transpose()
}

/// Parses the JS spelling of a [`LoadingClassPolicy`].
pub(crate) fn policy_from_name(name: &str) -> Option<LoadingClassPolicy> {
    match name {
        "keep" => Some(LoadingClassPolicy::Keep),
        "removeOnLoaded" => Some(LoadingClassPolicy::RemoveOnLoaded),
        _ => None,
    }
}
