//! Browser-side settings.
//!
//! Each setting is looked up by key, first in the build environment
//! (`GATEHOUSE_API_BASE_URL`, `GATEHOUSE_REQUEST_TIMEOUT_MS`) and then in a
//! `window.GATEHOUSE_CONFIG` object present at page load, which wins. Blank or
//! unparsable values keep whatever the previous layer set.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Abort deadline applied to every request.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

const BASE_URL_KEY: &str = "api_base_url";
const TIMEOUT_KEY: &str = "request_timeout_ms";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// API origin; empty means the page's own origin.
    pub api_base_url: String,
    pub request_timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// Build-time settings with the page's runtime object layered on top.
    pub fn load() -> Self {
        Self::default().overlay(build_setting).overlay(runtime_setting)
    }

    /// Replaces each field for which `lookup` yields a usable value.
    #[must_use]
    pub(crate) fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = setting(&lookup, BASE_URL_KEY) {
            self.api_base_url = url;
        }
        if let Some(ms) = setting(&lookup, TIMEOUT_KEY).and_then(|raw| parse_timeout(&raw)) {
            self.request_timeout_ms = ms;
        }
        self
    }
}

fn setting(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_timeout(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|ms| *ms > 0)
}

fn build_setting(key: &str) -> Option<String> {
    let value = match key {
        BASE_URL_KEY => option_env!("GATEHOUSE_API_BASE_URL"),
        TIMEOUT_KEY => option_env!("GATEHOUSE_REQUEST_TIMEOUT_MS"),
        _ => None,
    };
    value.map(str::to_owned)
}

#[cfg(feature = "hydrate")]
fn runtime_setting(key: &str) -> Option<String> {
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let object = js_sys::Reflect::get(&window, &JsValue::from_str("GATEHOUSE_CONFIG")).ok()?;
    if !object.is_object() {
        return None;
    }
    let value = js_sys::Reflect::get(&object, &JsValue::from_str(key)).ok()?;
    // Timeouts may be written as JS numbers.
    value.as_string().or_else(|| value.as_f64().map(|n| n.to_string()))
}

#[cfg(not(feature = "hydrate"))]
fn runtime_setting(_key: &str) -> Option<String> {
    None
}
