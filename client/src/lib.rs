//! # client
//!
//! Leptos + WASM frontend for the Gatehouse account portal: sign-in,
//! registration, password reset, and a dashboard behind a role-aware
//! navigation guard.
//!
//! Reads go through the `query` cache and writes through tracked mutations,
//! both over a `net::transport::Transport` so the logic runs under unit tests
//! without a browser.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod query;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point: installs logging and hydrates the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    // Only fails when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
