//! Shared client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the session (query cache plus auth mutations); `notice` carries
//! a success message across a redirect. Both are provided as Leptos context by
//! `app::App`.

pub mod auth;
pub mod notice;
