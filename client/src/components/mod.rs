//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the chrome around pages (navigation bar, guard gate)
//! and the form pieces every auth page shares, reading session state from the
//! `AuthContext` provided by `app::App`.

pub mod form;
pub mod navbar;
pub mod route_guard;
