//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each form page exposes an async `submit_*` function holding its
//! validate-then-call logic and a component that wires inputs to it.
//! Rendering details shared across forms live in `components::form`.

pub mod dashboard;
pub mod home;
pub mod login;
pub mod not_found;
pub mod register;
pub mod reset;
