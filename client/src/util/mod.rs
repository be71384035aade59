//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules keep browser/environment concerns and pure decision logic
//! out of page and component code so both can be tested without a DOM.

pub mod clock;
pub mod config;
pub mod guard;
pub mod permissions;
pub mod validation;
