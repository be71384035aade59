//! Client-side data cache and action tracking.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits between views and `net::api`. Reads go through `QueryClient`
//! (de-duplicated, cached, retried); writes go through `Mutation`
//! (single-shot, lifecycle only). Both report changes through a shared
//! `Notifier` so the Leptos layer can re-render.

pub mod cache;
pub mod key;
pub mod mutation;
pub mod notify;
pub mod retry;

pub use cache::{QueryClient, QueryOptions, QueryState};
pub use key::QueryKey;
pub use mutation::{Mutation, MutationState, MutationStatus};
pub use notify::Notifier;
pub use retry::RetryPolicy;
