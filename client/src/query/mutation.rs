//! Lifecycle tracking for single-shot write actions.
//!
//! A mutation is never retried and never cached. It only remembers the
//! outcome of its latest run so views can show pending flags and errors.

#[cfg(test)]
#[path = "mutation_test.rs"]
mod mutation_test;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use super::notify::Notifier;
use crate::net::error::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Outcome of the latest run.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationState<T> {
    pub status: MutationStatus,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        Self {
            status: MutationStatus::Idle,
            data: None,
            error: None,
        }
    }
}

/// Tracks one action (login, logout, ...). Clones share state.
#[derive(Clone)]
pub struct Mutation<T> {
    state: Rc<RefCell<MutationState<T>>>,
    notifier: Notifier,
}

impl<T: Clone> Mutation<T> {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            state: Rc::new(RefCell::new(MutationState::default())),
            notifier,
        }
    }

    pub fn state(&self) -> MutationState<T> {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> MutationStatus {
        self.state.borrow().status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == MutationStatus::Pending
    }

    /// Drives `action` to completion and records its outcome.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` without polling `action` while a previous run
    /// is still pending; otherwise returns the action's own error.
    pub async fn run<Fut>(&self, action: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if self.is_pending() {
            return Err(ApiError::Busy);
        }
        self.replace(MutationState {
            status: MutationStatus::Pending,
            data: None,
            error: None,
        });

        let result = action.await;
        self.replace(match &result {
            Ok(data) => MutationState {
                status: MutationStatus::Success,
                data: Some(data.clone()),
                error: None,
            },
            Err(err) => MutationState {
                status: MutationStatus::Error,
                data: None,
                error: Some(err.clone()),
            },
        });
        result
    }

    fn replace(&self, next: MutationState<T>) {
        *self.state.borrow_mut() = next;
        self.notifier.notify();
    }
}
