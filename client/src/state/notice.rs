//! One-shot success notice carried across a navigation.
//!
//! Forms that finish by redirecting to the login view (register, both reset
//! steps) leave their message here; the login view shows it and clears it on
//! the next submission.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub message: Option<&'static str>,
}

impl NoticeState {
    pub fn show(&mut self, message: &'static str) {
        self.message = Some(message);
    }

    pub fn take(&mut self) -> Option<&'static str> {
        self.message.take()
    }
}
