//! Scripted in-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::net::types::User;

type Reply = Result<HttpResponse, ApiError>;

/// Records every request and answers from per-route queues.
///
/// The last queued reply for a route is sticky, so a single `respond` call
/// covers any number of requests. Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    replies: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.push(method, path, Ok(HttpResponse { status, body }));
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .borrow_mut()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, method: Method, path: &str) -> Reply {
        let mut replies = self.replies.borrow_mut();
        let Some(queue) = replies.get_mut(&(method, path.to_owned())) else {
            return Ok(HttpResponse {
                status: 404,
                body: r#"{"message":"no route"}"#.to_owned(),
            });
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(Err(ApiError::Unavailable))
        } else {
            queue.front().cloned().unwrap_or(Err(ApiError::Unavailable))
        }
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.calls.borrow_mut().push(request.clone());
        // Suspend once so concurrent callers overlap like real fetches do.
        YieldOnce(false).await;
        self.next_reply(request.method, &request.path)
    }
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub fn api_client(mock: &Rc<MockTransport>) -> ApiClient {
    ApiClient::new(mock.clone())
}

pub fn user_with_roles(roles: &[&str]) -> User {
    User {
        id: 1,
        email: "alice@example.com".to_owned(),
        is_active: true,
        roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        created_at: None,
    }
}

pub fn user_json(user: &User) -> serde_json::Value {
    serde_json::to_value(user).unwrap()
}
