//! Request lifecycle shared by every asynchronous slice operation.
//!
//! An effect dispatches [`Lifecycle::Pending`] before it suspends on I/O and
//! exactly one of [`Lifecycle::Fulfilled`] / [`Lifecycle::Rejected`] when the
//! call settles.
//!
//! [`RequestTracker`] numbers requests per [`RequestKind`]. A settlement
//! whose request has since been superseded by a newer one of the same kind
//! is dropped, so the most recently issued request wins rather than the
//! slowest one.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle<T> {
    Pending,
    Fulfilled(T),
    /// Carries the underlying cause for logging; slices store their own
    /// fixed message instead.
    Rejected(String),
}

impl<T> Lifecycle<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lifecycle<U> {
        match self {
            Self::Pending => Lifecycle::Pending,
            Self::Fulfilled(data) => Lifecycle::Fulfilled(f(data)),
            Self::Rejected(message) => Lifecycle::Rejected(message),
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled(_) => "fulfilled",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Every asynchronous operation the store can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    CheckAuth,
    Register,
    Login,
    Logout,
    GetUser,
    UpdateUser,
    Ingredients,
    Feed,
    SubmitOrder,
    OrderHistory,
    OrderByNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    latest: HashMap<RequestKind, RequestId>,
}

impl RequestTracker {
    /// Issue a new request id and mark it as the latest of its kind.
    pub fn begin(&mut self, kind: RequestKind) -> RequestId {
        self.next += 1;
        let id = RequestId(self.next);
        self.latest.insert(kind, id);
        id
    }

    /// Whether `id` is still the most recent request of its kind.
    pub fn is_current(&self, kind: RequestKind, id: RequestId) -> bool {
        self.latest.get(&kind) == Some(&id)
    }
}
