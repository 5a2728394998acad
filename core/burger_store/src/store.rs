//! # Store
//!
//! The root state and the only place it is mutated.
//!
//! [`Store`] is a cheap, cloneable handle; every clone observes the same
//! [`RootState`]. [`Store::dispatch`] routes an [`Action`] to its slice's
//! pure [`Reducer`] and swaps in the result. A reducer error leaves the
//! state untouched.
//!
//! The lock is held only for the duration of a reduce, never across an
//! `.await`.

use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use serde::Serialize;
use tracing::debug;

use crate::auth::{AuthAction, AuthState};
use crate::constructor::{ConstructorAction, ConstructorState};
use crate::errors::StoreError;
use crate::feed::{FeedAction, FeedState};
use crate::ingredients::{IngredientsAction, IngredientsState};
use crate::lifecycle::{RequestId, RequestKind, RequestTracker};
use crate::orders::{OrdersAction, OrdersState};

/// A slice's transition function: `(state, action) -> state`.
pub trait Reducer: Sized {
    type Action;
    type Error;

    fn reduce(&self, action: Self::Action) -> Result<Self, Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootState {
    pub auth: AuthState,
    pub constructor: ConstructorState,
    pub ingredients: IngredientsState,
    pub feed: FeedState,
    pub orders: OrdersState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Auth(AuthAction),
    Constructor(ConstructorAction),
    Ingredients(IngredientsAction),
    Feed(FeedAction),
    Orders(OrdersAction),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(a) => a.kind(),
            Self::Constructor(a) => a.kind(),
            Self::Ingredients(a) => a.kind(),
            Self::Feed(a) => a.kind(),
            Self::Orders(a) => a.kind(),
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Self::Auth(a) => a.phase(),
            Self::Constructor(_) => None,
            Self::Ingredients(a) => Some(a.phase()),
            Self::Feed(a) => Some(a.phase()),
            Self::Orders(a) => a.phase(),
        }
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<ConstructorAction> for Action {
    fn from(action: ConstructorAction) -> Self {
        Self::Constructor(action)
    }
}

impl From<IngredientsAction> for Action {
    fn from(action: IngredientsAction) -> Self {
        Self::Ingredients(action)
    }
}

impl From<FeedAction> for Action {
    fn from(action: FeedAction) -> Self {
        Self::Feed(action)
    }
}

impl From<OrdersAction> for Action {
    fn from(action: OrdersAction) -> Self {
        Self::Orders(action)
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl Reducer for RootState {
    type Action = Action;
    type Error = StoreError;

    fn reduce(&self, action: Action) -> Result<Self, StoreError> {
        let mut next = self.clone();
        match action {
            Action::Auth(a) => next.auth = infallible(self.auth.reduce(a)),
            Action::Constructor(a) => next.constructor = self.constructor.reduce(a)?,
            Action::Ingredients(a) => next.ingredients = infallible(self.ingredients.reduce(a)),
            Action::Feed(a) => next.feed = infallible(self.feed.reduce(a)),
            Action::Orders(a) => next.orders = infallible(self.orders.reduce(a)),
        }
        Ok(next)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: RootState,
    requests: RequestTracker,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RootState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state,
                requests: RequestTracker::default(),
            })),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> RootState {
        self.select(RootState::clone)
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn select<R>(&self, selector: impl FnOnce(&RootState) -> R) -> R {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        selector(&inner.state)
    }

    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        let action = action.into();
        debug!(kind = action.kind(), phase = ?action.phase(), "dispatch");

        let mut inner = self.write();
        inner.state = inner.state.reduce(action)?;
        Ok(())
    }

    /// Register a new request of `kind`, superseding any in flight.
    pub(crate) fn begin(&self, kind: RequestKind) -> RequestId {
        self.write().requests.begin(kind)
    }

    /// Apply the settlement of request `id`, unless a newer request of the
    /// same kind has been issued since. Returns whether it was applied.
    pub(crate) fn settle(
        &self,
        kind: RequestKind,
        id: RequestId,
        action: impl Into<Action>,
    ) -> Result<bool, StoreError> {
        let action = action.into();
        let mut inner = self.write();
        if !inner.requests.is_current(kind, id) {
            debug!(kind = action.kind(), request = ?id, "dropping superseded settlement");
            return Ok(false);
        }

        debug!(kind = action.kind(), phase = ?action.phase(), "dispatch");
        inner.state = inner.state.reduce(action)?;
        Ok(true)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
