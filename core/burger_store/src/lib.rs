//! # Burger Store
//!
//! Client-side state core of the burger builder: what the user is
//! assembling, who they are, what the kitchen offers, and what everyone is
//! ordering.
//!
//! | Slice         | State                         | Operations                                   |
//! |---------------|-------------------------------|----------------------------------------------|
//! | [`auth`]        | [`AuthState`]                   | check, login, register, logout, get, update  |
//! | [`constructor`] | [`ConstructorState`]            | set bun, add / remove / move filling, clear  |
//! | [`ingredients`] | [`IngredientsState`]            | load catalog                                 |
//! | [`feed`]        | [`FeedState`]                   | load global feed                             |
//! | [`orders`]      | [`OrdersState`]                 | submit, history, lookup by number            |
//!
//! ## Architecture
//!
//! Each slice is a pure [`Reducer`]. The [`Store`] owns the combined
//! [`RootState`] and is the only place it changes. [`Effects`] run the
//! asynchronous operations against two ports, [`BurgerApi`] and
//! [`CredentialStore`], dispatching `Pending` / `Fulfilled` / `Rejected`
//! around each call. Route decisions are made by [`guard::guard`] from an
//! auth snapshot, without touching any navigation API.

pub mod auth;
pub mod constructor;
pub mod effects;
pub mod errors;
pub mod feed;
pub mod guard;
pub mod ingredients;
pub mod lifecycle;
pub mod orders;
pub mod ports;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_effects;

pub use auth::{AuthAction, AuthState};
pub use constructor::{ConstructorAction, ConstructorState};
pub use effects::Effects;
pub use errors::{ApiError, EffectError, PersistenceError, StoreError};
pub use feed::{FeedAction, FeedState};
pub use guard::{guard, AuthSnapshot, Location, NavigationIntent};
pub use ingredients::{IngredientsAction, IngredientsState};
pub use lifecycle::Lifecycle;
pub use orders::{OrdersAction, OrdersState};
pub use ports::{BurgerApi, CredentialStore, InMemoryCredentials};
pub use store::{Action, Reducer, RootState, Store};
