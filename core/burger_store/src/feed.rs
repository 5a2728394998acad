//! Global order feed slice.
//!
//! Orders and both counters are replaced together from a single
//! [`FeedSnapshot`]; a failed refresh keeps the previous feed.

use std::convert::Infallible;

use serde::Serialize;

use crate::lifecycle::Lifecycle;
use crate::store::Reducer;
use crate::types::{FeedSnapshot, FeedTotals, Order, OrderStatus};

pub const LOAD_FEED_FAILED: &str = "Ошибка загрузки";

/// How many order numbers the ready / in-progress boards show.
pub const BOARD_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedState {
    pub orders: Vec<Order>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub feed: FeedTotals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    Load(Lifecycle<FeedSnapshot>),
}

impl FeedAction {
    pub fn kind(&self) -> &'static str {
        "orders/get"
    }

    pub fn phase(&self) -> &'static str {
        let Self::Load(lifecycle) = self;
        lifecycle.phase()
    }
}

impl Reducer for FeedState {
    type Action = FeedAction;
    type Error = Infallible;

    fn reduce(&self, action: FeedAction) -> Result<Self, Infallible> {
        let mut next = self.clone();

        let FeedAction::Load(lifecycle) = action;
        match lifecycle {
            Lifecycle::Pending => next.is_loading = true,
            Lifecycle::Fulfilled(snapshot) => {
                next.is_loading = false;
                next.error = None;
                next.orders = snapshot.orders;
                next.feed = snapshot.totals;
            }
            Lifecycle::Rejected(_) => {
                next.is_loading = false;
                next.error = Some(LOAD_FEED_FAILED.to_string());
            }
        }

        Ok(next)
    }
}

impl FeedState {
    /// Numbers of orders in `status`, newest first as delivered, capped at
    /// [`BOARD_LIMIT`].
    pub fn numbers_with_status(&self, status: OrderStatus) -> Vec<u64> {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .map(|order| order.number)
            .take(BOARD_LIMIT)
            .collect()
    }

    pub fn ready_numbers(&self) -> Vec<u64> {
        self.numbers_with_status(OrderStatus::Done)
    }

    pub fn in_progress_numbers(&self) -> Vec<u64> {
        self.numbers_with_status(OrderStatus::Pending)
    }
}
