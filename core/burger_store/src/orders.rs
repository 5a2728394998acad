//! # Orders slice
//!
//! Order submission, the signed-in user's history, and single-order lookup.
//!
//! Submission has its own in-flight flag (`order_request`) so that placing
//! an order does not flicker the history list's loading state. Clearing the
//! constructor after a successful submission is the effect's job; this slice
//! only records the receipt.

use std::convert::Infallible;

use serde::Serialize;

use crate::lifecycle::Lifecycle;
use crate::store::Reducer;
use crate::types::{Order, OrderReceipt};

pub const SUBMIT_ORDER_FAILED: &str = "оформление заказа не удалось";
pub const LOAD_HISTORY_FAILED: &str = "загрузка истории заказов не удалась";
pub const ORDER_NOT_FOUND: &str = "заказ не найден";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrdersState {
    /// History of the signed-in user.
    pub orders: Vec<Order>,
    pub is_loading: bool,
    pub order_request: bool,
    pub last_order: Option<OrderReceipt>,
    pub viewed_order: Option<Order>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdersAction {
    Submit(Lifecycle<OrderReceipt>),
    History(Lifecycle<Vec<Order>>),
    ByNumber(Lifecycle<Order>),
    /// Dismiss the receipt of the last submission.
    CloseOrderModal,
}

impl OrdersAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submit(_) => "order/submit",
            Self::History(_) => "order/getPlaced",
            Self::ByNumber(_) => "order/getByNumber",
            Self::CloseOrderModal => "order/closeModal",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Self::Submit(l) => Some(l.phase()),
            Self::History(l) => Some(l.phase()),
            Self::ByNumber(l) => Some(l.phase()),
            Self::CloseOrderModal => None,
        }
    }
}

impl Reducer for OrdersState {
    type Action = OrdersAction;
    type Error = Infallible;

    fn reduce(&self, action: OrdersAction) -> Result<Self, Infallible> {
        let mut next = self.clone();

        match action {
            OrdersAction::Submit(Lifecycle::Pending) => next.order_request = true,
            OrdersAction::Submit(Lifecycle::Fulfilled(receipt)) => {
                next.order_request = false;
                next.last_order = Some(receipt);
                next.error = None;
            }
            OrdersAction::Submit(Lifecycle::Rejected(_)) => {
                next.order_request = false;
                next.error = Some(SUBMIT_ORDER_FAILED.to_string());
            }

            OrdersAction::History(Lifecycle::Pending) | OrdersAction::ByNumber(Lifecycle::Pending) => {
                next.is_loading = true
            }
            OrdersAction::History(Lifecycle::Fulfilled(orders)) => {
                next.is_loading = false;
                next.orders = orders;
                next.error = None;
            }
            OrdersAction::History(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.error = Some(LOAD_HISTORY_FAILED.to_string());
            }

            OrdersAction::ByNumber(Lifecycle::Fulfilled(order)) => {
                next.is_loading = false;
                next.viewed_order = Some(order);
                next.error = None;
            }
            OrdersAction::ByNumber(Lifecycle::Rejected(_)) => {
                next.is_loading = false;
                next.viewed_order = None;
                next.error = Some(ORDER_NOT_FOUND.to_string());
            }

            OrdersAction::CloseOrderModal => next.last_order = None,
        }

        Ok(next)
    }
}

impl OrdersState {
    pub fn last_order_number(&self) -> Option<u64> {
        self.last_order.as_ref().map(|receipt| receipt.order.number)
    }
}
