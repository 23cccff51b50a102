//! Order change notifications
//!
//! Published after every committed mutation so staff screens can refresh
//! without waiting for their reconciliation poll.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderOpened,
    OrderClosed,
    ItemAdded,
    ItemUpdated,
    ItemStatusChanged,
    ItemAnnulled,
    ItemRemoved,
    CallWaiterRaised,
    RequestBillRaised,
    SignalsCleared,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderEventType::OrderOpened => "ORDER_OPENED",
            OrderEventType::OrderClosed => "ORDER_CLOSED",
            OrderEventType::ItemAdded => "ITEM_ADDED",
            OrderEventType::ItemUpdated => "ITEM_UPDATED",
            OrderEventType::ItemStatusChanged => "ITEM_STATUS_CHANGED",
            OrderEventType::ItemAnnulled => "ITEM_ANNULLED",
            OrderEventType::ItemRemoved => "ITEM_REMOVED",
            OrderEventType::CallWaiterRaised => "CALL_WAITER_RAISED",
            OrderEventType::RequestBillRaised => "REQUEST_BILL_RAISED",
            OrderEventType::SignalsCleared => "SIGNALS_CLEARED",
        };
        f.write_str(name)
    }
}

/// Change notification for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event_type: OrderEventType,
    pub order_id: i64,
    pub table_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl OrderEvent {
    pub fn new(event_type: OrderEventType, order_id: i64, table_code: impl Into<String>) -> Self {
        Self {
            event_type,
            order_id,
            table_code: table_code.into(),
            item_id: None,
            timestamp: crate::util::now_millis(),
        }
    }

    pub fn with_item(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }
}
