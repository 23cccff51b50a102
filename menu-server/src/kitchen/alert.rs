//! Customer signal alerts for the kitchen
//!
//! At most one alert is surfaced at a time. A held alert blocks new ones
//! until it is dismissed or its flag is cleared elsewhere.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::order::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CallWaiter,
    RequestBill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAlert {
    pub order_id: i64,
    pub table_code: String,
    pub kind: AlertKind,
}

impl TableAlert {
    fn still_raised(&self, orders: &[Order]) -> bool {
        orders.iter().any(|o| {
            o.id == self.order_id
                && match self.kind {
                    AlertKind::CallWaiter => o.call_waiter,
                    AlertKind::RequestBill => o.request_bill,
                }
        })
    }
}

/// First order calling the waiter, else the first one asking for the bill
pub fn select_alert(orders: &[Order]) -> Option<TableAlert> {
    let (order, kind) = orders
        .iter()
        .find(|o| o.call_waiter)
        .map(|o| (o, AlertKind::CallWaiter))
        .or_else(|| {
            orders
                .iter()
                .find(|o| o.request_bill)
                .map(|o| (o, AlertKind::RequestBill))
        })?;

    Some(TableAlert {
        order_id: order.id,
        table_code: order.table_code.clone(),
        kind,
    })
}

/// One-at-a-time alert holder shared by the monitor and the HTTP handlers
#[derive(Debug, Default)]
pub struct AlertGate {
    held: Mutex<Option<TableAlert>>,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held alert
    pub fn current(&self) -> Option<TableAlert> {
        self.held.lock().clone()
    }

    /// Refresh against the latest open orders.
    ///
    /// Releases a held alert whose flag is gone, then surfaces a new one if
    /// nothing is held. Returns the alert only when it was newly surfaced.
    pub fn refresh(&self, open_orders: &[Order]) -> Option<TableAlert> {
        let mut held = self.held.lock();

        if let Some(alert) = held.as_ref()
            && !alert.still_raised(open_orders)
        {
            tracing::debug!(order_id = alert.order_id, "Alert released: signal cleared");
            *held = None;
        }
        if held.is_some() {
            return None;
        }

        let alert = select_alert(open_orders)?;
        *held = Some(alert.clone());
        Some(alert)
    }

    /// Dismiss the held alert if it belongs to `order_id`
    pub fn dismiss(&self, order_id: i64) -> Option<TableAlert> {
        let mut held = self.held.lock();
        if held.as_ref().is_some_and(|a| a.order_id == order_id) {
            return held.take();
        }
        None
    }
}
