//! Background kitchen monitor
//!
//! Runs the same reconciliation poll as kitchen screens and feeds the
//! [`AlertGate`]. Order events trigger an early refresh.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::alert::AlertGate;
use crate::orders::{OrderEventType, OrdersManager};

pub struct KitchenMonitor {
    orders: Arc<OrdersManager>,
    alerts: Arc<AlertGate>,
    interval: Duration,
}

impl KitchenMonitor {
    pub fn new(orders: Arc<OrdersManager>, alerts: Arc<AlertGate>, interval: Duration) -> Self {
        Self {
            orders,
            alerts,
            interval,
        }
    }

    /// Refresh the alert gate once
    pub fn refresh(&self) {
        match self.orders.list_open_orders() {
            Ok(open) => {
                if let Some(alert) = self.alerts.refresh(&open) {
                    tracing::info!(
                        order_id = alert.order_id,
                        table_code = %alert.table_code,
                        kind = ?alert.kind,
                        "Kitchen alert surfaced"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "Kitchen refresh failed"),
        }
    }

    /// Poll until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        let mut events = self.orders.subscribe();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "Kitchen monitor started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Kitchen monitor stopped");
                    break;
                }
                _ = ticker.tick() => self.refresh(),
                event = events.recv() => match event {
                    Ok(event) if is_signal_event(event.event_type) => self.refresh(),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Kitchen monitor lagged behind order events");
                        self.refresh();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }
}

fn is_signal_event(event_type: OrderEventType) -> bool {
    matches!(
        event_type,
        OrderEventType::CallWaiterRaised
            | OrderEventType::RequestBillRaised
            | OrderEventType::SignalsCleared
            | OrderEventType::OrderClosed
    )
}
