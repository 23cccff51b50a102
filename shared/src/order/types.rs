//! Order and order item types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Text written into the note of an annulled item
pub const ANNUL_MARKER: &str = "ANULADO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[default]
    Open,
    Closed,
}

/// Preparation status of an item.
///
/// Variant order is the urgency order: pending is the most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    InPreparation,
    Ready,
    Delivered,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Pending,
        ItemStatus::InPreparation,
        ItemStatus::Ready,
        ItemStatus::Delivered,
    ];

    /// Urgency rank: pending=0 .. delivered=3
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InPreparation => "in_preparation",
            ItemStatus::Ready => "ready",
            ItemStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrigin {
    /// Snapshot of a catalog dish; name and price are frozen
    Catalog,
    /// Freeform line typed by staff
    #[default]
    Manual,
}

/// Ad-hoc add-on folded into the unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemExtra {
    pub label: String,
    pub price: Decimal,
}

/// Structured record of an annulment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidRecord {
    pub reason: Option<String>,
    pub voided_at: i64,
}

/// Order (one table's open tab)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub table_code: String,
    #[serde(default)]
    pub table_label: Option<String>,
    #[serde(default)]
    pub state: OrderState,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub closed_at: Option<i64>,
    /// Zero until the order is closed
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub call_waiter: bool,
    #[serde(default)]
    pub request_bill: bool,
}

impl Order {
    pub fn is_open(&self) -> bool {
        self.state == OrderState::Open
    }

    pub fn has_signal(&self) -> bool {
        self.call_waiter || self.request_bill
    }
}

/// One line inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub table_code: String,
    #[serde(default)]
    pub table_label: Option<String>,
    #[serde(default)]
    pub origin: ItemOrigin,
    #[serde(default)]
    pub dish_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default)]
    pub extras: Vec<ItemExtra>,
    /// base_price + sum of extras
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub voided: Option<VoidRecord>,
}

fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    /// `None` when the sum overflows
    pub fn extras_total(&self) -> Option<Decimal> {
        self.extras
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.price))
    }

    /// Recompute `unit_price` from base price and extras.
    ///
    /// Returns the new unit price, or `None` on overflow with the item untouched.
    pub fn reprice(&mut self) -> Option<Decimal> {
        let unit = self.base_price.checked_add(self.extras_total()?)?;
        self.unit_price = unit;
        Some(unit)
    }

    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn is_voided(&self) -> bool {
        self.voided.is_some()
    }
}

/// Sum of line totals, `None` when any step overflows
pub fn sum_line_totals<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// Input for adding an item to a table's active order
///
/// `quantity` and prices arrive unsanitized; the manager coerces bad values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddItemInput {
    /// Filled from the URL on the HTTP surface
    #[serde(default)]
    pub table_code: String,
    pub table_label: Option<String>,
    #[serde(default)]
    pub origin: ItemOrigin,
    pub dish_id: Option<i64>,
    /// Snapshotted from the dish when omitted on catalog items
    pub name: Option<String>,
    pub note: Option<String>,
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub extras: Vec<ItemExtra>,
    pub quantity: Option<f64>,
}

/// Partial item patch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    pub name: Option<String>,
    pub note: Option<String>,
    pub base_price: Option<Decimal>,
    pub extras: Option<Vec<ItemExtra>>,
    pub quantity: Option<f64>,
}

impl OrderItemUpdate {
    /// Whether the patch touches fields frozen on catalog items
    pub fn touches_catalog_snapshot(&self) -> bool {
        self.name.is_some() || self.base_price.is_some() || self.extras.is_some()
    }
}

/// Active order of a table together with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Staff table view: a table code and its active order, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    pub table_code: String,
    pub order: Option<Order>,
    pub items: Vec<OrderItem>,
    /// Running sum of line totals (every status)
    pub running_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusUpdate {
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnulRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTableRequest {
    pub table_code: String,
    pub table_label: Option<String>,
}
