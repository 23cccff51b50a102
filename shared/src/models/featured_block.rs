//! Featured Block Model
//!
//! Promotional entries rendered above the regular menu.

use crate::types::{default_sort_order, default_true};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Literal content
    #[default]
    Manual,
    /// Description and price resolved from a dish at render time
    Dish,
}

/// Featured block entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedBlock {
    pub id: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
    #[serde(default)]
    pub kind: BlockKind,
    /// Overrides the dish name when non-empty on dish-linked blocks
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manual_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub dish_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Create featured block payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedBlockCreate {
    pub kind: BlockKind,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub manual_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub dish_id: Option<i64>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update featured block payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturedBlockUpdate {
    pub kind: Option<BlockKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub manual_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub dish_id: Option<i64>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
