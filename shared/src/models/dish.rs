//! Dish Model

use crate::types::{default_sort_order, default_true};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dish entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    /// `None` means uncategorized ("General")
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Position within its category
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i64>,
    pub has_image: Option<bool>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    /// Appended at the end of the category when absent
    pub sort_order: Option<i32>,
}

/// Update dish payload
///
/// `category_id: Some(None)` moves the dish to "General".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::types::double_option")]
    pub category_id: Option<Option<i64>>,
    pub has_image: Option<bool>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_and_null_category() {
        let absent: DishUpdate = serde_json::from_str(r#"{"name":"Flan"}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: DishUpdate = serde_json::from_str(r#"{"category_id":null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let moved: DishUpdate = serde_json::from_str(r#"{"category_id":12}"#).unwrap();
        assert_eq!(moved.category_id, Some(Some(12)));
    }

    #[test]
    fn price_accepts_number_or_string() {
        let a: Dish = serde_json::from_str(r#"{"id":1,"name":"Flan","price":"1500.50"}"#).unwrap();
        let b: Dish = serde_json::from_str(r#"{"id":1,"name":"Flan","price":1500.5}"#).unwrap();
        assert_eq!(a.price, b.price);
        assert_eq!(a.sort_order, 9999);
        assert!(a.category_id.is_none());
    }
}
