//! Dish-of-the-day configuration (singleton)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMode {
    /// Reference a catalog dish
    #[default]
    Automatic,
    /// Literal title/description/price
    Manual,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySpecial {
    #[serde(default)]
    pub mode: SpecialMode,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub dish_id: Option<i64>,
    #[serde(default)]
    pub manual_title: Option<String>,
    #[serde(default)]
    pub manual_description: Option<String>,
    #[serde(default)]
    pub manual_price: Option<Decimal>,
    #[serde(default)]
    pub manual_image_url: Option<String>,
    /// Heading shown above the special on the customer menu
    #[serde(default)]
    pub section_title: Option<String>,
}

/// Merge-upsert payload: absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySpecialUpdate {
    pub mode: Option<SpecialMode>,
    pub is_active: Option<bool>,
    pub dish_id: Option<i64>,
    pub manual_title: Option<String>,
    pub manual_description: Option<String>,
    pub manual_price: Option<Decimal>,
    pub manual_image_url: Option<String>,
    pub section_title: Option<String>,
}

impl DailySpecial {
    /// Apply a merge-upsert patch
    pub fn merge(mut self, patch: DailySpecialUpdate) -> Self {
        if let Some(v) = patch.mode {
            self.mode = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        if patch.dish_id.is_some() {
            self.dish_id = patch.dish_id;
        }
        if patch.manual_title.is_some() {
            self.manual_title = patch.manual_title;
        }
        if patch.manual_description.is_some() {
            self.manual_description = patch.manual_description;
        }
        if patch.manual_price.is_some() {
            self.manual_price = patch.manual_price;
        }
        if patch.manual_image_url.is_some() {
            self.manual_image_url = patch.manual_image_url;
        }
        if patch.section_title.is_some() {
            self.section_title = patch.section_title;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_absent_fields() {
        let stored = DailySpecial {
            mode: SpecialMode::Manual,
            is_active: true,
            manual_title: Some("Risotto".to_string()),
            manual_price: Some(Decimal::from(8500)),
            ..Default::default()
        };

        let merged = stored.merge(DailySpecialUpdate {
            manual_price: Some(Decimal::from(9000)),
            ..Default::default()
        });

        assert_eq!(merged.mode, SpecialMode::Manual);
        assert!(merged.is_active);
        assert_eq!(merged.manual_title.as_deref(), Some("Risotto"));
        assert_eq!(merged.manual_price, Some(Decimal::from(9000)));
    }

    #[test]
    fn mode_wire_names() {
        assert_eq!(serde_json::to_string(&SpecialMode::Automatic).unwrap(), "\"automatic\"");
        let m: SpecialMode = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(m, SpecialMode::Manual);
    }
}
