//! Dish-of-the-day Repository
//!
//! Singleton stored under the `daily_special` settings key. There is no
//! history: every write replaces the stored document.

use super::RepoResult;
use crate::db::storage::Storage;
use shared::models::{DailySpecial, DailySpecialUpdate};

const DAILY_SPECIAL_KEY: &str = "daily_special";

#[derive(Debug, Clone)]
pub struct DailySpecialRepository {
    storage: Storage,
}

impl DailySpecialRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// `None` when it was never configured
    pub fn get(&self) -> RepoResult<Option<DailySpecial>> {
        Ok(self.storage.get_setting(DAILY_SPECIAL_KEY)?)
    }

    /// Merge-upsert: absent fields keep their stored value
    pub fn set(&self, patch: DailySpecialUpdate) -> RepoResult<DailySpecial> {
        let special = self
            .storage
            .update_setting(DAILY_SPECIAL_KEY, |current: DailySpecial| {
                current.merge(patch)
            })?;
        tracing::info!(mode = ?special.mode, is_active = special.is_active, "Dish of the day updated");
        Ok(special)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::SpecialMode;

    #[test]
    fn test_unset_is_none() {
        let repo = DailySpecialRepository::new(Storage::open_in_memory().unwrap());
        assert!(repo.get().unwrap().is_none());
    }

    #[test]
    fn test_set_merges_with_stored() {
        let repo = DailySpecialRepository::new(Storage::open_in_memory().unwrap());
        repo.set(DailySpecialUpdate {
            mode: Some(SpecialMode::Manual),
            is_active: Some(true),
            manual_title: Some("Cordero patagónico".to_string()),
            manual_price: Some(Decimal::from(15000)),
            ..Default::default()
        })
        .unwrap();

        let special = repo
            .set(DailySpecialUpdate {
                section_title: Some("Sugerencia".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(special.mode, SpecialMode::Manual);
        assert_eq!(special.manual_title.as_deref(), Some("Cordero patagónico"));
        assert_eq!(special.section_title.as_deref(), Some("Sugerencia"));

        assert_eq!(repo.get().unwrap(), Some(special));
    }
}
