//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Sort order assumed for documents stored without one.
pub const DEFAULT_SORT_ORDER: i32 = 9999;

/// Direction for a pairwise reorder against the neighbouring entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Body of every `/{id}/move` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

pub(crate) fn default_sort_order() -> i32 {
    DEFAULT_SORT_ORDER
}

pub(crate) fn default_true() -> bool {
    true
}

/// Deserialize a field that distinguishes "absent" (`None`) from
/// explicit `null` (`Some(None)`). Use with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
