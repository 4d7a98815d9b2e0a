//! Serde helpers for keys where `null` and absence mean different things.

use serde::{Deserialize, Deserializer};

/// Deserialize a present key as `Some`, keeping an explicit `null` as
/// `Some(None)`.
///
/// Pair with `#[serde(default)]` so an absent key stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
