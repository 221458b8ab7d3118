// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Three-state field for partial updates.

use serde::{Deserialize, Deserializer};

/// A field in a partial-update body.
///
/// Distinguishes a key that was left out of the JSON body (`Missing`) from
/// one explicitly sent as `null` (`Null`). Fields must be annotated with
/// `#[serde(default)]` so that absent keys deserialize to `Missing`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    /// The supplied value, treating `null` like an absent key.
    pub fn value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Missing | Patch::Null => None,
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Missing | Patch::Null => None,
        }
    }

    /// Apply to `target`: a value overwrites, `null` resets to `cleared`,
    /// an absent key leaves `target` untouched.
    pub fn apply_or_clear(self, target: &mut T, cleared: T) {
        match self {
            Patch::Missing => {}
            Patch::Null => *target = cleared,
            Patch::Value(v) => *target = v,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
