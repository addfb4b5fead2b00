//! Selected filter values and their domain invariant.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{ALL, FilterOptions};

/// Errors raised when selecting a filter value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The key is not one of the filter keys this state was created with.
    #[error("unknown filter key: {key}")]
    UnknownKey {
        /// The rejected key.
        key: String,
    },

    /// The value does not occur in the current records for that key.
    #[error("no records have {key} = {value}")]
    UnknownValue {
        /// The filter key.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// Selected value per filter key.
///
/// Every value is either [`ALL`] or a value present in the option domain it
/// was checked against, which [`select`](Self::select) and
/// [`revalidate`](Self::revalidate) maintain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeMap<String, String>,
}

impl FilterState {
    /// Creates a state with every key set to [`ALL`].
    #[must_use]
    pub fn new(keys: &[&str]) -> Self {
        Self {
            selected: keys
                .iter()
                .map(|key| ((*key).to_string(), ALL.to_string()))
                .collect(),
        }
    }

    /// Returns the selected value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.selected.get(key).map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selected
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterates over keys that currently constrain the result.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, value)| *value != ALL)
    }

    /// Returns `true` when no key constrains the result.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.active().next().is_none()
    }

    /// Selects `value` for `key`, checked against `options`.
    ///
    /// Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownKey`] for keys this state does not track
    /// and [`FilterError::UnknownValue`] for values outside the key's domain.
    pub fn select(
        &mut self,
        key: &str,
        value: &str,
        options: &FilterOptions,
    ) -> Result<bool, FilterError> {
        let Some(current) = self.selected.get_mut(key) else {
            return Err(FilterError::UnknownKey {
                key: key.to_string(),
            });
        };

        let in_domain = value == ALL
            || options
                .get(key)
                .is_some_and(|values| values.iter().any(|candidate| candidate == value));
        if !in_domain {
            return Err(FilterError::UnknownValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        if current == value {
            return Ok(false);
        }
        *current = value.to_string();
        Ok(true)
    }

    /// Sets every key back to [`ALL`]. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        let mut changed = false;
        for value in self.selected.values_mut() {
            if value != ALL {
                *value = ALL.to_string();
                changed = true;
            }
        }
        changed
    }

    /// Falls back to [`ALL`] for any value missing from `options`.
    ///
    /// Called after the record set changes. Returns whether anything changed.
    pub fn revalidate(&mut self, options: &FilterOptions) -> bool {
        let mut changed = false;
        for (key, value) in &mut self.selected {
            if value == ALL {
                continue;
            }
            let still_present = options
                .get(key)
                .is_some_and(|values| values.iter().any(|candidate| candidate == value));
            if !still_present {
                *value = ALL.to_string();
                changed = true;
            }
        }
        changed
    }
}
