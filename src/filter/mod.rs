//! Multi-criteria filtering over study records.
//!
//! [`compute_options`] derives the selectable values for each filter key
//! from the records themselves, and [`apply`] keeps the records matching
//! every non-[`ALL`] selection. Both functions are pure and preserve input
//! order.
//!
//! # Example
//!
//! ```
//! use coursekit_core::filter::{FilterState, apply, compute_options};
//! use coursekit_core::record::Flashcard;
//!
//! let cards: Vec<Flashcard> = serde_json::from_str(r#"[
//!     {"id": 1, "front": "a", "back": "b", "category": "Basics", "difficulty": "easy"},
//!     {"id": 2, "front": "c", "back": "d", "category": "Advanced", "difficulty": "hard"}
//! ]"#).unwrap();
//!
//! let options = compute_options(&cards, &["difficulty"]);
//! assert_eq!(options["difficulty"], vec!["all", "easy", "hard"]);
//!
//! let mut filters = FilterState::new(&["difficulty"]);
//! filters.select("difficulty", "hard", &options).unwrap();
//! assert_eq!(apply(&cards, &filters).len(), 1);
//! ```

mod state;

use std::collections::{BTreeMap, HashSet};

use crate::record::FilterFields;

pub use state::{FilterError, FilterState};

/// Selection value that imposes no constraint.
pub const ALL: &str = "all";

/// Selectable values per filter key, each list starting with [`ALL`].
pub type FilterOptions = BTreeMap<String, Vec<String>>;

/// Computes the option list for each key.
///
/// Each list is [`ALL`] followed by the distinct values of that field in
/// first-seen order. An empty record slice yields an empty mapping.
#[must_use]
pub fn compute_options<R: FilterFields>(records: &[R], keys: &[&str]) -> FilterOptions {
    if records.is_empty() {
        return FilterOptions::new();
    }

    keys.iter()
        .map(|key| ((*key).to_string(), distinct_values(records, key)))
        .collect()
}

fn distinct_values<R: FilterFields>(records: &[R], key: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = vec![ALL.to_string()];
    for value in records.iter().filter_map(|record| record.field(key)) {
        // A record whose value is literally "all" cannot be selected apart
        // from the sentinel.
        if value != ALL && seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Returns the records matching every active selection, in input order.
#[must_use]
pub fn apply<'a, R: FilterFields>(records: &'a [R], filters: &FilterState) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches(*record, filters))
        .collect()
}

/// Returns `true` when `record` satisfies every active selection.
///
/// A record lacking a constrained field does not match.
#[must_use]
pub fn matches<R: FilterFields>(record: &R, filters: &FilterState) -> bool {
    filters
        .active()
        .all(|(key, value)| record.field(key) == Some(value))
}
