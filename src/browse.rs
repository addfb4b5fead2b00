//! Browsing state for a filtered list of study records.
//!
//! [`StudyDeck`] owns the records, the filter selection and a
//! [`Navigator`] over the filtered result, and resets the navigator whenever
//! the filtered list changes. [`RevealSet`] tracks shown answers per
//! question for list-style views.

use std::collections::HashSet;

use crate::filter::{self, FilterError, FilterOptions, FilterState};
use crate::navigator::Navigator;
use crate::record::{FilterFields, RecordId};

/// Filtered, navigable view over a set of records.
#[derive(Debug, Clone)]
pub struct StudyDeck<R> {
    records: Vec<R>,
    keys: Vec<String>,
    options: FilterOptions,
    filters: FilterState,
    visible: Vec<usize>,
    navigator: Navigator,
}

impl<R: FilterFields> StudyDeck<R> {
    /// Creates a deck filtered by `keys`, all set to "all".
    #[must_use]
    pub fn new(records: Vec<R>, keys: &[&str]) -> Self {
        let options = filter::compute_options(&records, keys);
        let filters = FilterState::new(keys);
        let mut deck = Self {
            records,
            keys: keys.iter().map(|key| (*key).to_string()).collect(),
            options,
            filters,
            visible: Vec::new(),
            navigator: Navigator::default(),
        };
        deck.refilter();
        deck
    }

    /// Swaps in a new record set, keeping selections that are still valid.
    pub fn replace_records(&mut self, records: Vec<R>) {
        let keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        self.options = filter::compute_options(&records, &keys);
        self.records = records;
        self.filters.revalidate(&self.options);
        self.refilter();
    }

    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Selects a filter value. A changed selection returns the navigator to
    /// the first matching record.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the key is not filterable or the value
    /// does not occur in the records.
    pub fn select(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        if self.filters.select(key, value, &self.options)? {
            self.refilter();
        }
        Ok(())
    }

    /// Clears every selection.
    pub fn reset_filters(&mut self) {
        if self.filters.reset() {
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| filter::matches(*record, &self.filters))
            .map(|(position, _)| position)
            .collect();
        self.navigator.set_len(self.visible.len());
    }

    /// Records passing the current filters, in original order.
    pub fn visible(&self) -> impl Iterator<Item = &R> {
        self.visible.iter().map(|&position| &self.records[position])
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    /// "Showing X of Y" line for list views.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} of {}", self.visible_len(), self.total_len())
    }

    /// The record under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&R> {
        let index = self.navigator.index()?;
        self.visible
            .get(index)
            .and_then(|&position| self.records.get(position))
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.navigator.next();
    }

    pub fn prev(&mut self) {
        self.navigator.prev();
    }

    pub fn toggle_reveal(&mut self) {
        self.navigator.toggle_reveal();
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.navigator.go_to(index)
    }
}

/// Per-record "answer shown" toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSet {
    shown: HashSet<RecordId>,
}

impl RevealSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the record's answer visibility and returns the new state.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.shown.remove(id) {
            false
        } else {
            self.shown.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn is_revealed(&self, id: &RecordId) -> bool {
        self.shown.contains(id)
    }

    /// Shows answers for every id given.
    pub fn reveal_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RecordId>) {
        self.shown.extend(ids.into_iter().cloned());
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }
}
