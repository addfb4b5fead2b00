//! Cyclic cursor over a list of study items with a reveal flag.
//!
//! The navigator only knows the list length. Whoever owns the list must call
//! [`Navigator::set_len`] (which resets to the first item) whenever the list
//! changes, e.g. after a filter change.

/// Observable navigator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    /// The list is empty; there is no current item.
    Empty,
    /// Showing the item at `index`, front (`revealed == false`) or back.
    Viewing { index: usize, revealed: bool },
}

/// Cursor over `len` items.
///
/// # Example
///
/// ```
/// use coursekit_core::navigator::Navigator;
///
/// let mut nav = Navigator::new(3);
/// nav.prev();
/// assert_eq!(nav.index(), Some(2));
/// nav.next();
/// assert_eq!(nav.index(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigator {
    len: usize,
    index: usize,
    revealed: bool,
}

impl Navigator {
    /// Creates a navigator positioned on the first of `len` items.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            revealed: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current index, `None` when the list is empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.index)
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn state(&self) -> NavigatorState {
        if self.is_empty() {
            NavigatorState::Empty
        } else {
            NavigatorState::Viewing {
                index: self.index,
                revealed: self.revealed,
            }
        }
    }

    /// Moves to the next item, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.len;
        self.revealed = false;
    }

    /// Moves to the previous item, wrapping to the last.
    pub fn prev(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + self.len - 1) % self.len;
        self.revealed = false;
    }

    /// Flips between front and back of the current item.
    pub fn toggle_reveal(&mut self) {
        if self.is_empty() {
            return;
        }
        self.revealed = !self.revealed;
    }

    /// Returns to the first item, front side up.
    pub fn reset_to_first(&mut self) {
        self.index = 0;
        self.revealed = false;
    }

    /// Jumps to `index` if it is in range. Out-of-range requests are ignored.
    ///
    /// Returns whether the jump happened.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.index = index;
        self.revealed = false;
        true
    }

    /// Adopts a new list length and resets to the first item.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.reset_to_first();
    }
}
