//! The review queue: a cursor over a fixed list of comparisons plus a LIFO
//! stack of skipped positions.
//!
//! ```text
//!            skip()                      go_back_to_previous_skipped()
//!   [0] [1] [2] [3]      stack: [1]      [0] [1] [2] [3]     stack: []
//!        ^   -> ^                             ^ <----- ^
//! ```
//!
//! Confirm and skip never move the cursor past the last item, so the final
//! comparison stays on screen after it has been handled. Navigation that
//! cannot apply (empty queue, empty stack) is a silent no-op.

use serde::Serialize;
use tracing::debug;

use crate::collation::WordComparison;

/// Progress snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueProgress {
    /// 1-based position of the cursor (0 for an empty queue).
    pub position: usize,
    /// Number of items in the queue.
    pub total: usize,
    /// Successful confirmations.
    pub completed: usize,
    /// Skipped positions not yet returned to.
    pub skipped: usize,
}

impl QueueProgress {
    /// Fraction of items confirmed (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Ordered, navigable list of comparisons awaiting review.
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    items: Vec<WordComparison>,
    cursor: usize,
    skip_stack: Vec<usize>,
    completed_count: usize,
    confirmed: Vec<bool>,
}

impl ReviewQueue {
    /// Create a queue positioned at the first item.
    pub fn new(items: Vec<WordComparison>) -> Self {
        let confirmed = vec![false; items.len()];
        Self {
            items,
            cursor: 0,
            skip_stack: Vec::new(),
            completed_count: 0,
            confirmed,
        }
    }

    pub fn items(&self) -> &[WordComparison] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Skipped positions, most recent last.
    pub fn skip_stack(&self) -> &[usize] {
        &self.skip_stack
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    /// Whether the cursor points at an item.
    pub fn is_active(&self) -> bool {
        self.cursor < self.items.len()
    }

    /// Whether there is nothing left to point at.
    pub fn is_exhausted(&self) -> bool {
        !self.is_active()
    }

    /// Item under the cursor.
    pub fn current(&self) -> Option<&WordComparison> {
        self.items.get(self.cursor)
    }

    /// Whether the item at `index` has been confirmed.
    pub fn is_confirmed(&self, index: usize) -> bool {
        self.confirmed.get(index).copied().unwrap_or(false)
    }

    /// Whether every item has been confirmed.
    pub fn all_confirmed(&self) -> bool {
        self.completed_count == self.items.len()
    }

    /// Confirm the current item and advance.
    ///
    /// Returns `false` without changing anything if the queue is exhausted or
    /// the current item was already confirmed.
    pub fn confirm(&mut self) -> bool {
        self.confirm_at(self.cursor)
    }

    /// Confirm the item at `index`.
    ///
    /// The cursor only advances if it still points at `index`; a reviewer
    /// may have navigated elsewhere while the decision was being saved.
    pub fn confirm_at(&mut self, index: usize) -> bool {
        if index >= self.items.len() || self.confirmed[index] {
            return false;
        }

        self.confirmed[index] = true;
        self.completed_count += 1;
        if self.cursor == index {
            self.advance();
        }

        debug!(
            index,
            cursor = self.cursor,
            completed = self.completed_count,
            "confirmed queue item"
        );
        true
    }

    /// Defer the current item and advance.
    pub fn skip(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        self.skip_stack.push(self.cursor);
        self.advance();

        debug!(cursor = self.cursor, skipped = self.skip_stack.len(), "skipped queue item");
        true
    }

    /// Return to the most recently skipped item.
    pub fn go_back_to_previous_skipped(&mut self) -> bool {
        let Some(index) = self.skip_stack.pop() else {
            return false;
        };

        self.cursor = index;
        debug!(cursor = self.cursor, skipped = self.skip_stack.len(), "returned to skipped item");
        true
    }

    /// Current progress.
    pub fn progress(&self) -> QueueProgress {
        QueueProgress {
            position: if self.is_active() { self.cursor + 1 } else { 0 },
            total: self.items.len(),
            completed: self.completed_count,
            skipped: self.skip_stack.len(),
        }
    }

    fn advance(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }
}
