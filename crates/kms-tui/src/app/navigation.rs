//! Cursor movement for the tree and table panes.

use super::constants::PAGE_SIZE;

/// Trait for types that support list-style navigation.
pub trait ListNavigator {
    /// Get the currently selected index.
    fn selected(&self) -> usize;

    /// Set the selected index.
    fn set_selected(&mut self, index: usize);

    /// Get the maximum valid index (item count - 1, or 0 if empty).
    fn max_index(&self) -> usize;

    fn move_up(&mut self, count: usize) {
        let current = self.selected();
        self.set_selected(current.saturating_sub(count));
    }

    fn move_down(&mut self, count: usize) {
        let current = self.selected();
        let max = self.max_index();
        self.set_selected((current + count).min(max));
    }

    fn page_up(&mut self) {
        self.move_up(PAGE_SIZE);
    }

    fn page_down(&mut self) {
        self.move_down(PAGE_SIZE);
    }

    fn jump_to_top(&mut self) {
        self.set_selected(0);
    }

    fn jump_to_bottom(&mut self) {
        self.set_selected(self.max_index());
    }
}

/// Cursor over an index-based list, with a scroll offset for rendering.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    selected: usize,
    offset: usize,
    count: usize,
}

impl ListCursor {
    /// Update the item count, clamping the cursor if necessary.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.selected > self.max_index() {
            self.selected = self.max_index();
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll so the cursor stays inside a viewport of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

impl ListNavigator for ListCursor {
    fn selected(&self) -> usize {
        self.selected
    }

    fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.max_index());
    }

    fn max_index(&self) -> usize {
        self.count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_cursor() {
        let mut cursor = ListCursor::default();
        cursor.set_count(10);
        assert_eq!(cursor.selected(), 0);

        cursor.move_down(3);
        assert_eq!(cursor.selected(), 3);
        cursor.move_up(1);
        assert_eq!(cursor.selected(), 2);

        cursor.jump_to_bottom();
        assert_eq!(cursor.selected(), 9);
        cursor.set_count(4);
        assert_eq!(cursor.selected(), 3);
    }

    #[test]
    fn test_ensure_visible() {
        let mut cursor = ListCursor::default();
        cursor.set_count(50);
        cursor.move_down(20);
        cursor.ensure_visible(10);
        assert_eq!(cursor.offset(), 11);

        cursor.jump_to_top();
        cursor.ensure_visible(10);
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_empty_list() {
        let mut cursor = ListCursor::default();
        assert_eq!(cursor.max_index(), 0);
        cursor.move_down(1);
        assert_eq!(cursor.selected(), 0);
    }
}
