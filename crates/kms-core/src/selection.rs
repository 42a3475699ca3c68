//! Multi-select with plain, toggle and range clicks.
//!
//! Indices always refer to the list currently shown. The anchor recorded by
//! a previous click is not adjusted when that list is re-filtered; a range
//! click after a re-filter resolves the old anchor against the new list.

use indexmap::IndexSet;

use crate::element::ElementId;

/// How a click modifies the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickKind {
    /// Replace the selection with the clicked item.
    #[default]
    Plain,
    /// Ctrl/Cmd click: add or remove the clicked item.
    Toggle,
    /// Shift click: select the range from the anchor to the clicked item.
    Range,
}

impl ClickKind {
    /// Derive the click kind from modifier state. Shift wins over ctrl.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if shift {
            Self::Range
        } else if ctrl {
            Self::Toggle
        } else {
            Self::Plain
        }
    }
}

/// Selected ids plus the anchor used to resolve range clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: IndexSet<ElementId>,
    anchor: Option<usize>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every id in `visible`, without an anchor.
    pub fn all(visible: &[ElementId]) -> Self {
        Self {
            items: visible.iter().copied().collect(),
            anchor: None,
        }
    }

    /// Drop every selected id and the anchor.
    pub fn clear(&mut self) {
        self.items.clear();
        self.anchor = None;
    }

    /// Anchor index into the visible list, if any.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Check if an id is selected.
    pub fn contains(&self, id: ElementId) -> bool {
        self.items.contains(&id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected ids in selection order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.items.iter().copied()
    }

    /// Selected ids that are also in `visible`, in selection order.
    pub fn visible_subset(&self, visible: &[ElementId]) -> Vec<ElementId> {
        self.items
            .iter()
            .copied()
            .filter(|id| visible.contains(id))
            .collect()
    }
}

/// Compute the selection after clicking `item` at `index` of `visible`.
///
/// A range click with no anchor, or on an empty list, behaves as a plain
/// click. An anchor past the end of `visible` is clamped to the last index.
pub fn select(
    current: &Selection,
    item: ElementId,
    index: usize,
    kind: ClickKind,
    visible: &[ElementId],
) -> Selection {
    match (kind, current.anchor) {
        (ClickKind::Range, Some(anchor)) if !visible.is_empty() => {
            let last = visible.len() - 1;
            let anchor_idx = anchor.min(last);
            let index = index.min(last);
            let (lo, hi) = if anchor_idx <= index {
                (anchor_idx, index)
            } else {
                (index, anchor_idx)
            };
            Selection {
                items: visible[lo..=hi].iter().copied().collect(),
                anchor: current.anchor,
            }
        }
        (ClickKind::Toggle, _) => {
            let mut items = current.items.clone();
            if !items.shift_remove(&item) {
                items.insert(item);
            }
            Selection {
                items,
                anchor: Some(index),
            }
        }
        _ => Selection {
            items: IndexSet::from([item]),
            anchor: Some(index),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ElementId> {
        raw.iter().copied().map(ElementId::new).collect()
    }

    #[test]
    fn test_plain_click_replaces() {
        let list = ids(&[1, 2, 3]);
        let sel = select(&Selection::all(&list), list[1], 1, ClickKind::Plain, &list);
        assert_eq!(sel.iter().collect::<Vec<_>>(), ids(&[2]));
        assert_eq!(sel.anchor(), Some(1));
    }

    #[test]
    fn test_range_without_anchor_is_plain() {
        let list = ids(&[1, 2, 3]);
        let sel = select(&Selection::new(), list[2], 2, ClickKind::Range, &list);
        assert_eq!(sel.iter().collect::<Vec<_>>(), ids(&[3]));
        assert_eq!(sel.anchor(), Some(2));
    }

    #[test]
    fn test_range_clamps_stale_anchor() {
        let long = ids(&[1, 2, 3, 4, 5]);
        let first = select(&Selection::new(), long[4], 4, ClickKind::Plain, &long);

        // The list shrank after a re-filter; anchor 4 no longer exists.
        let short = ids(&[1, 2, 3]);
        let sel = select(&first, short[0], 0, ClickKind::Range, &short);
        assert_eq!(sel.iter().collect::<Vec<_>>(), short);
        assert_eq!(sel.anchor(), Some(4));
    }

    #[test]
    fn test_range_on_empty_list_is_plain() {
        let list = ids(&[1]);
        let first = select(&Selection::new(), list[0], 0, ClickKind::Plain, &list);
        let sel = select(&first, ElementId::new(9), 0, ClickKind::Range, &[]);
        assert_eq!(sel.iter().collect::<Vec<_>>(), ids(&[9]));
    }

    #[test]
    fn test_modifier_priority() {
        assert_eq!(ClickKind::from_modifiers(true, true), ClickKind::Range);
        assert_eq!(ClickKind::from_modifiers(false, true), ClickKind::Toggle);
        assert_eq!(ClickKind::from_modifiers(false, false), ClickKind::Plain);
    }
}
