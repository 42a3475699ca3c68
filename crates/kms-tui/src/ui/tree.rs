//! Folder tree widget.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, StatefulWidget, Widget};

use kms_explorer::{FolderRow, NodeState};

use crate::app::navigation::{ListCursor, ListNavigator};
use crate::theme::Theme;
use crate::ui::truncate;

/// Tree view over flattened folder rows.
pub struct FolderTreeView<'a> {
    rows: &'a [FolderRow],
    theme: &'a Theme,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> FolderTreeView<'a> {
    pub fn new(rows: &'a [FolderRow], theme: &'a Theme, focused: bool) -> Self {
        Self {
            rows,
            theme,
            focused,
            block: None,
        }
    }

    /// Set the block (border) for the widget.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

fn prefix(row: &FolderRow) -> String {
    let mut prefix = String::new();
    // Top-level rows have no connector, so their own column is skipped.
    for &parent_is_last in row.parent_last_siblings.iter().skip(1) {
        prefix.push_str(if parent_is_last { "  " } else { "│ " });
    }
    if row.depth > 0 {
        prefix.push_str(if row.is_last_sibling { "└─" } else { "├─" });
    }
    prefix
}

fn indicator(state: NodeState) -> &'static str {
    match state {
        NodeState::Collapsed => "▶ ",
        NodeState::Loading => "⟳ ",
        NodeState::Loaded => "▼ ",
        NodeState::Failed => "✗ ",
    }
}

impl StatefulWidget for FolderTreeView<'_> {
    type State = ListCursor;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        if self.rows.is_empty() {
            let line = Line::styled("  (no folders)", Style::default().fg(self.theme.muted));
            Widget::render(line, inner_area, buf);
            return;
        }

        let viewport_height = inner_area.height as usize;
        state.ensure_visible(viewport_height);
        let start = state.offset();
        let end = (start + viewport_height).min(self.rows.len());

        for (row_idx, item_idx) in (start..end).enumerate() {
            let row = &self.rows[item_idx];
            let y = inner_area.y + row_idx as u16;
            let is_cursor = self.focused && item_idx == state.selected();

            let prefix = prefix(row);
            let indicator = indicator(row.state);
            let indicator_style = match row.state {
                NodeState::Failed => Style::default().fg(self.theme.error),
                NodeState::Loading => Style::default().fg(self.theme.info),
                _ => Style::default().fg(self.theme.muted),
            };

            let name_style = if row.is_current {
                self.theme.current_folder
            } else if row.is_empty {
                self.theme.folder_empty
            } else {
                self.theme.folder
            };

            let used = prefix.chars().count() + 2;
            let name = truncate(&row.label, (inner_area.width as usize).saturating_sub(used));

            let line = Line::from(vec![
                Span::styled(prefix, self.theme.tree_lines),
                Span::styled(indicator, indicator_style),
                Span::styled(name, name_style),
            ]);

            let line = if row.drag_over {
                line.style(self.theme.drag_over)
            } else if is_cursor {
                line.style(self.theme.selected)
            } else if row.is_current {
                line.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                line
            };

            Widget::render(line, Rect::new(inner_area.x, y, inner_area.width, 1), buf);
        }
    }
}
