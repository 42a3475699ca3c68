//! Knowledge table widget.

use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, StatefulWidget, Widget};

use kms_core::{Element, KmsError, SortConfig, SortKey};
use kms_explorer::TableRow;

use crate::app::navigation::{ListCursor, ListNavigator};
use crate::theme::Theme;
use crate::ui::{format_relative_time, format_size, truncate};

const CHECKBOX_WIDTH: usize = 4;
const STATUS_WIDTH: usize = 12;
const SIZE_WIDTH: usize = 10;
const UPDATED_WIDTH: usize = 10;

/// Table of the current folder's elements.
pub struct KnowledgeTableView<'a> {
    rows: &'a [TableRow<'a>],
    sort: &'a SortConfig,
    theme: &'a Theme,
    all_checked: bool,
    show_status: bool,
    focused: bool,
    loading: bool,
    error: Option<&'a KmsError>,
    now: DateTime<Utc>,
    block: Option<Block<'a>>,
}

impl<'a> KnowledgeTableView<'a> {
    pub fn new(rows: &'a [TableRow<'a>], sort: &'a SortConfig, theme: &'a Theme) -> Self {
        Self {
            rows,
            sort,
            theme,
            all_checked: false,
            show_status: true,
            focused: false,
            loading: false,
            error: None,
            now: Utc::now(),
            block: None,
        }
    }

    pub fn all_checked(mut self, checked: bool) -> Self {
        self.all_checked = checked;
        self
    }

    pub fn show_status(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn error(mut self, error: Option<&'a KmsError>) -> Self {
        self.error = error;
        self
    }

    /// Set the block (border) for the widget.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn name_width(&self, total: usize) -> usize {
        let mut fixed = CHECKBOX_WIDTH + SIZE_WIDTH + UPDATED_WIDTH + 2;
        if self.show_status {
            fixed += STATUS_WIDTH + 1;
        }
        total.saturating_sub(fixed)
    }

    fn column_title(&self, key: SortKey, title: &str) -> String {
        if self.sort.is_sorted_by(&key) {
            format!("{title} {}", self.sort.direction.arrow())
        } else {
            title.to_string()
        }
    }

    fn header_line(&self, width: usize) -> Line<'static> {
        let name_width = self.name_width(width);
        let checkbox = if self.all_checked { "[x] " } else { "[ ] " };
        let mut spans = vec![
            Span::raw(checkbox),
            Span::raw(format!(
                "{:<name_width$}",
                truncate(&self.column_title(SortKey::Name, "Name"), name_width)
            )),
        ];
        if self.show_status {
            spans.push(Span::raw(format!(
                " {:<width$}",
                self.column_title(SortKey::Status, "Status"),
                width = STATUS_WIDTH
            )));
        }
        spans.push(Span::raw(format!(" {:>width$}", "Size", width = SIZE_WIDTH)));
        spans.push(Span::raw(format!(" {:>width$}", "Updated", width = UPDATED_WIDTH)));
        Line::from(spans).style(self.theme.title)
    }

    fn row_line(&self, element: &Element, selected: bool, width: usize) -> Line<'static> {
        let name_width = self.name_width(width);
        let checkbox = if selected { "[x] " } else { "[ ] " };
        let (glyph, name_style) = if element.is_folder {
            ("▸ ", self.theme.folder)
        } else if element.file_name.is_none() {
            ("↗ ", self.theme.link)
        } else {
            ("  ", self.theme.file)
        };
        let icon = element.icon.as_deref().unwrap_or(glyph);
        let name = truncate(
            &format!("{icon}{}", element.display_name()),
            name_width,
        );

        let mut spans = vec![
            Span::styled(
                checkbox,
                if selected {
                    self.theme.marked
                } else {
                    Style::default().fg(self.theme.muted)
                },
            ),
            Span::styled(format!("{name:<name_width$}"), name_style),
        ];
        if self.show_status {
            spans.push(Span::styled(
                format!(" {:<width$}", element.status.to_string(), width = STATUS_WIDTH),
                Style::default().fg(self.theme.status_color(element.status)),
            ));
        }
        let size = element.file_size.map(format_size).unwrap_or_default();
        let updated = element
            .updated_at
            .map(|t| format_relative_time(t, self.now))
            .unwrap_or_default();
        spans.push(Span::styled(
            format!(" {size:>width$}", width = SIZE_WIDTH),
            Style::default().fg(self.theme.muted),
        ));
        spans.push(Span::styled(
            format!(" {updated:>width$}", width = UPDATED_WIDTH),
            Style::default().fg(self.theme.muted),
        ));
        Line::from(spans)
    }
}

impl StatefulWidget for KnowledgeTableView<'_> {
    type State = ListCursor;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height < 2 || inner_area.width == 0 {
            return;
        }
        let width = inner_area.width as usize;

        Widget::render(
            self.header_line(width),
            Rect::new(inner_area.x, inner_area.y, inner_area.width, 1),
            buf,
        );
        let body = Rect::new(
            inner_area.x,
            inner_area.y + 1,
            inner_area.width,
            inner_area.height - 1,
        );

        if let Some(error) = self.error {
            let line = Line::styled(format!("  {error}"), Style::default().fg(self.theme.error));
            Widget::render(line, Rect::new(body.x, body.y, body.width, 1), buf);
            return;
        }
        if self.rows.is_empty() {
            let text = if self.loading { "  Loading..." } else { "  (empty folder)" };
            let line = Line::styled(text, Style::default().fg(self.theme.muted));
            Widget::render(line, Rect::new(body.x, body.y, body.width, 1), buf);
            return;
        }

        let viewport_height = body.height as usize;
        state.ensure_visible(viewport_height);
        let start = state.offset();
        let end = (start + viewport_height).min(self.rows.len());

        for (row_idx, item_idx) in (start..end).enumerate() {
            let row = &self.rows[item_idx];
            let y = body.y + row_idx as u16;
            let line = self.row_line(row.element, row.selected, width);

            let line = if self.focused && item_idx == state.selected() {
                line.style(self.theme.selected)
            } else if row.selected {
                line.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                line
            };
            Widget::render(line, Rect::new(body.x, y, body.width, 1), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kms_core::{ElementId, KnowledgeStatus, SortDirection};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_marks_sorted_column() {
        let theme = Theme::default();
        let sort = SortConfig::by(SortKey::Status, SortDirection::Descending);
        let view = KnowledgeTableView::new(&[], &sort, &theme).all_checked(true);
        let header = line_text(&view.header_line(60));

        assert!(header.starts_with("[x] Name "));
        assert!(header.contains("Status ↓"));
    }

    #[test]
    fn test_row_without_status_column() {
        let theme = Theme::default();
        let sort = SortConfig::default();
        let view = KnowledgeTableView::new(&[], &sort, &theme).show_status(false);
        let element = Element::file(ElementId::new(1), "notes.md")
            .with_status(KnowledgeStatus::Processing)
            .with_size(1024);
        let text = line_text(&view.row_line(&element, true, 60));

        assert!(text.starts_with("[x]   notes.md"));
        assert!(!text.contains("PROCESSING"));
        assert!(text.contains("KiB"));
    }
}
