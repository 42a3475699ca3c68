//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use kms_core::Element;
use kms_ops::OperationProgress;

use crate::theme::Theme;

pub(super) fn popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(width)) / 2 + area.x;
    let y = (area.height.saturating_sub(height)) / 2 + area.y;
    Rect::new(x, y, width, height)
}

/// Confirmation dialog for deleting the selected rows.
pub struct DeleteConfirmModal<'a> {
    theme: &'a Theme,
    batch: &'a [&'a Element],
    hidden: usize,
}

impl<'a> DeleteConfirmModal<'a> {
    /// `hidden` counts selected rows that are filtered out and will be kept.
    pub fn new(theme: &'a Theme, batch: &'a [&'a Element], hidden: usize) -> Self {
        Self {
            theme,
            batch,
            hidden,
        }
    }
}

impl Widget for DeleteConfirmModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = popup(area, 60, self.batch.len() as u16 + 9);
        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Confirm Deletion ")
            .title_style(
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let noun = if self.batch.len() == 1 { "item" } else { "items" };
        let mut lines = vec![
            Line::styled(
                format!("Delete {} {noun}?", self.batch.len()),
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ];

        let max_items = (inner.height as usize).saturating_sub(6);
        for element in self.batch.iter().take(max_items) {
            let (icon, style) = if element.is_folder {
                ("▸ ", self.theme.folder)
            } else {
                ("  ", self.theme.file)
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::raw(icon),
                Span::styled(element.display_name().to_string(), style),
            ]));
        }
        if self.batch.len() > max_items {
            lines.push(Line::styled(
                format!("  ... and {} more", self.batch.len() - max_items),
                Style::default().fg(self.theme.muted),
            ));
        }
        if self.hidden > 0 {
            lines.push(Line::styled(
                format!("  {} selected but hidden by the search, kept", self.hidden),
                Style::default().fg(self.theme.muted),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" y/Enter ", self.theme.help_key),
            Span::raw("Confirm  "),
            Span::styled(" n/Esc ", self.theme.help_key),
            Span::raw("Cancel"),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Progress dialog for a bulk delete.
pub struct DeleteProgressModal<'a> {
    theme: &'a Theme,
    progress: Option<&'a OperationProgress>,
}

impl<'a> DeleteProgressModal<'a> {
    pub fn new(theme: &'a Theme, progress: Option<&'a OperationProgress>) -> Self {
        Self { theme, progress }
    }
}

impl Widget for DeleteProgressModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = popup(area, 50, 8);
        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Deleting... ")
            .title_style(
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.warning));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![];
        if let Some(progress) = self.progress {
            let pct = progress.percentage() as usize;
            let bar_width = (inner.width as usize).saturating_sub(10);
            let filled = (pct * bar_width) / 100;
            let empty = bar_width.saturating_sub(filled);

            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::raw("  ["),
                Span::styled("\u{2588}".repeat(filled), Style::default().fg(self.theme.info)),
                Span::styled("\u{2591}".repeat(empty), Style::default().fg(self.theme.muted)),
                Span::raw(format!("] {pct}%")),
            ]));
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("  Progress: ", self.theme.help_desc),
                Span::raw(format!("{}/{} items", progress.completed, progress.total)),
            ]));
            if progress.has_errors() {
                lines.push(Line::styled(
                    format!("  Failed:   {}", progress.errors.len()),
                    Style::default().fg(self.theme.error),
                ));
            }
        } else {
            lines.push(Line::raw("  Preparing deletion..."));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
